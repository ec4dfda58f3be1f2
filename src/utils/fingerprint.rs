use hex;
use sha2::{Digest, Sha256};

/// Content fingerprint of an upload: SHA-256 over the raw bytes, hex encoded.
///
/// Used as a stable per-file key by the UI so two uploads are never confused;
/// it carries no other meaning and collisions are not handled.
pub fn content_fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}
