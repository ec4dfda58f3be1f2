use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rectangular crop region in pixel coordinates.
///
/// Matches the slider endpoints in the UI: `(left, top)` is one corner,
/// `(right, bottom)` the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    /// Non-inverted, non-degenerate, and inside an image of the given size.
    pub fn is_valid_for(&self, width: u32, height: u32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.right <= width
            && self.bottom <= height
    }

    /// Whether cropping would be a no-op for an image of the given size.
    pub fn is_full_frame(&self, width: u32, height: u32) -> bool {
        self.left == 0 && self.top == 0 && self.right == width && self.bottom == height
    }
}

/// One uploaded image, assembled from consecutive multipart fields.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    /// Filename as sent by the browser
    pub original_filename: String,
    /// Raw upload bytes
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`, used by the UI as a stable per-file key
    pub fingerprint: String,
    /// Resolved output name; `None` means the user cleared the field
    /// and the entry is skipped
    pub output_name: Option<String>,
    /// Optional crop region; absent means export unmodified
    pub crop: Option<CropRect>,
}

/// Per-file result of one export run.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Decoded, (optionally) cropped, encoded, and written to disk
    Saved {
        original_filename: String,
        fingerprint: String,
        saved_as: String,
        width: u32,
        height: u32,
    },
    /// Nothing written, by user request (empty output name)
    Skipped {
        original_filename: String,
        fingerprint: String,
        reason: String,
    },
    /// Decode, crop, encode, or write failed; the batch continued
    Failed {
        original_filename: String,
        fingerprint: String,
        error: String,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveInfo {
    pub filename: String,
    pub files: usize,
}

/// Response body for both export endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExportResponse {
    pub results: Vec<FileOutcome>,
    /// Number of files written in this run
    pub saved: usize,
    /// Present when a zip bundle was built (archive endpoint only)
    pub archive: Option<ArchiveInfo>,
    /// Present when the archive step was skipped because nothing was written
    pub warning: Option<String>,
}
