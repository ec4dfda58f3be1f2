pub mod fingerprint;
pub mod validation;
