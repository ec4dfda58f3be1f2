use std::env;
use std::path::PathBuf;

/// Runtime configuration for the image export service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory the processed JPEGs are written to (default: "processed_images")
    pub output_dir: PathBuf,

    /// Path of the zip bundle, overwritten on every archive run (default: "cropped_images.zip")
    pub archive_path: PathBuf,

    /// Maximum total upload size in bytes (default: 32 MB)
    pub max_upload_size: usize,

    /// JPEG encode quality, 1-100 (default: 85)
    pub jpeg_quality: u8,

    /// Port the server binds to on 127.0.0.1 (default: 3000)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("processed_images"),
            archive_path: PathBuf::from("cropped_images.zip"),
            max_upload_size: 32 * 1024 * 1024, // 32 MB
            jpeg_quality: 85,
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),

            archive_path: env::var("ARCHIVE_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.archive_path),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            jpeg_quality: env::var("JPEG_QUALITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|q| (1..=100).contains(q))
                .unwrap_or(default.jpeg_quality),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }
}
