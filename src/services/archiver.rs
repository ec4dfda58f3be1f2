use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use crate::config::AppConfig;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to create archive {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadEntry {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the zip bundle for a run of saved files.
///
/// The archive lives at a fixed path and is recreated from scratch on every
/// run; entries are stored under their base names, flattening any directory
/// structure.
pub struct ArchiveService {
    archive_path: PathBuf,
}

impl ArchiveService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            archive_path: config.archive_path.clone(),
        }
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Bundle the given files into the archive. Returns the number of
    /// entries written.
    pub fn build(&self, files: &[PathBuf]) -> Result<usize, ArchiveError> {
        let file = File::create(&self.archive_path).map_err(|e| ArchiveError::Create {
            path: self.archive_path.display().to_string(),
            source: e,
        })?;

        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut count = 0;
        for path in files {
            let entry_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unnamed.jpg");

            let data = std::fs::read(path).map_err(|e| ArchiveError::ReadEntry {
                path: path.display().to_string(),
                source: e,
            })?;

            zip.start_file(entry_name, options)?;
            zip.write_all(&data)?;
            count += 1;
        }

        zip.finish()?;
        info!(
            "📦 Archived {} file(s) into {}",
            count,
            self.archive_path.display()
        );

        Ok(count)
    }
}
