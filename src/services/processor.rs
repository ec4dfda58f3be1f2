use anyhow::{Context, Result};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::{CropRect, FileOutcome, ImageEntry};
use crate::utils::validation::has_allowed_extension;

/// Per-file pipeline errors. These never abort the batch; they are reported
/// back as a `FileOutcome::Failed` for the file they belong to.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("unsupported file type (allowed: jpg, jpeg, png)")]
    UnsupportedType,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(
        "invalid crop region ({left}, {top}, {right}, {bottom}) for {width}x{height} image"
    )]
    InvalidCrop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        width: u32,
        height: u32,
    },

    #[error("failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// A file written to disk in the current run.
pub struct SavedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Everything one export run produced.
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// Paths written in this run, in batch order; input to the archive step
    pub saved_paths: Vec<PathBuf>,
}

impl BatchReport {
    pub fn saved_count(&self) -> usize {
        self.saved_paths.len()
    }
}

/// The shared decode → crop → encode → save pipeline.
///
/// Both export endpoints run the same pass; cropping is just an optional
/// stage on each entry.
pub struct ImageProcessor {
    output_dir: PathBuf,
    jpeg_quality: u8,
}

impl ImageProcessor {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Flat sequential pass over the batch. Per-file failures are collected,
    /// not propagated; only an unusable output directory aborts the run.
    pub fn process_batch(&self, entries: &[ImageEntry]) -> Result<BatchReport> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let mut outcomes = Vec::with_capacity(entries.len());
        let mut saved_paths = Vec::new();

        for entry in entries {
            let Some(name) = entry.output_name.as_deref() else {
                // Empty name means the user opted this file out
                outcomes.push(FileOutcome::Skipped {
                    original_filename: entry.original_filename.clone(),
                    fingerprint: entry.fingerprint.clone(),
                    reason: "no output name supplied".to_string(),
                });
                continue;
            };

            match self.process_one(entry, name) {
                Ok(saved) => {
                    info!(
                        "💾 Saved {} as {} ({}x{})",
                        entry.original_filename,
                        saved.path.display(),
                        saved.width,
                        saved.height
                    );
                    outcomes.push(FileOutcome::Saved {
                        original_filename: entry.original_filename.clone(),
                        fingerprint: entry.fingerprint.clone(),
                        saved_as: saved.path.display().to_string(),
                        width: saved.width,
                        height: saved.height,
                    });
                    saved_paths.push(saved.path);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", entry.original_filename, e);
                    outcomes.push(FileOutcome::Failed {
                        original_filename: entry.original_filename.clone(),
                        fingerprint: entry.fingerprint.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(BatchReport {
            outcomes,
            saved_paths,
        })
    }

    fn process_one(&self, entry: &ImageEntry, name: &str) -> Result<SavedImage, ProcessError> {
        if !has_allowed_extension(&entry.original_filename) {
            return Err(ProcessError::UnsupportedType);
        }

        let img = image::load_from_memory(&entry.bytes)?;

        let img = match entry.crop {
            Some(rect) => apply_crop(img, rect)?,
            None => img,
        };

        let path = self.output_dir.join(format!("{name}.jpg"));
        self.write_jpeg(&img, &path)?;

        Ok(SavedImage {
            path,
            width: img.width(),
            height: img.height(),
        })
    }

    fn write_jpeg(&self, img: &DynamicImage, path: &Path) -> Result<(), ProcessError> {
        // JPEG carries no alpha channel; convert down to RGB8 before encoding
        let rgb = img.to_rgb8();

        let file = File::create(path).map_err(|e| ProcessError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
        encoder.encode_image(&rgb).map_err(ProcessError::Encode)?;

        writer.flush().map_err(|e| ProcessError::Write {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }
}

/// Apply a crop rectangle, rejecting inverted, zero-area, or out-of-bounds
/// regions instead of passing them through to the image library.
fn apply_crop(img: DynamicImage, rect: CropRect) -> Result<DynamicImage, ProcessError> {
    let (width, height) = (img.width(), img.height());

    if !rect.is_valid_for(width, height) {
        return Err(ProcessError::InvalidCrop {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
            width,
            height,
        });
    }

    // Fast path: full-frame crop is a no-op
    if rect.is_full_frame(width, height) {
        return Ok(img);
    }

    Ok(img.crop_imm(
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
    ))
}
