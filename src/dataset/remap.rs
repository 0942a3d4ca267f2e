//! In-place value remapping of label masks.
//!
//! Segmentation frameworks disagree on whether class indices start at 0
//! or 1; shifting every pixel of the label masks by a constant bridges
//! the two conventions without re-exporting the dataset.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{DatasetError, RasterError};
use crate::raster::{load_raster, save_raster};

/// Outcome of a remap run.
#[derive(Debug, Default)]
pub struct RemapSummary {
    /// Masks rewritten
    pub processed: usize,

    /// PNG files skipped because they are not single-channel
    pub skipped: Vec<PathBuf>,

    /// Files that could not be read or written
    pub failed: Vec<PathBuf>,
}

/// Apply a constant offset to every pixel of each single-channel PNG
/// under `dir` (recursively), rewriting files in place.
///
/// Values saturate at the ends of the u8 range instead of wrapping, so an
/// offset can never alias two classes onto each other through overflow.
/// Multi-channel PNGs are left untouched and reported as skipped.
///
/// # Errors
///
/// Returns an error only if `dir` itself is missing; per-file problems
/// are recorded in the summary.
pub fn offset_labels(dir: &Path, offset: i32) -> Result<RemapSummary, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::InputNotFound(dir.to_path_buf()));
    }

    let mut summary = RemapSummary::default();

    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !is_png {
            continue;
        }

        match remap_one(path, offset) {
            Ok(true) => summary.processed += 1,
            Ok(false) => {
                warn!(file = %path.display(), "not single-channel, skipping");
                summary.skipped.push(path.to_path_buf());
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "remap failed");
                summary.failed.push(path.to_path_buf());
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped.len(),
        failed = summary.failed.len(),
        "remap complete"
    );

    Ok(summary)
}

/// Remap one file. Returns `Ok(false)` when the file is not a
/// single-channel mask.
fn remap_one(path: &Path, offset: i32) -> Result<bool, RasterError> {
    let mut mask = load_raster(path)?;
    if mask.channels != 1 {
        return Ok(false);
    }

    for value in &mut mask.pixels {
        *value = (i32::from(*value) + offset).clamp(0, 255) as u8;
    }

    save_raster(path, &mask)?;
    Ok(true)
}
