//! Locating inference-result tiles on disk.
//!
//! Inference frameworks rarely emit results under the exact input
//! filename; a `_pred` suffix or a changed extension is common. Instead of
//! patching strings ad hoc, the candidate names are generated by an
//! explicit ordered list of strategies and the first existing file wins.

use std::path::{Path, PathBuf};

/// Candidate filenames for a tile's inference result, in priority order.
///
/// 1. The canonical tile filename from the manifest.
/// 2. The stem with a `_pred` suffix (`x.png` -> `x_pred.png`).
/// 3. The stem with a plain `.png` extension (covers results re-encoded
///    from another input format).
///
/// Duplicates arising from a tile that is already a `.png` are harmless:
/// existence is checked in order and the first hit short-circuits.
pub fn candidate_filenames(tile_filename: &str) -> Vec<String> {
    let stem = Path::new(tile_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| tile_filename.to_string());

    vec![
        tile_filename.to_string(),
        format!("{stem}_pred.png"),
        format!("{stem}.png"),
    ]
}

/// Finds inference-result tiles in a results directory.
#[derive(Debug, Clone)]
pub struct TileLocator {
    dir: PathBuf,
}

impl TileLocator {
    /// Create a locator over a results directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the first existing candidate for `tile_filename`, if any.
    pub fn locate(&self, tile_filename: &str) -> Option<PathBuf> {
        candidate_filenames(tile_filename)
            .into_iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.is_file())
    }
}
