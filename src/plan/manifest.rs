//! Manifest types and persistence.
//!
//! The manifest is the only artifact shared between the split and merge
//! phases, and the binding contract with the external inference step: the
//! inference step reads tile files named here and writes results under
//! discoverable names into a directory the reconstructor later scans.
//!
//! Serialized as a pretty-printed JSON array of [`ImagePlan`] records.
//! Field names are authoritative, not positional; a reader must look
//! fields up by name.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Default manifest filename inside the split output directory.
pub const MANIFEST_FILENAME: &str = "tiling_info.json";

/// Canonical tile filename for grid position `(row, col)`.
///
/// Zero-padded so lexicographic and grid order agree up to 1000 tiles
/// per axis.
pub fn tile_filename(image_id: &str, row: u32, col: u32) -> String {
    format!("{image_id}_tile_{row:03}_{col:03}.png")
}

/// One planned tile of one image.
///
/// The rectangle is in source-image coordinates and always lies fully
/// inside the image; `actual_width`/`actual_height` are its edge lengths.
/// `needs_padding` is set only when the source image itself is smaller
/// than one tile, in which case the stored tile file was padded out to
/// full size by edge replication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub filename: String,
    pub row: u32,
    pub col: u32,
    pub x_start: u32,
    pub y_start: u32,
    pub x_end: u32,
    pub y_end: u32,
    pub actual_width: u32,
    pub actual_height: u32,
    pub needs_padding: bool,
}

/// The full partition of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlan {
    pub image_id: String,
    pub original_filename: String,
    pub original_width: u32,
    pub original_height: u32,
    pub tile_size: u32,
    pub min_overlap: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub stride_x: f64,
    pub stride_y: f64,
    pub total_tiles: usize,
    pub tiles: Vec<TileSpec>,
}

/// Ordered collection of image plans, one per source image.
///
/// Transparent over the inner vector so the file is a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TilingManifest {
    pub images: Vec<ImagePlan>,
}

impl TilingManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one image's plan.
    pub fn push(&mut self, plan: ImagePlan) {
        self.images.push(plan);
    }

    /// Number of images in the manifest.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the manifest holds no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Total tile count across all images.
    pub fn total_tiles(&self) -> usize {
        self.images.iter().map(|p| p.tiles.len()).sum()
    }

    /// Write the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let file = File::create(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read a manifest back from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not valid
    /// JSON for this schema. Both conditions are fatal to a merge run.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
