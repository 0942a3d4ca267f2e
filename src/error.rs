use std::path::PathBuf;

use thiserror::Error;

/// Errors from grid geometry planning.
///
/// Planning is pure arithmetic, so these only cover precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Image has no pixels along at least one axis
    #[error("image has zero extent: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Tile size of zero can never cover anything
    #[error("tile size must be greater than zero")]
    ZeroTileSize,

    /// Overlap must leave a positive stride between tile origins
    #[error("minimum overlap {min_overlap} must be smaller than tile size {tile_size}")]
    OverlapTooLarge { min_overlap: u32, tile_size: u32 },
}

/// Errors from the raster load/save glue.
#[derive(Debug, Error)]
pub enum RasterError {
    /// File or directory does not exist
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// The image crate could not decode the file
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The image crate could not encode or write the file
    #[error("failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Filesystem error on an individual path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoded image has zero width or height
    #[error("image {0} has zero extent")]
    EmptyExtent(PathBuf),
}

/// Errors reading or writing the tiling manifest.
///
/// Manifest corruption is one of the two conditions that abort a whole
/// batch (the other is a missing input directory), so these are kept
/// separate from per-item raster failures.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),

    /// Manifest exists but is not valid JSON for the expected schema
    #[error("failed to parse manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Filesystem error while reading or writing the manifest
    #[error("I/O error on manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort splitting, either for one image or for the batch.
///
/// Per-image failures inside `split_all` are caught and recorded in the
/// [`SplitSummary`](crate::split::SplitSummary); only missing inputs and
/// manifest persistence are fatal to the run.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Input directory does not exist
    #[error("input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// Input directory contains no raster files
    #[error("no image files found in {0}")]
    NoInputFiles(PathBuf),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors that abort reconstruction, either for one image or for the batch.
///
/// A missing inference tile is not an error: it contributes zero weight and
/// is reported through [`MergeReport`](crate::merge::MergeReport).
#[derive(Debug, Error)]
pub enum MergeError {
    /// Inference results directory does not exist
    #[error("inference directory not found: {0}")]
    InputNotFound(PathBuf),

    /// Inference tile is smaller than the region it must cover
    #[error(
        "tile {filename} is {got_width}x{got_height}, needs at least {need_width}x{need_height}"
    )]
    TileSizeMismatch {
        filename: String,
        need_width: u32,
        need_height: u32,
        got_width: u32,
        got_height: u32,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Errors from dataset preparation and label remapping.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Image or label directory does not exist
    #[error("input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// No image files to work on
    #[error("no image files found in {0}")]
    NoInputFiles(PathBuf),

    /// Image and its label mask disagree on pixel dimensions
    #[error(
        "label for {stem} is {label_width}x{label_height} but image is {image_width}x{image_height}"
    )]
    DimensionMismatch {
        stem: String,
        image_width: u32,
        image_height: u32,
        label_width: u32,
        label_height: u32,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),
}
