//! # seamtile
//!
//! Prepares large raster images for tile-based machine-learning inference
//! and reconstructs full-resolution outputs from per-tile results.
//!
//! Arbitrarily sized images are cut into a deterministic, gap-free grid of
//! fixed-size square tiles with a guaranteed minimum overlap; after the
//! external inference step has processed the tiles, the per-tile results
//! are blended back into the original geometry with distance-weighted
//! averaging so tile boundaries leave no seams.
//!
//! ## Features
//!
//! - **Overlap-aware planning**: tiles are spread evenly so the last tile
//!   ends exactly on the image boundary and adjacent tiles always overlap
//!   by at least the configured minimum
//! - **Edge-replication padding**: images smaller than one tile are padded
//!   with their own border pixels, never black fill
//! - **Seam-free reconstruction**: fade-band weights taper each tile's
//!   contribution toward its edges before accumulation
//! - **Manifest-driven**: a JSON manifest records the partition and is the
//!   only contract between the split and merge phases
//! - **Dataset tooling**: fixed-stride paired image/label cropping into a
//!   train/val/test tree, and in-place label-value remapping
//!
//! ## Architecture
//!
//! - [`plan`] - Pure grid geometry and the manifest format
//! - [`raster`] - Load/save/enumerate glue over the `image` crate
//! - [`split`] - Tiler: extract, pad, persist tiles plus manifest
//! - [`merge`] - Reconstructor: locate, weight, blend inference tiles
//! - [`dataset`] - Training-data cropping and label remapping
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types per layer
//!
//! ## Pipeline
//!
//! ```text
//! images ──> split ──> tiles + manifest ──> [external inference]
//!                                                   │
//! reconstructed images <── merge <── inference tiles┘
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod plan;
pub mod raster;
pub mod split;

// Re-export commonly used types
pub use config::{Cli, Command, DatasetCliConfig, MergeConfig, RemapConfig, SplitConfig};
pub use dataset::{offset_labels, DatasetBuilder, DatasetConfig, DatasetSummary, RemapSummary};
pub use error::{DatasetError, ManifestError, MergeError, PlanError, RasterError, SplitError};
pub use merge::{
    candidate_filenames, MergeReport, MergeSummary, Reconstructor, TileLocator, WeightMask,
};
pub use plan::{
    plan_grid, tile_filename, tile_rect, GridLayout, ImagePlan, TileRect, TileSpec, TilingConfig,
    TilingManifest, MANIFEST_FILENAME,
};
pub use raster::{list_rasters, load_raster, save_raster, Raster, RASTER_EXTENSIONS};
pub use split::{SplitSummary, Tiler, TILES_SUBDIR};
