//! Tiling phase: cut large rasters into overlapping fixed-size tiles.
//!
//! The [`Tiler`] consumes the planner's geometry, extracts (and, for
//! images smaller than one tile, edge-pads) each tile, persists the tile
//! files, and records the partition in the manifest that the merge phase
//! later reverses.
//!
//! ```text
//! input dir ──> Tiler::split_all ──> <output>/tiles/*.png
//!                                    <output>/tiling_info.json
//! ```

mod padding;
mod tiler;

pub use padding::pad_to_size;
pub use tiler::{SplitSummary, Tiler, TILES_SUBDIR};
