//! Partition planning for large rasters.
//!
//! This module computes how an arbitrarily sized image is cut into
//! fixed-size square tiles, and defines the manifest format that records
//! the partition so it can be reversed after inference.
//!
//! # Components
//!
//! - [`TilingConfig`]: validated tile size / minimum overlap pair
//! - [`GridLayout`]: tile counts and (possibly fractional) strides per axis
//! - [`plan_grid`] / [`tile_rect`]: the pure geometry (no I/O, no state)
//! - [`TileSpec`] / [`ImagePlan`] / [`TilingManifest`]: the persisted
//!   description of a partition, the sole contract between the split and
//!   merge phases
//!
//! # Geometry
//!
//! Tiles are distributed evenly along each axis so that the first tile
//! starts at pixel 0 and the last tile's far edge lands exactly on the
//! image boundary. Whenever more than one tile exists along an axis,
//! adjacent tiles overlap by at least the configured minimum:
//!
//! ```text
//! |<-------- image width -------->|
//! [ tile 0 ]
//!        [ tile 1 ]
//!               [ tile 2 ]
//! |------|                          stride (may be fractional)
//!        |--|                       overlap >= min_overlap
//! ```

mod grid;
mod manifest;

pub use grid::{plan_grid, tile_rect, GridLayout, TileRect, TilingConfig};
pub use manifest::{tile_filename, ImagePlan, TileSpec, TilingManifest, MANIFEST_FILENAME};
