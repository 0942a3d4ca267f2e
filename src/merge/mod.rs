//! Reconstruction phase: blend per-tile inference results back into the
//! original image geometry.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Reconstructor                  │
//! │  ┌────────────┐  ┌────────────────────────┐  │
//! │  │ TileLocator│  │ acc / weight buffers   │  │
//! │  │ (fallback  │  │ (f32, owned per image) │  │
//! │  │  names)    │  └────────────────────────┘  │
//! │  └────────────┘  ┌────────────────────────┐  │
//! │                  │ WeightMask (fade band) │  │
//! │                  └────────────────────────┘  │
//! └──────────────────────┬───────────────────────┘
//!                        │ reads
//!                        ▼
//!               manifest + inference tiles
//! ```
//!
//! Overlap conflicts are resolved by distance-weighted averaging: each
//! tile's contribution fades out toward its edges, so adjoining tiles
//! hand over smoothly instead of leaving seams.

mod locate;
mod reconstructor;
mod weights;

pub use locate::{candidate_filenames, TileLocator};
pub use reconstructor::{MergeReport, MergeSummary, Reconstructor, MERGED_SUFFIX};
pub use weights::{axis_ramp, fade_width, WeightMask, MAX_FADE};
