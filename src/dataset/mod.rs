//! Training-dataset preparation.
//!
//! The inference pipeline (`split`/`merge`) is overlap-aware; training
//! data has no reconstruction step, so this module keeps the simpler
//! fixed-stride cutter: paired image/label crops on a plain grid,
//! incomplete edge crops dropped, and the pairs shuffled into a
//! train/val/test directory layout.
//!
//! Also hosts the label-mask value remapper that shifts class indices in
//! place across an existing dataset tree.

mod remap;
mod splitter;

pub use remap::{offset_labels, RemapSummary};
pub use splitter::{DatasetBuilder, DatasetConfig, DatasetSummary, SplitKind};
