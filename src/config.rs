//! Configuration management for seamtile.
//!
//! Command-line arguments via clap, with environment-variable fallbacks
//! under the `SEAMTILE_` prefix and named constants for every default.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use seamtile::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.command {
//!     Command::Split(config) => { /* ... */ }
//!     _ => {}
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `SEAMTILE_TILE_SIZE` - Tile edge length in pixels (default: 512)
//! - `SEAMTILE_MIN_OVERLAP` - Minimum tile overlap in pixels (default: 64)
//! - `SEAMTILE_CROP_SIZE` - Dataset crop edge length (default: 512)
//! - `SEAMTILE_SEED` - Dataset shuffle seed (default: 42)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Default Values
// =============================================================================

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Default minimum overlap between adjacent tiles in pixels.
pub const DEFAULT_MIN_OVERLAP: u32 = 64;

/// Default dataset crop edge length in pixels.
pub const DEFAULT_CROP_SIZE: u32 = 512;

/// Default share of source images assigned to the training partition.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;

/// Default share of source images assigned to the validation partition.
pub const DEFAULT_VAL_RATIO: f64 = 0.2;

/// Default dataset shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default label-mask pixel offset.
pub const DEFAULT_LABEL_OFFSET: i32 = 1;

// =============================================================================
// CLI
// =============================================================================

/// seamtile - overlap-aware raster tiling for tile-based ML inference.
///
/// Splits large images into fixed-size overlapping tiles, and
/// reconstructs full-resolution outputs from per-tile inference results
/// using seam-free weighted blending.
#[derive(Parser, Debug, Clone)]
#[command(name = "seamtile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split large rasters into overlapping tiles and write a manifest.
    Split(SplitConfig),

    /// Reconstruct full-resolution images from per-tile inference results.
    Merge(MergeConfig),

    /// Cut paired image/label rasters into a shuffled train/val/test dataset.
    Dataset(DatasetCliConfig),

    /// Shift every pixel value of single-channel label masks in place.
    Remap(RemapConfig),
}

// =============================================================================
// Split
// =============================================================================

/// Configuration for the split subcommand.
#[derive(Args, Debug, Clone)]
pub struct SplitConfig {
    /// Directory containing the source images.
    #[arg(long, value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Directory to write tiles and the manifest into.
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "SEAMTILE_TILE_SIZE")]
    pub tile_size: u32,

    /// Minimum overlap between adjacent tiles in pixels.
    #[arg(long, default_value_t = DEFAULT_MIN_OVERLAP, env = "SEAMTILE_MIN_OVERLAP")]
    pub min_overlap: u32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl SplitConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }
        if self.min_overlap >= self.tile_size {
            return Err(format!(
                "min_overlap ({}) must be smaller than tile_size ({})",
                self.min_overlap, self.tile_size
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Merge
// =============================================================================

/// Configuration for the merge subcommand.
#[derive(Args, Debug, Clone)]
pub struct MergeConfig {
    /// Path to the tiling manifest written by the split step.
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Directory containing per-tile inference results.
    #[arg(long, value_name = "DIR")]
    pub inference_dir: PathBuf,

    /// Directory to write reconstructed images into.
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Dataset
// =============================================================================

/// Configuration for the dataset subcommand.
#[derive(Args, Debug, Clone)]
pub struct DatasetCliConfig {
    /// Directory containing the source images.
    #[arg(long, value_name = "DIR")]
    pub image_dir: PathBuf,

    /// Directory containing the paired label masks.
    #[arg(long, value_name = "DIR")]
    pub label_dir: PathBuf,

    /// Root directory for the train/val/test tree.
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Crop edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_CROP_SIZE, env = "SEAMTILE_CROP_SIZE")]
    pub crop_size: u32,

    /// Share of images assigned to training (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO)]
    pub train_ratio: f64,

    /// Share of images assigned to validation (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_VAL_RATIO)]
    pub val_ratio: f64,

    /// Shuffle seed for the partition.
    #[arg(long, default_value_t = DEFAULT_SEED, env = "SEAMTILE_SEED")]
    pub seed: u64,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Remap
// =============================================================================

/// Configuration for the remap subcommand.
#[derive(Args, Debug, Clone)]
pub struct RemapConfig {
    /// Directory searched recursively for label-mask PNGs.
    #[arg(long, value_name = "DIR")]
    pub labels_dir: PathBuf,

    /// Offset added to every pixel value (may be negative).
    #[arg(long, default_value_t = DEFAULT_LABEL_OFFSET, allow_hyphen_values = true)]
    pub offset: i32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn split_config() -> SplitConfig {
        SplitConfig {
            input_dir: PathBuf::from("/in"),
            output_dir: PathBuf::from("/out"),
            tile_size: DEFAULT_TILE_SIZE,
            min_overlap: DEFAULT_MIN_OVERLAP,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_split_config() {
        assert!(split_config().validate().is_ok());
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let mut config = split_config();
        config.tile_size = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("tile_size"));
    }

    #[test]
    fn test_overlap_at_least_tile_size_rejected() {
        let mut config = split_config();
        config.min_overlap = config.tile_size;
        assert!(config.validate().is_err());

        config.min_overlap = config.tile_size + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_overlap_allowed() {
        let mut config = split_config();
        config.min_overlap = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_parses_split() {
        let cli = Cli::try_parse_from([
            "seamtile",
            "split",
            "--input-dir",
            "/data/in",
            "--output-dir",
            "/data/out",
            "--tile-size",
            "256",
            "--min-overlap",
            "32",
        ])
        .unwrap();

        match cli.command {
            Command::Split(config) => {
                assert_eq!(config.input_dir, PathBuf::from("/data/in"));
                assert_eq!(config.tile_size, 256);
                assert_eq!(config.min_overlap, 32);
            }
            _ => panic!("expected split subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_merge() {
        let cli = Cli::try_parse_from([
            "seamtile",
            "merge",
            "--manifest",
            "/data/out/tiling_info.json",
            "--inference-dir",
            "/data/pred",
            "--output-dir",
            "/data/merged",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Merge(_)));
    }

    #[test]
    fn test_cli_parses_remap_negative_offset() {
        let cli = Cli::try_parse_from([
            "seamtile",
            "remap",
            "--labels-dir",
            "/data/dataset",
            "--offset",
            "-1",
        ])
        .unwrap();

        match cli.command {
            Command::Remap(config) => assert_eq!(config.offset, -1),
            _ => panic!("expected remap subcommand"),
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from([
            "seamtile",
            "split",
            "--input-dir",
            "/in",
            "--output-dir",
            "/out",
        ])
        .unwrap();

        match cli.command {
            Command::Split(config) => {
                assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
                assert_eq!(config.min_overlap, DEFAULT_MIN_OVERLAP);
                assert!(!config.verbose);
            }
            _ => panic!("expected split subcommand"),
        }
    }

    #[test]
    fn test_cli_requires_paths() {
        assert!(Cli::try_parse_from(["seamtile", "split"]).is_err());
        assert!(Cli::try_parse_from(["seamtile", "merge"]).is_err());
    }
}
