//! seamtile - overlap-aware raster tiling for tile-based ML inference.
//!
//! This binary dispatches the split/merge/dataset/remap subcommands.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seamtile::{
    config::{Cli, Command, DatasetCliConfig, MergeConfig, RemapConfig, SplitConfig},
    dataset::{offset_labels, DatasetBuilder, DatasetConfig},
    merge::Reconstructor,
    plan::TilingConfig,
    split::Tiler,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Split(config) => run_split(config),
        Command::Merge(config) => run_merge(config),
        Command::Dataset(config) => run_dataset(config),
        Command::Remap(config) => run_remap(config),
    }
}

// =============================================================================
// Split Command
// =============================================================================

fn run_split(config: SplitConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Input dir:   {}", config.input_dir.display());
    info!("  Output dir:  {}", config.output_dir.display());
    info!("  Tile size:   {}x{}", config.tile_size, config.tile_size);
    info!("  Min overlap: {} px", config.min_overlap);

    let tiling = match TilingConfig::new(config.tile_size, config.min_overlap) {
        Ok(tiling) => tiling,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tiler = Tiler::new(tiling);
    match tiler.split_all(&config.input_dir, &config.output_dir) {
        Ok(summary) => {
            info!("Split complete:");
            info!("  Images tiled: {}", summary.images_processed);
            info!("  Tiles written: {}", summary.total_tiles);
            info!("  Manifest: {}", summary.manifest_path.display());
            report_failed_paths(&summary.failed);
            // Per-file failures are reported, not fatal.
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Split failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Merge Command
// =============================================================================

fn run_merge(config: MergeConfig) -> ExitCode {
    init_logging(config.verbose);

    info!("Configuration:");
    info!("  Manifest:      {}", config.manifest.display());
    info!("  Inference dir: {}", config.inference_dir.display());
    info!("  Output dir:    {}", config.output_dir.display());

    let reconstructor = Reconstructor::new();
    match reconstructor.merge_all(&config.manifest, &config.inference_dir, &config.output_dir) {
        Ok(summary) => {
            info!("Merge complete:");
            info!("  Images reconstructed: {}", summary.images_merged);
            if summary.missing_tiles > 0 {
                warn!("  Missing inference tiles: {}", summary.missing_tiles);
            }
            if summary.skipped_tiles > 0 {
                warn!("  Skipped inference tiles: {}", summary.skipped_tiles);
            }
            if !summary.failed.is_empty() {
                warn!("  Failed images: {}", summary.failed.len());
                for name in &summary.failed {
                    warn!("    - {}", name);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Merge failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Dataset Command
// =============================================================================

fn run_dataset(config: DatasetCliConfig) -> ExitCode {
    init_logging(config.verbose);

    let dataset_config = match DatasetConfig::new(
        config.crop_size,
        config.train_ratio,
        config.val_ratio,
        config.seed,
    ) {
        Ok(dataset_config) => dataset_config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  Image dir:  {}", config.image_dir.display());
    info!("  Label dir:  {}", config.label_dir.display());
    info!("  Output dir: {}", config.output_dir.display());
    info!("  Crop size:  {}x{}", config.crop_size, config.crop_size);
    info!(
        "  Split:      {:.0}% train / {:.0}% val / {:.0}% test (seed {})",
        config.train_ratio * 100.0,
        config.val_ratio * 100.0,
        (1.0 - config.train_ratio - config.val_ratio).max(0.0) * 100.0,
        config.seed
    );

    let builder = DatasetBuilder::new(dataset_config);
    match builder.build(&config.image_dir, &config.label_dir, &config.output_dir) {
        Ok(summary) => {
            info!("Dataset complete:");
            info!(
                "  Pairs: {} train / {} val / {} test",
                summary.pairs[0], summary.pairs[1], summary.pairs[2]
            );
            info!("  Crops written: {}", summary.crops_written);
            report_failed_paths(&summary.skipped);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Dataset build failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Remap Command
// =============================================================================

fn run_remap(config: RemapConfig) -> ExitCode {
    init_logging(config.verbose);

    info!("Configuration:");
    info!("  Labels dir: {}", config.labels_dir.display());
    info!("  Offset:     {:+}", config.offset);

    match offset_labels(&config.labels_dir, config.offset) {
        Ok(summary) => {
            info!("Remap complete:");
            info!("  Masks rewritten: {}", summary.processed);
            if !summary.skipped.is_empty() {
                warn!("  Skipped (not single-channel): {}", summary.skipped.len());
            }
            report_failed_paths(&summary.failed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Remap failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Log the per-item failure list, if any.
fn report_failed_paths(failed: &[std::path::PathBuf]) {
    if failed.is_empty() {
        return;
    }
    warn!("  Failed files: {}", failed.len());
    for path in failed {
        warn!("    - {}", path.display());
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "seamtile=debug"
    } else {
        "seamtile=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
