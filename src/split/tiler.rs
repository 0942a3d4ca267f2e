//! Splitting large rasters into overlapping tiles.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::error::SplitError;
use crate::plan::{
    plan_grid, tile_filename, tile_rect, ImagePlan, TileSpec, TilingConfig, TilingManifest,
    MANIFEST_FILENAME,
};
use crate::raster::{list_rasters, load_raster, save_raster, Raster};

use super::padding::pad_to_size;

/// Subdirectory of the split output directory that holds the tile files.
pub const TILES_SUBDIR: &str = "tiles";

/// Outcome of a batch split run.
///
/// Per-image failures never abort the batch; they are collected here and
/// reported once at the end.
#[derive(Debug, Default)]
pub struct SplitSummary {
    /// Images successfully tiled
    pub images_processed: usize,

    /// Source files that failed (unreadable, zero extent, write error)
    pub failed: Vec<PathBuf>,

    /// Total tiles written across all images
    pub total_tiles: usize,

    /// Where the manifest was written
    pub manifest_path: PathBuf,
}

/// Splits images into fixed-size overlapping tiles and records the
/// partition in a manifest.
pub struct Tiler {
    config: TilingConfig,
}

impl Tiler {
    /// Create a tiler from a validated configuration.
    pub fn new(config: TilingConfig) -> Self {
        Self { config }
    }

    /// Split one raster into tiles, writing one PNG per tile into
    /// `tiles_dir`.
    ///
    /// Tiles at the right/bottom boundary are shifted inward so every tile
    /// is full-size; only when the whole image is smaller than one tile is
    /// the stored file padded out by edge replication, with the valid
    /// region recorded in the [`TileSpec`].
    ///
    /// # Errors
    ///
    /// Returns an error if planning fails or a tile cannot be written. A
    /// failed image leaves no tiles behind: anything already written for
    /// it is removed before the error is returned.
    pub fn split_image(
        &self,
        image: &Raster,
        image_id: &str,
        original_filename: &str,
        tiles_dir: &Path,
    ) -> Result<ImagePlan, SplitError> {
        let tile_size = self.config.tile_size();
        let grid = plan_grid(image.width, image.height, self.config)?;

        debug!(
            image_id,
            width = image.width,
            height = image.height,
            tiles_x = grid.tiles_x,
            tiles_y = grid.tiles_y,
            "planned grid"
        );

        let mut tiles = Vec::with_capacity(grid.total_tiles());
        let mut written: Vec<PathBuf> = Vec::with_capacity(grid.total_tiles());

        for row in 0..grid.tiles_y {
            for col in 0..grid.tiles_x {
                let rect = tile_rect(&grid, image.width, image.height, tile_size, row, col);
                let actual_width = rect.width();
                let actual_height = rect.height();
                let needs_padding = actual_width < tile_size || actual_height < tile_size;

                let mut tile =
                    image.crop(rect.x_start, rect.y_start, actual_width, actual_height);
                if needs_padding {
                    tile = pad_to_size(&tile, tile_size, tile_size);
                }

                let filename = tile_filename(image_id, row, col);
                let tile_path = tiles_dir.join(&filename);
                if let Err(e) = save_raster(&tile_path, &tile) {
                    remove_partial_tiles(&written);
                    return Err(e.into());
                }
                written.push(tile_path);

                tiles.push(TileSpec {
                    filename,
                    row,
                    col,
                    x_start: rect.x_start,
                    y_start: rect.y_start,
                    x_end: rect.x_end,
                    y_end: rect.y_end,
                    actual_width,
                    actual_height,
                    needs_padding,
                });
            }
        }

        Ok(ImagePlan {
            image_id: image_id.to_string(),
            original_filename: original_filename.to_string(),
            original_width: image.width,
            original_height: image.height,
            tile_size,
            min_overlap: self.config.min_overlap(),
            tiles_x: grid.tiles_x,
            tiles_y: grid.tiles_y,
            stride_x: grid.stride_x,
            stride_y: grid.stride_y,
            total_tiles: tiles.len(),
            tiles,
        })
    }

    /// Split every raster in `input_dir`, writing tiles under
    /// `<output_dir>/tiles/` and the manifest once at the end.
    ///
    /// Image ids are `img_{index:04}` in sorted-filename order, so a rerun
    /// over the same inputs produces an identical manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the input directory is missing, contains no
    /// raster files, the output directories cannot be created, or the
    /// manifest cannot be written. Individual image failures are recorded
    /// in the summary instead.
    pub fn split_all(&self, input_dir: &Path, output_dir: &Path) -> Result<SplitSummary, SplitError> {
        if !input_dir.is_dir() {
            return Err(SplitError::InputNotFound(input_dir.to_path_buf()));
        }

        let files = list_rasters(input_dir)?;
        if files.is_empty() {
            return Err(SplitError::NoInputFiles(input_dir.to_path_buf()));
        }

        let tiles_dir = output_dir.join(TILES_SUBDIR);
        fs::create_dir_all(&tiles_dir).map_err(|source| crate::error::RasterError::Io {
            path: tiles_dir.clone(),
            source,
        })?;

        info!(count = files.len(), "splitting images");

        let mut manifest = TilingManifest::new();
        let mut summary = SplitSummary::default();

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Splitting [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template")
                .progress_chars("#>-"),
        );

        for (index, path) in files.iter().enumerate() {
            let image_id = format!("img_{index:04}");
            let original_filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| image_id.clone());
            progress.set_message(original_filename.clone());

            match self.split_one(path, &image_id, &original_filename, &tiles_dir) {
                Ok(plan) => {
                    summary.images_processed += 1;
                    summary.total_tiles += plan.total_tiles;
                    manifest.push(plan);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping image");
                    summary.failed.push(path.clone());
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let manifest_path = output_dir.join(MANIFEST_FILENAME);
        manifest.save(&manifest_path)?;
        summary.manifest_path = manifest_path;

        info!(
            processed = summary.images_processed,
            failed = summary.failed.len(),
            tiles = summary.total_tiles,
            "split complete"
        );

        Ok(summary)
    }

    fn split_one(
        &self,
        path: &Path,
        image_id: &str,
        original_filename: &str,
        tiles_dir: &Path,
    ) -> Result<ImagePlan, SplitError> {
        let image = load_raster(path)?;
        self.split_image(&image, image_id, original_filename, tiles_dir)
    }
}

/// Best-effort cleanup so a failed image leaves no tiles behind.
fn remove_partial_tiles(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            warn!(file = %path.display(), error = %e, "could not remove partial tile");
        }
    }
}
