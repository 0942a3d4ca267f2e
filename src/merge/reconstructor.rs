//! Reassembling full-resolution images from per-tile inference results.

use std::fs;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::error::{MergeError, RasterError};
use crate::plan::{ImagePlan, TilingManifest};
use crate::raster::{load_raster, save_raster, Raster};

use super::locate::TileLocator;
use super::weights::WeightMask;

/// Suffix appended to the original stem for reconstructed outputs.
pub const MERGED_SUFFIX: &str = "_merged";

/// Per-image account of tiles that could not contribute.
///
/// None of these abort the image: a missing or unusable tile simply
/// contributes zero weight and its region is left to whatever overlapping
/// tiles remain.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Tiles with no discoverable inference result
    pub missing_tiles: Vec<String>,

    /// Tiles whose inference result existed but could not be decoded
    pub unreadable_tiles: Vec<String>,

    /// Tiles whose inference result had the wrong geometry or channels
    pub mismatched_tiles: Vec<String>,
}

impl MergeReport {
    /// Whether every tile contributed.
    pub fn is_clean(&self) -> bool {
        self.missing_tiles.is_empty()
            && self.unreadable_tiles.is_empty()
            && self.mismatched_tiles.is_empty()
    }
}

/// Outcome of a batch merge run.
#[derive(Debug, Default)]
pub struct MergeSummary {
    /// Images successfully reconstructed and saved
    pub images_merged: usize,

    /// Images that failed outright (save error, all-zero extent, ...)
    pub failed: Vec<String>,

    /// Missing inference tiles across all images
    pub missing_tiles: usize,

    /// Unreadable or geometry-mismatched inference tiles across all images
    pub skipped_tiles: usize,
}

/// Reconstructs original-geometry images by distance-weighted blending of
/// overlapping inference tiles.
///
/// The reconstructor exclusively owns its accumulation and weight buffers
/// for the duration of one image's merge; tile rasters are read-only
/// inputs.
#[derive(Debug, Default)]
pub struct Reconstructor {}

impl Reconstructor {
    /// Create a reconstructor.
    pub fn new() -> Self {
        Self {}
    }

    /// Output filename for a reconstructed image.
    pub fn output_filename(original_filename: &str) -> String {
        let stem = Path::new(original_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| original_filename.to_string());
        format!("{stem}{MERGED_SUFFIX}.png")
    }

    /// Rebuild one image from the tiles recorded in its plan.
    ///
    /// Every located tile is cropped back to its originally-valid region
    /// (inverting split-time padding), weighted by the fade-band mask, and
    /// accumulated into floating-point buffers; the final pixel is the
    /// weight-normalized average. Pixels no tile covered stay zero.
    ///
    /// # Errors
    ///
    /// Returns an error only for conditions that invalidate the whole
    /// image, such as a plan with zero extent. Missing and unusable tiles
    /// are reported in the [`MergeReport`].
    pub fn merge_image(
        &self,
        plan: &ImagePlan,
        inference_dir: &Path,
    ) -> Result<(Raster, MergeReport), MergeError> {
        let width = plan.original_width as usize;
        let height = plan.original_height as usize;
        if width == 0 || height == 0 {
            return Err(MergeError::Raster(RasterError::EmptyExtent(
                std::path::PathBuf::from(&plan.original_filename),
            )));
        }

        let locator = TileLocator::new(inference_dir);
        let mut report = MergeReport::default();

        let mut weight = vec![0.0f32; width * height];
        // Accumulator is allocated lazily once the first tile reveals the
        // channel count.
        let mut acc: Option<Vec<f32>> = None;
        let mut channels: u8 = 0;

        for spec in &plan.tiles {
            let Some(tile_path) = locator.locate(&spec.filename) else {
                report.missing_tiles.push(spec.filename.clone());
                continue;
            };

            let tile = match load_raster(&tile_path) {
                Ok(tile) => tile,
                Err(e) => {
                    warn!(tile = %spec.filename, error = %e, "unreadable inference tile");
                    report.unreadable_tiles.push(spec.filename.clone());
                    continue;
                }
            };

            if tile.width < spec.actual_width || tile.height < spec.actual_height {
                let e = MergeError::TileSizeMismatch {
                    filename: spec.filename.clone(),
                    need_width: spec.actual_width,
                    need_height: spec.actual_height,
                    got_width: tile.width,
                    got_height: tile.height,
                };
                warn!(error = %e, "skipping inference tile");
                report.mismatched_tiles.push(spec.filename.clone());
                continue;
            }

            // Channel count follows the first tile that loads.
            if channels == 0 {
                channels = tile.channels;
            }
            if tile.channels != channels {
                warn!(
                    tile = %spec.filename,
                    expected = channels,
                    got = tile.channels,
                    "skipping tile with unexpected channel count"
                );
                report.mismatched_tiles.push(spec.filename.clone());
                continue;
            }
            let acc_buf =
                acc.get_or_insert_with(|| vec![0.0f32; width * height * channels as usize]);

            // Only the originally-valid region participates; split-time
            // padding is cut away here.
            let valid = tile.crop(0, 0, spec.actual_width, spec.actual_height);
            let mask = WeightMask::new(spec.actual_width, spec.actual_height);

            for dy in 0..spec.actual_height {
                let y = (spec.y_start + dy) as usize;
                for dx in 0..spec.actual_width {
                    let x = (spec.x_start + dx) as usize;
                    let w = mask.at(dx, dy);
                    let pixel = y * width + x;
                    weight[pixel] += w;
                    for c in 0..channels {
                        acc_buf[pixel * channels as usize + c as usize] +=
                            f32::from(valid.sample(dx, dy, c)) * w;
                    }
                }
            }
        }

        // All tiles missing: emit a zero RGB image of the right geometry.
        let (acc_buf, channels) = match acc {
            Some(buf) => (buf, channels),
            None => (vec![0.0f32; width * height * 3], 3),
        };

        let mut out = Raster::new(plan.original_width, plan.original_height, channels);
        for pixel in 0..width * height {
            // Covering guarantees weight > 0 everywhere a tile exists;
            // guard anyway so an uncovered region divides by 1, not 0.
            let w = if weight[pixel] == 0.0 { 1.0 } else { weight[pixel] };
            for c in 0..channels as usize {
                let value = (acc_buf[pixel * channels as usize + c] / w)
                    .clamp(0.0, 255.0)
                    .round() as u8;
                out.pixels[pixel * channels as usize + c] = value;
            }
        }

        debug!(
            image_id = %plan.image_id,
            missing = report.missing_tiles.len(),
            mismatched = report.mismatched_tiles.len(),
            "merged image"
        );

        Ok((out, report))
    }

    /// Reconstruct every image recorded in the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or corrupt, the
    /// inference directory does not exist, or the output directory cannot
    /// be created. Per-image failures are recorded in the summary and do
    /// not abort the batch.
    pub fn merge_all(
        &self,
        manifest_path: &Path,
        inference_dir: &Path,
        output_dir: &Path,
    ) -> Result<MergeSummary, MergeError> {
        let manifest = TilingManifest::load(manifest_path)?;

        if !inference_dir.is_dir() {
            return Err(MergeError::InputNotFound(inference_dir.to_path_buf()));
        }
        fs::create_dir_all(output_dir).map_err(|source| RasterError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        info!(images = manifest.len(), "reconstructing images");

        let mut summary = MergeSummary::default();

        let progress = ProgressBar::new(manifest.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Merging [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template")
                .progress_chars("#>-"),
        );

        for plan in &manifest.images {
            progress.set_message(plan.original_filename.clone());

            match self.merge_one(plan, inference_dir, output_dir) {
                Ok(report) => {
                    summary.images_merged += 1;
                    summary.missing_tiles += report.missing_tiles.len();
                    summary.skipped_tiles +=
                        report.unreadable_tiles.len() + report.mismatched_tiles.len();
                    if !report.missing_tiles.is_empty() {
                        warn!(
                            image = %plan.original_filename,
                            missing = report.missing_tiles.len(),
                            "inference tiles missing"
                        );
                    }
                }
                Err(e) => {
                    warn!(image = %plan.original_filename, error = %e, "reconstruction failed");
                    summary.failed.push(plan.original_filename.clone());
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            merged = summary.images_merged,
            failed = summary.failed.len(),
            missing_tiles = summary.missing_tiles,
            "merge complete"
        );

        Ok(summary)
    }

    fn merge_one(
        &self,
        plan: &ImagePlan,
        inference_dir: &Path,
        output_dir: &Path,
    ) -> Result<MergeReport, MergeError> {
        let (image, report) = self.merge_image(plan, inference_dir)?;
        let output_path = output_dir.join(Self::output_filename(&plan.original_filename));
        save_raster(&output_path, &image)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::TilingConfig;
    use crate::split::Tiler;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut raster = Raster::new(width, height, 3);
        for y in 0..height {
            for x in 0..width {
                raster.set_sample(x, y, 0, (x % 251) as u8);
                raster.set_sample(x, y, 1, (y % 241) as u8);
                raster.set_sample(x, y, 2, ((x * 3 + y) % 239) as u8);
            }
        }
        raster
    }

    fn split(image: &Raster, tile_size: u32, min_overlap: u32, dir: &Path) -> ImagePlan {
        let tiler = Tiler::new(TilingConfig::new(tile_size, min_overlap).unwrap());
        tiler
            .split_image(image, "img_0000", "scene.png", dir)
            .unwrap()
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            Reconstructor::output_filename("scene.png"),
            "scene_merged.png"
        );
        assert_eq!(
            Reconstructor::output_filename("aerial.TIF"),
            "aerial_merged.png"
        );
    }

    #[test]
    fn test_roundtrip_reproduces_source() {
        // Tiles copied verbatim as "inference results" must reconstruct
        // the original: exact outside overlaps, within rounding inside.
        let dir = tempfile::tempdir().unwrap();
        let image = gradient(300, 200);
        let plan = split(&image, 128, 16, dir.path());

        let (merged, report) = Reconstructor::new()
            .merge_image(&plan, dir.path())
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(merged.width, 300);
        assert_eq!(merged.height, 200);
        assert_eq!(merged.channels, 3);
        for y in 0..200 {
            for x in 0..300 {
                for c in 0..3 {
                    let got = i32::from(merged.sample(x, y, c));
                    let want = i32::from(image.sample(x, y, c));
                    assert!(
                        (got - want).abs() <= 1,
                        "pixel ({x},{y}) channel {c}: got {got}, want {want}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_roundtrip_exact_in_non_overlap_region() {
        let dir = tempfile::tempdir().unwrap();
        let image = gradient(300, 200);
        let plan = split(&image, 128, 16, dir.path());

        let (merged, _) = Reconstructor::new()
            .merge_image(&plan, dir.path())
            .unwrap();

        // The center of the first tile is covered by exactly one tile, so
        // the weighted average is the value itself.
        assert_eq!(merged.sample(40, 40, 0), image.sample(40, 40, 0));
        assert_eq!(merged.sample(40, 40, 2), image.sample(40, 40, 2));
    }

    #[test]
    fn test_padded_tile_cropped_back() {
        let dir = tempfile::tempdir().unwrap();
        let image = gradient(100, 80);
        let plan = split(&image, 128, 16, dir.path());
        assert!(plan.tiles[0].needs_padding);

        let (merged, report) = Reconstructor::new()
            .merge_image(&plan, dir.path())
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(merged.width, 100);
        assert_eq!(merged.height, 80);
        assert_eq!(merged.sample(99, 79, 0), image.sample(99, 79, 0));
    }

    #[test]
    fn test_missing_tile_is_resilient() {
        let dir = tempfile::tempdir().unwrap();
        let image = gradient(300, 200);
        let plan = split(&image, 128, 16, dir.path());

        // Remove one tile's "inference result".
        let victim = &plan.tiles[0].filename;
        std::fs::remove_file(dir.path().join(victim)).unwrap();

        let (merged, report) = Reconstructor::new()
            .merge_image(&plan, dir.path())
            .unwrap();

        assert_eq!(report.missing_tiles, vec![victim.clone()]);
        assert_eq!(merged.width, 300);
        assert_eq!(merged.height, 200);

        // Pixels still covered by surviving tiles keep sane values.
        assert_eq!(merged.sample(299, 199, 0), image.sample(299, 199, 0));
    }

    #[test]
    fn test_all_tiles_missing_yields_zero_image() {
        let dir = tempfile::tempdir().unwrap();
        let empty = tempfile::tempdir().unwrap();
        let image = gradient(64, 64);
        let plan = split(&image, 32, 4, dir.path());

        let (merged, report) = Reconstructor::new()
            .merge_image(&plan, empty.path())
            .unwrap();

        assert_eq!(report.missing_tiles.len(), plan.tiles.len());
        assert_eq!(merged.channels, 3);
        assert!(merged.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_undersized_tile_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let image = gradient(300, 200);
        let plan = split(&image, 128, 16, dir.path());

        // Replace one tile with a smaller raster.
        let victim = &plan.tiles[0].filename;
        let small = gradient(16, 16);
        save_raster(&dir.path().join(victim), &small).unwrap();

        let (_, report) = Reconstructor::new()
            .merge_image(&plan, dir.path())
            .unwrap();
        assert_eq!(report.mismatched_tiles, vec![victim.clone()]);
    }

    #[test]
    fn test_merge_all_batch() {
        let input = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let image = gradient(96, 64);
        save_raster(&input.path().join("scene.png"), &image).unwrap();

        let tiler = Tiler::new(TilingConfig::new(64, 8).unwrap());
        let summary = tiler.split_all(input.path(), work.path()).unwrap();

        let merge_summary = Reconstructor::new()
            .merge_all(
                &summary.manifest_path,
                &work.path().join(crate::split::TILES_SUBDIR),
                output.path(),
            )
            .unwrap();

        assert_eq!(merge_summary.images_merged, 1);
        assert!(merge_summary.failed.is_empty());
        assert!(output.path().join("scene_merged.png").is_file());
    }

    #[test]
    fn test_merge_all_missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = Reconstructor::new().merge_all(
            &dir.path().join("absent.json"),
            dir.path(),
            dir.path(),
        );
        assert!(matches!(
            result,
            Err(MergeError::Manifest(crate::error::ManifestError::NotFound(_)))
        ));
    }

    #[test]
    fn test_merge_all_missing_inference_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("m.json");
        TilingManifest::new().save(&manifest_path).unwrap();

        let result = Reconstructor::new().merge_all(
            &manifest_path,
            Path::new("/no/such/inference"),
            dir.path(),
        );
        assert!(matches!(result, Err(MergeError::InputNotFound(_))));
    }
}
