//! Paired image/label cropping into a train/val/test layout.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::error::{DatasetError, RasterError};
use crate::raster::{list_rasters, load_raster, save_raster};

/// Which partition a source pair was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Train,
    Val,
    Test,
}

impl SplitKind {
    /// Directory name for this partition.
    pub fn dir_name(&self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Val => "val",
            SplitKind::Test => "test",
        }
    }
}

/// Dataset cutter configuration, validated at construction.
#[derive(Debug, Clone, Copy)]
pub struct DatasetConfig {
    crop_size: u32,
    train_ratio: f64,
    val_ratio: f64,
    seed: u64,
}

impl DatasetConfig {
    /// Create a validated configuration.
    ///
    /// The test partition receives whatever `train_ratio + val_ratio`
    /// leaves over.
    ///
    /// # Errors
    ///
    /// Returns a message if the crop size is zero or the ratios are not a
    /// sensible partition of 1.
    pub fn new(
        crop_size: u32,
        train_ratio: f64,
        val_ratio: f64,
        seed: u64,
    ) -> Result<Self, String> {
        if crop_size == 0 {
            return Err("crop_size must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&train_ratio) || !(0.0..=1.0).contains(&val_ratio) {
            return Err("ratios must be within [0, 1]".to_string());
        }
        if train_ratio + val_ratio > 1.0 {
            return Err("train_ratio + val_ratio must not exceed 1".to_string());
        }
        Ok(Self {
            crop_size,
            train_ratio,
            val_ratio,
            seed,
        })
    }

    /// Crop edge length in pixels.
    pub fn crop_size(&self) -> u32 {
        self.crop_size
    }
}

/// Outcome of a dataset build.
#[derive(Debug, Default)]
pub struct DatasetSummary {
    /// Source pairs assigned per partition (train, val, test)
    pub pairs: [usize; 3],

    /// Crop files written (images and labels counted once per pair)
    pub crops_written: usize,

    /// Source files skipped (missing label, dimension mismatch, decode
    /// failure)
    pub skipped: Vec<PathBuf>,
}

/// Cuts paired image/label rasters into a shuffled dataset tree.
pub struct DatasetBuilder {
    config: DatasetConfig,
}

impl DatasetBuilder {
    /// Create a builder from a validated configuration.
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    /// Build the dataset under `output_dir`.
    ///
    /// Layout: `{train,val,test}/{images,labels}/` with crops named
    /// `{stem}_r{row}_c{col}.png`. The shuffle is seeded, so the same
    /// inputs, ratios, and seed reproduce the same partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the image or label directory is missing, there
    /// are no images, or the output tree cannot be created. Per-pair
    /// problems (missing label, mismatched dimensions, unreadable files)
    /// skip the pair and are recorded in the summary.
    pub fn build(
        &self,
        image_dir: &Path,
        label_dir: &Path,
        output_dir: &Path,
    ) -> Result<DatasetSummary, DatasetError> {
        if !image_dir.is_dir() {
            return Err(DatasetError::InputNotFound(image_dir.to_path_buf()));
        }
        if !label_dir.is_dir() {
            return Err(DatasetError::InputNotFound(label_dir.to_path_buf()));
        }

        let mut files = list_rasters(image_dir)?;
        if files.is_empty() {
            return Err(DatasetError::NoInputFiles(image_dir.to_path_buf()));
        }

        // Seeded shuffle keeps the partition reproducible run to run.
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        files.shuffle(&mut rng);

        let total = files.len();
        let train_end = (total as f64 * self.config.train_ratio) as usize;
        let val_end = train_end + (total as f64 * self.config.val_ratio) as usize;

        for kind in [SplitKind::Train, SplitKind::Val, SplitKind::Test] {
            for sub in ["images", "labels"] {
                let dir = output_dir.join(kind.dir_name()).join(sub);
                fs::create_dir_all(&dir)
                    .map_err(|source| RasterError::Io { path: dir.clone(), source })?;
            }
        }

        info!(
            total,
            train = train_end,
            val = val_end - train_end,
            test = total - val_end,
            "building dataset"
        );

        let mut summary = DatasetSummary::default();

        let progress = ProgressBar::new(total as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Cropping [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template")
                .progress_chars("#>-"),
        );

        for (index, path) in files.iter().enumerate() {
            let kind = if index < train_end {
                SplitKind::Train
            } else if index < val_end {
                SplitKind::Val
            } else {
                SplitKind::Test
            };
            progress.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );

            match self.crop_pair(path, label_dir, &output_dir.join(kind.dir_name())) {
                Ok(crops) => {
                    summary.pairs[kind as usize] += 1;
                    summary.crops_written += crops;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping pair");
                    summary.skipped.push(path.clone());
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            train = summary.pairs[0],
            val = summary.pairs[1],
            test = summary.pairs[2],
            crops = summary.crops_written,
            skipped = summary.skipped.len(),
            "dataset complete"
        );

        Ok(summary)
    }

    /// Crop one image/label pair into `<split_dir>/{images,labels}/`.
    ///
    /// Returns the number of crop pairs written. Incomplete edge crops
    /// are dropped, never padded.
    fn crop_pair(
        &self,
        image_path: &Path,
        label_dir: &Path,
        split_dir: &Path,
    ) -> Result<usize, DatasetError> {
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Labels are stored as PNG regardless of the image's format.
        let label_path = label_dir.join(format!("{stem}.png"));
        if !label_path.is_file() {
            return Err(DatasetError::Raster(RasterError::NotFound(label_path)));
        }

        let image = load_raster(image_path)?;
        let label = load_raster(&label_path)?;

        if image.width != label.width || image.height != label.height {
            return Err(DatasetError::DimensionMismatch {
                stem,
                image_width: image.width,
                image_height: image.height,
                label_width: label.width,
                label_height: label.height,
            });
        }

        let crop = self.config.crop_size();
        let mut written = 0;
        for row in 0..image.height.div_ceil(crop) {
            for col in 0..image.width.div_ceil(crop) {
                let left = col * crop;
                let top = row * crop;
                let right = (left + crop).min(image.width);
                let bottom = (top + crop).min(image.height);
                if right - left < crop || bottom - top < crop {
                    continue;
                }

                let name = format!("{stem}_r{row}_c{col}.png");
                let image_crop = image.crop(left, top, crop, crop);
                let label_crop = label.crop(left, top, crop, crop);
                save_raster(&split_dir.join("images").join(&name), &image_crop)?;
                save_raster(&split_dir.join("labels").join(&name), &label_crop)?;
                written += 1;
            }
        }

        Ok(written)
    }
}
