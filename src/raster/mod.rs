//! Raster I/O glue.
//!
//! The tiling core treats image files as opaque pixel buffers; this module
//! is the thin adapter over the `image` crate that loads, saves, and
//! enumerates them. Grayscale files stay single-channel (label masks must
//! round-trip their class indices untouched); everything else is decoded
//! to 8-bit RGB.

mod load;
mod save;

pub use load::load_raster;
pub use save::save_raster;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RasterError;

/// File extensions treated as raster inputs (case-insensitive).
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// In-memory raster: interleaved 8-bit samples, row-major, top-left origin.
///
/// `channels` is 1 (grayscale) or 3 (RGB); `pixels.len()` is always
/// `width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a zero-filled raster.
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            pixels: vec![0; len],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32, channel: u8) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
            + channel as usize
    }

    /// Sample value at `(x, y)` for one channel.
    #[inline]
    pub fn sample(&self, x: u32, y: u32, channel: u8) -> u8 {
        self.pixels[self.index(x, y, channel)]
    }

    /// Overwrite the sample at `(x, y)` for one channel.
    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, channel: u8, value: u8) {
        let idx = self.index(x, y, channel);
        self.pixels[idx] = value;
    }

    /// Copy out the rectangle `[x, x+width) x [y, y+height)`.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle extends past the raster bounds; callers
    /// derive rectangles from the planner, which keeps them inside.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Raster {
        assert!(x + width <= self.width && y + height <= self.height);

        let mut out = Raster::new(width, height, self.channels);
        let row_bytes = width as usize * self.channels as usize;
        for dy in 0..height {
            let src_start = self.index(x, y + dy, 0);
            let dst_start = dy as usize * row_bytes;
            out.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&self.pixels[src_start..src_start + row_bytes]);
        }
        out
    }
}

/// Whether a path has a recognized raster extension.
pub fn is_raster_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            RASTER_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Enumerate raster files directly inside `dir`, sorted by filename.
///
/// Sorting makes downstream id assignment independent of filesystem
/// iteration order.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or is not a directory.
pub fn list_rasters(dir: &Path) -> Result<Vec<PathBuf>, RasterError> {
    if !dir.is_dir() {
        return Err(RasterError::NotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_raster_file(path))
        .collect();
    files.sort();

    Ok(files)
}
