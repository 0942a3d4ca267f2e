//! Raster saving.

use std::path::Path;

use image::{GrayImage, RgbImage};

use crate::error::RasterError;

use super::Raster;

/// Save a raster to disk, format inferred from the extension.
///
/// Tiles and reconstructed outputs are written as PNG by the callers in
/// this crate; lossy formats would corrupt label masks.
///
/// # Errors
///
/// Returns an error if the buffer shape is inconsistent or the encoder
/// fails.
pub fn save_raster(path: &Path, raster: &Raster) -> Result<(), RasterError> {
    match raster.channels {
        1 => {
            let img = GrayImage::from_raw(raster.width, raster.height, raster.pixels.clone())
                .ok_or_else(|| shape_error(path, raster))?;
            img.save(path).map_err(|e| RasterError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        3 => {
            let img = RgbImage::from_raw(raster.width, raster.height, raster.pixels.clone())
                .ok_or_else(|| shape_error(path, raster))?;
            img.save(path).map_err(|e| RasterError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        other => Err(RasterError::Encode {
            path: path.to_path_buf(),
            message: format!("unsupported channel count {other}"),
        }),
    }
}

fn shape_error(path: &Path, raster: &Raster) -> RasterError {
    RasterError::Encode {
        path: path.to_path_buf(),
        message: format!(
            "pixel buffer length {} does not match {}x{}x{}",
            raster.pixels.len(),
            raster.width,
            raster.height,
            raster.channels
        ),
    }
}
