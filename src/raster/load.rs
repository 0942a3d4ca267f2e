//! Raster loading.

use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::error::RasterError;

use super::Raster;

/// Load a raster from disk.
///
/// Grayscale sources (with or without alpha, any bit depth) are narrowed
/// to 8-bit single-channel; everything else becomes 8-bit RGB. Alpha is
/// discarded; tiles are opaque.
///
/// # Errors
///
/// Returns an error if the file is missing, cannot be decoded, or decodes
/// to zero extent.
pub fn load_raster(path: &Path) -> Result<Raster, RasterError> {
    if !path.is_file() {
        return Err(RasterError::NotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|e| RasterError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(RasterError::EmptyExtent(path.to_path_buf()));
    }

    Ok(from_dynamic(img))
}

fn from_dynamic(img: DynamicImage) -> Raster {
    let grayscale = matches!(
        img.color(),
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
    );

    if grayscale {
        let luma = img.into_luma8();
        Raster {
            width: luma.width(),
            height: luma.height(),
            channels: 1,
            pixels: luma.into_raw(),
        }
    } else {
        let rgb = img.into_rgb8();
        Raster {
            width: rgb.width(),
            height: rgb.height(),
            channels: 3,
            pixels: rgb.into_raw(),
        }
    }
}
