//! Edge-replication padding.

use crate::raster::Raster;

/// Pad a raster to `target_width x target_height` by replicating the
/// nearest border pixel outward.
///
/// The source lands in the top-left corner; the new right and bottom
/// margins repeat the last column and row. Replication (instead of a
/// constant fill) keeps the padded region statistically similar to the
/// image border, so downstream inference never sees an artificial black
/// band.
///
/// Dimensions already at or above the target are left unchanged on that
/// axis.
pub fn pad_to_size(src: &Raster, target_width: u32, target_height: u32) -> Raster {
    let width = src.width.max(target_width);
    let height = src.height.max(target_height);
    if width == src.width && height == src.height {
        return src.clone();
    }

    let mut out = Raster::new(width, height, src.channels);
    for y in 0..height {
        let sy = y.min(src.height - 1);
        for x in 0..width {
            let sx = x.min(src.width - 1);
            for c in 0..src.channels {
                out.set_sample(x, y, c, src.sample(sx, sy, c));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut raster = Raster::new(width, height, 3);
        for y in 0..height {
            for x in 0..width {
                raster.set_sample(x, y, 0, (x % 256) as u8);
                raster.set_sample(x, y, 1, (y % 256) as u8);
                raster.set_sample(x, y, 2, 128);
            }
        }
        raster
    }

    #[test]
    fn test_no_padding_needed_is_identity() {
        let src = gradient(8, 8);
        let out = pad_to_size(&src, 8, 8);
        assert_eq!(out, src);

        let out = pad_to_size(&src, 4, 4);
        assert_eq!(out, src);
    }

    #[test]
    fn test_pad_replicates_border_not_black() {
        let src = gradient(4, 3);
        let out = pad_to_size(&src, 8, 8);

        assert_eq!(out.width, 8);
        assert_eq!(out.height, 8);

        // Original region untouched
        assert_eq!(out.sample(2, 1, 0), src.sample(2, 1, 0));

        // Right margin repeats the last column
        assert_eq!(out.sample(7, 1, 0), src.sample(3, 1, 0));
        assert_eq!(out.sample(7, 1, 1), src.sample(3, 1, 1));

        // Bottom margin repeats the last row
        assert_eq!(out.sample(1, 7, 1), src.sample(1, 2, 1));

        // Corner repeats the corner pixel, never zero-filled
        assert_eq!(out.sample(7, 7, 0), src.sample(3, 2, 0));
        assert_eq!(out.sample(7, 7, 2), 128);
    }

    #[test]
    fn test_pad_single_axis() {
        let src = gradient(8, 3);
        let out = pad_to_size(&src, 8, 6);
        assert_eq!(out.width, 8);
        assert_eq!(out.height, 6);
        assert_eq!(out.sample(5, 5, 1), src.sample(5, 2, 1));
    }

    #[test]
    fn test_pad_grayscale() {
        let mut src = Raster::new(2, 2, 1);
        src.set_sample(1, 1, 0, 77);
        let out = pad_to_size(&src, 4, 4);
        assert_eq!(out.channels, 1);
        assert_eq!(out.sample(3, 3, 0), 77);
    }
}
