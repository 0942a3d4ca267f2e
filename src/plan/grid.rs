//! Pure grid geometry.
//!
//! Everything in this file is deterministic arithmetic over image
//! dimensions. Keeping it free of I/O makes the covering and overlap
//! guarantees directly unit-testable.

use crate::error::PlanError;

/// Tile size and minimum overlap, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilingConfig {
    tile_size: u32,
    min_overlap: u32,
}

impl TilingConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `tile_size` is zero or `min_overlap >= tile_size`.
    pub fn new(tile_size: u32, min_overlap: u32) -> Result<Self, PlanError> {
        if tile_size == 0 {
            return Err(PlanError::ZeroTileSize);
        }
        if min_overlap >= tile_size {
            return Err(PlanError::OverlapTooLarge {
                min_overlap,
                tile_size,
            });
        }
        Ok(Self {
            tile_size,
            min_overlap,
        })
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Minimum overlap between adjacent tiles in pixels.
    pub fn min_overlap(&self) -> u32 {
        self.min_overlap
    }
}

/// The planned grid for one image: tile counts and origin spacing per axis.
///
/// Strides are real-valued: when tiles must be distributed evenly across an
/// axis the spacing is an exact division and generally fractional. Tile
/// origins are rounded per tile in [`tile_rect`], never accumulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub stride_x: f64,
    pub stride_y: f64,
}

impl GridLayout {
    /// Total number of tiles in the grid.
    pub fn total_tiles(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }
}

/// Pixel rectangle of one tile in source-image coordinates.
///
/// Half-open on the far edges: the tile covers `[x_start, x_end) x
/// [y_start, y_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x_start: u32,
    pub y_start: u32,
    pub x_end: u32,
    pub y_end: u32,
}

impl TileRect {
    /// Width of the covered region.
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    /// Height of the covered region.
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }
}

/// Plan the tile grid for an image.
///
/// Each axis is planned independently. An axis no longer than the tile size
/// gets a single tile with `stride = tile_size`; otherwise the number of
/// tiles is the smallest count whose worst-case spacing still overlaps by
/// `min_overlap`, and the stride is the exact division that spreads those
/// tiles so the last one ends on the image boundary.
///
/// # Errors
///
/// Returns an error if either dimension is zero.
pub fn plan_grid(
    width: u32,
    height: u32,
    config: TilingConfig,
) -> Result<GridLayout, PlanError> {
    if width == 0 || height == 0 {
        return Err(PlanError::EmptyImage { width, height });
    }

    let (tiles_x, stride_x) = plan_axis(width, config.tile_size(), config.min_overlap());
    let (tiles_y, stride_y) = plan_axis(height, config.tile_size(), config.min_overlap());

    Ok(GridLayout {
        tiles_x,
        tiles_y,
        stride_x,
        stride_y,
    })
}

/// Tile count and stride along one axis.
fn plan_axis(dimension: u32, tile_size: u32, min_overlap: u32) -> (u32, f64) {
    if dimension <= tile_size {
        return (1, f64::from(tile_size));
    }

    let span = f64::from(dimension - tile_size);
    let max_step = f64::from(tile_size - min_overlap);
    let tiles = (span / max_step).ceil() as u32 + 1;

    // tiles >= 2 here, so the division is well-defined. stride <= max_step
    // by construction, which is what guarantees the overlap floor.
    let stride = span / f64::from(tiles - 1);

    (tiles, stride)
}

/// Pixel rectangle for the tile at `(row, col)`.
///
/// The tentative origin `round(col * stride)` is clamped so the rectangle
/// stays inside the image, then shifted backward if clamping made it
/// smaller than `tile_size`. After the shift every tile is exactly
/// `tile_size` wide and tall unless the image itself is smaller than one
/// tile along that axis.
pub fn tile_rect(
    grid: &GridLayout,
    width: u32,
    height: u32,
    tile_size: u32,
    row: u32,
    col: u32,
) -> TileRect {
    let (x_start, x_end) = axis_span(grid.stride_x, col, tile_size, width);
    let (y_start, y_end) = axis_span(grid.stride_y, row, tile_size, height);

    TileRect {
        x_start,
        y_start,
        x_end,
        y_end,
    }
}

fn axis_span(stride: f64, index: u32, tile_size: u32, dimension: u32) -> (u32, u32) {
    let mut start = (f64::from(index) * stride).round() as u32;
    let end = (start + tile_size).min(dimension);

    // Boundary correction: keep the tile full-size whenever the image is
    // large enough to allow it.
    if end - start < tile_size {
        start = end.saturating_sub(tile_size);
    }

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tile_size: u32, min_overlap: u32) -> TilingConfig {
        TilingConfig::new(tile_size, min_overlap).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(TilingConfig::new(512, 64).is_ok());
        assert!(TilingConfig::new(512, 0).is_ok());
        assert!(matches!(
            TilingConfig::new(0, 0),
            Err(PlanError::ZeroTileSize)
        ));
        assert!(matches!(
            TilingConfig::new(512, 512),
            Err(PlanError::OverlapTooLarge { .. })
        ));
        assert!(matches!(
            TilingConfig::new(512, 600),
            Err(PlanError::OverlapTooLarge { .. })
        ));
    }

    #[test]
    fn test_zero_extent_rejected() {
        assert!(matches!(
            plan_grid(0, 100, config(512, 64)),
            Err(PlanError::EmptyImage { .. })
        ));
        assert!(matches!(
            plan_grid(100, 0, config(512, 64)),
            Err(PlanError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_image_smaller_than_tile_is_single_tile() {
        let grid = plan_grid(400, 300, config(512, 64)).unwrap();
        assert_eq!(grid.tiles_x, 1);
        assert_eq!(grid.tiles_y, 1);
        assert_eq!(grid.stride_x, 512.0);
        assert_eq!(grid.stride_y, 512.0);
    }

    #[test]
    fn test_exact_fit_is_single_tile() {
        let grid = plan_grid(512, 512, config(512, 64)).unwrap();
        assert_eq!(grid.tiles_x, 1);
        assert_eq!(grid.tiles_y, 1);
    }

    #[test]
    fn test_1000x1000_with_overlap_64() {
        // tiles = ceil((1000 - 512) / (512 - 64)) + 1 = ceil(488/448) + 1 = 3
        let grid = plan_grid(1000, 1000, config(512, 64)).unwrap();
        assert_eq!(grid.tiles_x, 3);
        assert_eq!(grid.tiles_y, 3);

        // stride = (1000 - 512) / (3 - 1)
        assert_eq!(grid.stride_x, 244.0);

        // The last tile's far edge lands exactly on the image boundary.
        let last = tile_rect(&grid, 1000, 1000, 512, 0, grid.tiles_x - 1);
        assert_eq!(last.x_end, 1000);
        assert_eq!(last.width(), 512);
    }

    #[test]
    fn test_fractional_stride() {
        let grid = plan_grid(1000, 1000, config(512, 0)).unwrap();
        // tiles = ceil(488/512) + 1 = 2, stride = 488.0
        assert_eq!(grid.tiles_x, 2);
        assert_eq!(grid.stride_x, 488.0);

        let grid = plan_grid(1100, 1100, config(512, 100)).unwrap();
        // tiles = ceil(588/412) + 1 = 3, stride = 588/2 = 294.0
        assert_eq!(grid.tiles_x, 3);
        assert_eq!(grid.stride_x, 294.0);

        let grid = plan_grid(1000, 1000, config(300, 50)).unwrap();
        // tiles = ceil(700/250) + 1 = 4, stride = 700/3 (fractional)
        assert_eq!(grid.tiles_x, 4);
        assert!((grid.stride_x - 700.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_covering_property() {
        // Union of tile rectangles must equal [0, width) x [0, height).
        let cases = [
            (1000u32, 1000u32, 512u32, 64u32),
            (513, 513, 512, 64),
            (2048, 1536, 512, 0),
            (999, 333, 256, 32),
            (100, 100, 512, 64),
            (1, 1, 7, 3),
            (50, 50, 10, 9),
        ];

        for &(width, height, tile_size, min_overlap) in &cases {
            let cfg = config(tile_size, min_overlap);
            let grid = plan_grid(width, height, cfg).unwrap();

            let mut covered = vec![false; (width as usize) * (height as usize)];
            for row in 0..grid.tiles_y {
                for col in 0..grid.tiles_x {
                    let rect = tile_rect(&grid, width, height, tile_size, row, col);
                    assert!(rect.x_end <= width);
                    assert!(rect.y_end <= height);
                    for y in rect.y_start..rect.y_end {
                        for x in rect.x_start..rect.x_end {
                            covered[(y * width + x) as usize] = true;
                        }
                    }
                }
            }
            assert!(
                covered.iter().all(|&c| c),
                "uncovered pixels for {}x{} tile={} overlap={}",
                width,
                height,
                tile_size,
                min_overlap
            );
        }
    }

    #[test]
    fn test_full_size_property() {
        // Every tile is full-size except when the image itself is smaller
        // than the tile along that axis.
        let width = 1000;
        let height = 700;
        let tile_size = 512;
        let grid = plan_grid(width, height, config(tile_size, 64)).unwrap();

        for row in 0..grid.tiles_y {
            for col in 0..grid.tiles_x {
                let rect = tile_rect(&grid, width, height, tile_size, row, col);
                assert_eq!(rect.width(), tile_size);
                assert_eq!(rect.height(), tile_size);
            }
        }
    }

    #[test]
    fn test_overlap_floor() {
        let width = 1000;
        let tile_size = 512;
        let min_overlap = 64;
        let grid = plan_grid(width, width, config(tile_size, min_overlap)).unwrap();
        assert!(grid.tiles_x > 1);

        for col in 0..grid.tiles_x - 1 {
            let a = tile_rect(&grid, width, width, tile_size, 0, col);
            let b = tile_rect(&grid, width, width, tile_size, 0, col + 1);
            assert!(b.x_start < a.x_end);
            let overlap = a.x_end - b.x_start;
            assert!(
                overlap >= min_overlap,
                "overlap {} below floor between cols {} and {}",
                overlap,
                col,
                col + 1
            );
        }
    }

    #[test]
    fn test_degenerate_tile_clamped_to_image() {
        // Image smaller than the tile: the rect covers the whole image and
        // cannot be shifted to full size.
        let grid = plan_grid(400, 300, config(512, 64)).unwrap();
        let rect = tile_rect(&grid, 400, 300, 512, 0, 0);
        assert_eq!(rect.x_start, 0);
        assert_eq!(rect.y_start, 0);
        assert_eq!(rect.width(), 400);
        assert_eq!(rect.height(), 300);
    }

    #[test]
    fn test_determinism() {
        let a = plan_grid(4096, 3072, config(512, 64)).unwrap();
        let b = plan_grid(4096, 3072, config(512, 64)).unwrap();
        assert_eq!(a, b);

        let ra = tile_rect(&a, 4096, 3072, 512, 3, 5);
        let rb = tile_rect(&b, 4096, 3072, 512, 3, 5);
        assert_eq!(ra, rb);
    }
}
