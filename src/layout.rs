//! Tile sheet layout - how the slices of a volume are arranged in an atlas

use crate::config::TextureConfig;
use crate::error::{Result, TileError};
use crate::types::DType;
use crate::utils::{ceil_div, format_bytes};
use serde::{Deserialize, Serialize};

/// Grid geometry of a tile sheet
///
/// Slice `i` lives in cell `(i / columns, i % columns)`; the grid sits in the
/// top-left corner of an `image_height x image_width` texture and everything
/// outside occupied cells is padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Number of slices to place
    pub slices: usize,
    /// Height of one tile in pixels
    pub tile_height: usize,
    /// Width of one tile in pixels
    pub tile_width: usize,
    /// Number of tile rows
    pub rows: usize,
    /// Number of tile columns
    pub columns: usize,
    /// Atlas width in pixels (power of two)
    pub image_width: usize,
    /// Atlas height in pixels (power of two)
    pub image_height: usize,
}

impl TileGrid {
    /// `(rows, columns, image_width, image_height)`
    pub fn dimensions(&self) -> (usize, usize, usize, usize) {
        (self.rows, self.columns, self.image_width, self.image_height)
    }

    /// `(tile_height, tile_width)`
    pub fn tile_shape(&self) -> (usize, usize) {
        (self.tile_height, self.tile_width)
    }

    /// Total number of cells in the grid
    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    /// Cells holding a slice
    pub fn occupied_cells(&self) -> usize {
        self.slices
    }

    /// Cells holding no slice
    pub fn wasted_cells(&self) -> usize {
        self.cells() - self.occupied_cells()
    }

    /// Grid cell `(row, column)` of slice `index`
    pub fn cell_of(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.slices {
            return None;
        }
        Some((index / self.columns, index % self.columns))
    }

    /// Pixel offset `(y, x)` of the top-left corner of slice `index`
    pub fn cell_origin(&self, index: usize) -> Option<(usize, usize)> {
        self.cell_of(index)
            .map(|(row, col)| (row * self.tile_height, col * self.tile_width))
    }

    /// Size in bytes of the atlas texture, saturating at `usize::MAX`
    pub fn texture_bytes(&self, channels: usize, dtype: DType) -> usize {
        self.image_width
            .saturating_mul(self.image_height)
            .saturating_mul(channels)
            .saturating_mul(dtype.size_in_bytes())
    }
}

fn too_large(shape: [usize; 3]) -> TileError {
    TileError::InvalidDimensions(format!(
        "Tile sheet for shape {:?} does not fit in the address space",
        shape
    ))
}

/// Next power of two of `a * b`, or an error when either step overflows
fn pow2_extent(a: usize, b: usize, shape: [usize; 3]) -> Result<usize> {
    a.checked_mul(b)
        .and_then(usize::checked_next_power_of_two)
        .ok_or_else(|| too_large(shape))
}

/// Plan the tile grid for a volume of `shape = [slices, tile_height, tile_width]`.
///
/// The width starts at the next power of two that fits roughly `sqrt(slices)`
/// tiles side by side and is clamped into the configured bounds. Columns are
/// whatever fits in that width, and the height grows to hold the remaining
/// rows; it is raised to the minimum bound but never capped by the maximum.
///
/// Shapes whose texture extent cannot be represented are rejected with
/// `InvalidDimensions`.
pub fn compute_tile_size(shape: [usize; 3], config: &TextureConfig) -> Result<TileGrid> {
    config.validate()?;
    if shape.iter().any(|&dim| dim == 0) {
        return Err(TileError::InvalidDimensions(format!(
            "All dimensions must be positive, got {:?}",
            shape
        )));
    }

    let [slices, tile_height, tile_width] = shape;

    let approx_columns = ((slices as f64).sqrt().round() as usize).max(1);
    let mut image_width = pow2_extent(approx_columns, tile_width, shape)?
        .clamp(config.min_texture_width, config.max_texture_width);

    let mut columns = image_width / tile_width;
    if columns == 0 {
        tracing::warn!(
            tile_width,
            max_texture_width = config.max_texture_width,
            "Tile is wider than the maximum texture width, using a single column"
        );
        columns = 1;
        image_width = pow2_extent(1, tile_width, shape)?;
    }

    let rows = ceil_div(slices, columns);
    let image_height = pow2_extent(rows, tile_height, shape)?.max(config.min_texture_width);

    let grid = TileGrid {
        slices,
        tile_height,
        tile_width,
        rows,
        columns,
        image_width,
        image_height,
    };

    if grid.wasted_cells() > grid.slices {
        tracing::warn!(
            slices,
            cells = grid.cells(),
            min_texture_width = config.min_texture_width,
            "Tile grid is more than half empty"
        );
    }

    tracing::debug!(
        rows,
        columns,
        image_width,
        image_height,
        texture = %format_bytes(grid.texture_bytes(1, DType::U8)),
        "Planned tile grid"
    );

    Ok(grid)
}
