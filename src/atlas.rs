//! Tile packing - copy the 2D cross-sections of a volume into an atlas

use crate::config::TextureConfig;
use crate::error::{Result, TileError};
use crate::layout::{compute_tile_size, TileGrid};
use crate::types::{Element, SliceAxis};
use crate::utils::format_bytes;
use ndarray::{s, Array3, Array4, ArrayView3, ArrayView4, ArrayViewD, Axis, Ix4};

/// Channel counts a volume may carry: grey, RGB or RGBA
pub const SUPPORTED_CHANNELS: [usize; 3] = [1, 3, 4];

/// A packed tile sheet and the bookkeeping needed to find its tiles again
///
/// Only [`pack`] builds one, so the atlas always has the
/// `(image_height, image_width, channels)` shape its grid describes.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedAtlas<T> {
    atlas: Array3<T>,
    grid: TileGrid,
    axis: SliceAxis,
    channels: usize,
}

impl<T: Element> PackedAtlas<T> {
    /// The `(image_height, image_width, channels)` texture
    pub fn atlas(&self) -> &Array3<T> {
        &self.atlas
    }

    /// Take the texture out of the atlas
    pub fn into_atlas(self) -> Array3<T> {
        self.atlas
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Axis the volume was sliced along
    pub fn axis(&self) -> SliceAxis {
        self.axis
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(tile_height, tile_width)`
    pub fn tile_shape(&self) -> (usize, usize) {
        self.grid.tile_shape()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows
    }

    pub fn columns(&self) -> usize {
        self.grid.columns
    }

    pub fn n_slices(&self) -> usize {
        self.grid.slices
    }

    /// View of the cell holding slice `index`, or `None` past the last slice
    pub fn tile(&self, index: usize) -> Option<ArrayView3<'_, T>> {
        let (y, x) = self.grid.cell_origin(index)?;
        let (th, tw) = self.tile_shape();
        let (height, width, _) = self.atlas.dim();
        if y.checked_add(th)? > height || x.checked_add(tw)? > width {
            return None;
        }
        Some(self.atlas.slice(s![y..y + th, x..x + tw, ..]))
    }
}

/// Bring a rank 3 or rank 4 volume to `(D0, D1, D2, channels)`
fn as_channel_volume<T>(volume: ArrayViewD<'_, T>, channels: usize) -> Result<ArrayView4<'_, T>> {
    if !SUPPORTED_CHANNELS.contains(&channels) {
        return Err(TileError::UnsupportedChannels(channels));
    }

    let volume = match volume.ndim() {
        3 if channels == 1 => volume.insert_axis(Axis(3)),
        3 => {
            return Err(TileError::InvalidDimensions(format!(
                "A 3D volume has one channel, {} requested",
                channels
            )))
        }
        4 if volume.shape()[3] == channels => volume,
        4 => {
            return Err(TileError::InvalidDimensions(format!(
                "Volume has {} channels, {} requested",
                volume.shape()[3],
                channels
            )))
        }
        n => {
            return Err(TileError::InvalidDimensions(format!(
                "Volume must be 3D or 4D, got {} dimensions",
                n
            )))
        }
    };

    Ok(volume.into_dimensionality::<Ix4>()?)
}

/// Pack every slice of `volume` along `axis` into a zero-filled atlas.
///
/// `volume` is `(D0, D1, D2)` or `(D0, D1, D2, channels)`. Slice `i` lands
/// in cell `(i / columns, i % columns)`; the tile rows and columns are the
/// two remaining axes in ascending order.
pub fn pack<T: Element>(
    volume: ArrayViewD<'_, T>,
    axis: usize,
    channels: usize,
    config: &TextureConfig,
) -> Result<PackedAtlas<T>> {
    let slice_axis = SliceAxis::from_index(axis).ok_or(TileError::InvalidAxis(axis))?;
    let volume = as_channel_volume(volume, channels)?;

    let (d0, d1, d2, _) = volume.dim();
    let grid = compute_tile_size(slice_axis.slicing_shape([d0, d1, d2]), config)?;
    let (th, tw) = grid.tile_shape();

    let mut atlas = Array3::<T>::zeros((grid.image_height, grid.image_width, channels));
    for (index, slice) in volume.axis_iter(Axis(axis)).enumerate() {
        let Some((y, x)) = grid.cell_origin(index) else {
            break;
        };
        atlas
            .slice_mut(s![y..y + th, x..x + tw, ..])
            .assign(&slice);
    }

    tracing::debug!(
        axis,
        channels,
        slices = grid.slices,
        rows = grid.rows,
        columns = grid.columns,
        size = %format_bytes(grid.texture_bytes(channels, T::DTYPE)),
        "Packed volume into tile sheet"
    );

    Ok(PackedAtlas {
        atlas,
        grid,
        axis: slice_axis,
        channels,
    })
}

/// Rebuild the `(D0, D1, D2, channels)` volume a [`PackedAtlas`] was made from
pub fn unpack<T: Element>(packed: &PackedAtlas<T>) -> Array4<T> {
    let axis = packed.axis.to_index();
    let (tile_axis_h, tile_axis_w) = packed.axis.orthogonal();
    let (th, tw) = packed.tile_shape();

    let mut shape = [0usize; 4];
    shape[axis] = packed.n_slices();
    shape[tile_axis_h] = th;
    shape[tile_axis_w] = tw;
    shape[3] = packed.channels;

    let mut volume = Array4::<T>::zeros(shape);
    for (index, mut slice) in volume.axis_iter_mut(Axis(axis)).enumerate() {
        if let Some(tile) = packed.tile(index) {
            slice.assign(&tile);
        }
    }
    volume
}
