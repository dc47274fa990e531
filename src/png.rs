//! PNG encoding of packed tile sheets
//!
//! The atlas is quantized to 8 bits per channel and written as a grey, RGB
//! or RGBA PNG. The writer belongs to the caller: it is written to but never
//! flushed-and-closed here, and a failed encode may leave partial output.

use crate::atlas::{pack, PackedAtlas};
use crate::compression::CompressionLevel;
use crate::config::TextureConfig;
use crate::error::{Result, TileError};
use crate::layout::TileGrid;
use crate::types::{DType, Element, ValueRange};
use crate::utils::format_bytes;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use ndarray::{s, Array3, ArrayViewD};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Options for PNG output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PngOptions {
    /// Range mapped onto `0..=255`; defaults to the finite range of the data
    pub value_range: Option<ValueRange>,
    /// Deflate effort
    pub level: CompressionLevel,
}

impl PngOptions {
    /// Quantize against a fixed range instead of the data's own
    pub fn with_value_range(mut self, range: ValueRange) -> Self {
        self.value_range = Some(range);
        self
    }

    /// Set the compression level
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    fn compression_type(&self) -> CompressionType {
        match self.level.value() {
            0..=3 => CompressionType::Fast,
            4..=6 => CompressionType::Default,
            _ => CompressionType::Best,
        }
    }
}

/// Everything a front end needs to upload and sample a tile sheet texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSheet {
    /// `[image_width, image_height]`
    pub image_shape: [usize; 2],
    /// `[tile_width, tile_height]`
    pub slice_shape: [usize; 2],
    pub rows: usize,
    pub columns: usize,
    pub slices: usize,
    /// `data:image/png;base64,...`
    pub src: String,
}

impl TileSheet {
    fn new(grid: &TileGrid, src: String) -> Self {
        Self {
            image_shape: [grid.image_width, grid.image_height],
            slice_shape: [grid.tile_width, grid.tile_height],
            rows: grid.rows,
            columns: grid.columns,
            slices: grid.slices,
            src,
        }
    }
}

fn color_type(channels: usize) -> Result<ExtendedColorType> {
    match channels {
        1 => Ok(ExtendedColorType::L8),
        3 => Ok(ExtendedColorType::Rgb8),
        4 => Ok(ExtendedColorType::Rgba8),
        other => Err(TileError::UnsupportedChannels(other)),
    }
}

/// Convert a packed atlas to 8-bit pixels in row-major `(y, x, channel)` order.
///
/// `u8` atlases are copied as they are. Everything else is scaled with
/// `range`, falling back to the finite range of `source`. Padding outside
/// the occupied cells is always pixel value 0, whatever the range.
pub fn quantize<T: Element>(
    packed: &PackedAtlas<T>,
    range: Option<ValueRange>,
    source: ArrayViewD<'_, T>,
) -> Result<Vec<u8>> {
    if T::DTYPE == DType::U8 {
        return Ok(packed
            .atlas()
            .iter()
            .map(|v| v.to_u8().unwrap_or_default())
            .collect());
    }

    let range = match range {
        Some(range) if !range.is_valid() => {
            return Err(TileError::Configuration(format!(
                "Invalid value range [{}, {}]",
                range.min, range.max
            )))
        }
        Some(range) => range,
        None => ValueRange::of_finite(source.iter().copied()).unwrap_or(ValueRange::new(0.0, 0.0)),
    };

    let mut pixels = Array3::<u8>::zeros(packed.atlas().dim());
    let (th, tw) = packed.tile_shape();
    for index in 0..packed.n_slices() {
        let (Some((y, x)), Some(tile)) = (packed.grid().cell_origin(index), packed.tile(index))
        else {
            break;
        };
        pixels
            .slice_mut(s![y..y + th, x..x + tw, ..])
            .zip_mut_with(&tile, |pixel, v| {
                *pixel = range.quantize(v.to_f64().unwrap_or(f64::NAN));
            });
    }
    Ok(pixels.iter().copied().collect())
}

/// Write a packed atlas as PNG
pub fn atlas_to_png<T: Element, W: Write>(
    packed: &PackedAtlas<T>,
    pixels: &[u8],
    options: &PngOptions,
    writer: W,
) -> Result<()> {
    let grid = packed.grid();
    let width = u32::try_from(grid.image_width)
        .map_err(|_| TileError::InvalidDimensions(format!("Image width {} too large", grid.image_width)))?;
    let height = u32::try_from(grid.image_height).map_err(|_| {
        TileError::InvalidDimensions(format!("Image height {} too large", grid.image_height))
    })?;

    let encoder =
        PngEncoder::new_with_quality(writer, options.compression_type(), FilterType::Adaptive);
    encoder.write_image(pixels, width, height, color_type(packed.channels())?)?;
    Ok(())
}

/// Pack `volume` along `axis` and write the tile sheet as PNG to `writer`.
///
/// Returns the grid so the caller can describe the texture to a renderer.
pub fn cube_to_png<T: Element, W: Write>(
    volume: ArrayViewD<'_, T>,
    axis: usize,
    channels: usize,
    config: &TextureConfig,
    options: &PngOptions,
    writer: W,
) -> Result<TileGrid> {
    color_type(channels)?;
    let packed = pack(volume.view(), axis, channels, config)?;
    let pixels = quantize(&packed, options.value_range, volume)?;
    atlas_to_png(&packed, &pixels, options, writer)?;

    tracing::debug!(
        width = packed.grid().image_width,
        height = packed.grid().image_height,
        channels,
        dtype = %T::DTYPE,
        raw = %format_bytes(pixels.len()),
        "Encoded tile sheet as PNG"
    );

    Ok(*packed.grid())
}

/// Encode the tile sheet as a `data:image/png;base64,` URL
pub fn cube_to_data_url<T: Element>(
    volume: ArrayViewD<'_, T>,
    axis: usize,
    channels: usize,
    config: &TextureConfig,
    options: &PngOptions,
) -> Result<(TileGrid, String)> {
    let mut png = Vec::<u8>::new();
    let grid = cube_to_png(volume, axis, channels, config, options, &mut png)?;
    let url = format!("data:image/png;base64,{}", BASE64.encode(&png));
    Ok((grid, url))
}

/// Encode the tile sheet and describe it for a front end
pub fn cube_to_tile_sheet<T: Element>(
    volume: ArrayViewD<'_, T>,
    axis: usize,
    channels: usize,
    config: &TextureConfig,
    options: &PngOptions,
) -> Result<TileSheet> {
    let (grid, src) = cube_to_data_url(volume, axis, channels, config, options)?;
    Ok(TileSheet::new(&grid, src))
}
