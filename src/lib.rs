//! voxel-atlas - tile sheets for GPU volume rendering
//!
//! Browsers without 3D texture support sample volumes from a 2D "tile
//! sheet": every slice of the volume is copied into one cell of a
//! power-of-two texture. This crate plans that grid, packs the volume and
//! serializes the result for transport.
//!
//! # Features
//!
//! - Tile grid planning under configurable texture-size bounds
//! - Packing of 3D volumes along any axis, with 1, 3 or 4 channels
//! - Binary (little-endian buffer + descriptor) or nested-JSON array encoding
//! - Lossless Deflate/Zstd compression of binary buffers
//! - 8-bit PNG output and `data:` URLs for direct texture upload
//!
//! # Example
//!
//! ```rust,ignore
//! use ndarray::Array3;
//! use voxel_atlas::{cube_to_png, PngOptions, TextureConfig};
//!
//! let volume = Array3::<f32>::zeros((128, 128, 128));
//! let mut png = Vec::new();
//! let grid = cube_to_png(
//!     volume.view().into_dyn(),
//!     0,
//!     1,
//!     &TextureConfig::default(),
//!     &PngOptions::default(),
//!     &mut png,
//! )?;
//! println!("{} x {} tiles", grid.rows, grid.columns);
//! ```

pub mod atlas;
pub mod codec;
pub mod compression;
pub mod config;
pub mod error;
pub mod layout;
pub mod png;
pub mod types;
pub mod utils;

// Re-exports
pub use atlas::{pack, unpack, PackedAtlas};
pub use codec::{
    array_sequence_to_binary_or_json, encode_with, ArrayDescriptor, BinaryArray, DynArray, Encoded,
    Payload,
};
pub use compression::{CompressionLevel, CompressionMethod, Compressor};
pub use config::{CodecOptions, TextureConfig};
pub use error::{Result, TileError};
pub use layout::{compute_tile_size, TileGrid};
pub use png::{cube_to_data_url, cube_to_png, cube_to_tile_sheet, PngOptions, TileSheet};
pub use types::{DType, Element, SliceAxis, ValueRange};

/// Version of the voxel-atlas crate
pub const VOXEL_ATLAS_VERSION: &str = env!("CARGO_PKG_VERSION");
