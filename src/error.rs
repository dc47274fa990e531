//! Error types for tiling and encoding operations

use crate::types::DType;
use thiserror::Error;

/// Main error type for atlas planning, packing and encoding
#[derive(Error, Debug)]
pub enum TileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid axis: {0}")]
    InvalidAxis(usize),

    #[error("Unsupported channel count: {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(usize),

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(DType),

    #[error("Unsupported value type: {0}")]
    UnsupportedType(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Image encoding error: {0}")]
    Image(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Specialized Result type for atlas operations
pub type Result<T> = std::result::Result<T, TileError>;

impl From<bincode::Error> for TileError {
    fn from(err: bincode::Error) -> Self {
        TileError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for TileError {
    fn from(err: serde_json::Error) -> Self {
        TileError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for TileError {
    fn from(err: image::ImageError) -> Self {
        TileError::Image(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TileError {
    fn from(err: ndarray::ShapeError) -> Self {
        TileError::InvalidDimensions(err.to_string())
    }
}
