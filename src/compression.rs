//! Lossless compression of binary array payloads
//!
//! Packed atlases are mostly zero padding, so deflate or zstd often shrink
//! them considerably before they hit the transport. Only lossless methods
//! are offered: a decoded buffer must match the packed bytes exactly.
//!
//! Decompression is bounded by the byte length the array descriptor
//! promises. A stream that inflates past it is rejected rather than read to
//! the end, since descriptors arrive from the other side of the transport.

use crate::error::{Result, TileError};
use flate2::read::{DeflateDecoder, DeflateEncoder};
use flate2::Compression as FlateCompression;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Upper bound on the deflate expansion ratio, used to size output buffers
const MAX_DEFLATE_RATIO: usize = 1032;

/// Compression applied to a binary array buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionMethod {
    /// Raw little-endian bytes
    #[default]
    None,
    /// Raw deflate stream
    Deflate,
    /// Zstandard frame
    Zstd,
}

/// Compression level (0-9, where 0 is no compression and 9 is maximum)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    pub fn fast() -> Self {
        Self(1)
    }

    pub fn best() -> Self {
        Self(9)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Zstd levels run 1..=22; spread 0-9 over the commonly used 1..=19
    fn zstd_level(&self) -> i32 {
        1 + i32::from(self.0) * 2
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(6)
    }
}

/// Compresses packed array bytes and restores them to a known length
pub trait Compressor: Send + Sync {
    /// Compress the little-endian bytes of an array
    fn compress(&self, data: &[u8], level: CompressionLevel) -> Result<Vec<u8>>;

    /// Restore exactly `expected_len` bytes; any other length is an error
    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// Pass-through
#[derive(Debug, Default)]
pub struct NoneCompressor;

impl Compressor for NoneCompressor {
    fn compress(&self, data: &[u8], _level: CompressionLevel) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        check_len(data.to_vec(), expected_len)
    }
}

/// Deflate compression
#[derive(Debug, Default)]
pub struct DeflateCompressor;

impl Compressor for DeflateCompressor {
    fn compress(&self, data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(data, FlateCompression::new(level.value() as u32));
        let mut compressed = Vec::new();
        encoder
            .read_to_end(&mut compressed)
            .map_err(|e| TileError::Compression(e.to_string()))?;
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        let capacity = expected_len.min(data.len().saturating_mul(MAX_DEFLATE_RATIO));
        read_bounded(DeflateDecoder::new(data), expected_len, capacity)
    }
}

/// Zstandard compression
#[derive(Debug, Default)]
pub struct ZstdCompressor;

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
        zstd::encode_all(data, level.zstd_level()).map_err(|e| TileError::Compression(e.to_string()))
    }

    fn decompress(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        let decoder =
            zstd::stream::read::Decoder::new(data).map_err(|e| TileError::Decompression(e.to_string()))?;
        read_bounded(decoder, expected_len, 0)
    }
}

/// Read at most one byte past `expected_len` and insist on the exact length
fn read_bounded<R: Read>(reader: R, expected_len: usize, capacity: usize) -> Result<Vec<u8>> {
    let limit = u64::try_from(expected_len)
        .map_err(|_| TileError::Decompression(format!("{} bytes is too large", expected_len)))?
        .saturating_add(1);

    let mut out = Vec::with_capacity(capacity);
    reader
        .take(limit)
        .read_to_end(&mut out)
        .map_err(|e| TileError::Decompression(e.to_string()))?;
    check_len(out, expected_len)
}

fn check_len(data: Vec<u8>, expected_len: usize) -> Result<Vec<u8>> {
    if data.len() > expected_len {
        return Err(TileError::Decompression(format!(
            "Stream inflates past the {} bytes its descriptor allows",
            expected_len
        )));
    }
    if data.len() < expected_len {
        return Err(TileError::Decompression(format!(
            "Stream holds {} bytes, descriptor expects {}",
            data.len(),
            expected_len
        )));
    }
    Ok(data)
}

/// Get a compressor for a given method
pub fn get_compressor(method: CompressionMethod) -> Box<dyn Compressor> {
    match method {
        CompressionMethod::None => Box::new(NoneCompressor),
        CompressionMethod::Deflate => Box::new(DeflateCompressor),
        CompressionMethod::Zstd => Box::new(ZstdCompressor),
    }
}
