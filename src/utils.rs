//! Utility functions

use crate::error::{Result, TileError};
use crate::types::Element;

/// Serialize elements to little-endian bytes in iteration order
pub fn elements_to_le_bytes<'a, T, I>(values: I, len_hint: usize) -> Vec<u8>
where
    T: Element,
    I: IntoIterator<Item = &'a T>,
{
    let mut bytes = Vec::with_capacity(len_hint * T::DTYPE.size_in_bytes());
    for &value in values {
        value.extend_le(&mut bytes);
    }
    bytes
}

/// Parse little-endian bytes into elements
pub fn le_bytes_to_elements<T: Element>(bytes: &[u8]) -> Result<Vec<T>> {
    let size = T::DTYPE.size_in_bytes();
    if bytes.len() % size != 0 {
        return Err(TileError::InvalidFormat(format!(
            "{} bytes is not a whole number of {} elements",
            bytes.len(),
            T::DTYPE
        )));
    }

    Ok(bytes.chunks_exact(size).map(T::from_le).collect())
}

/// Integer division rounding up
pub fn ceil_div(value: usize, divisor: usize) -> usize {
    debug_assert!(divisor > 0);
    value.div_ceil(divisor)
}

/// Format byte size in human-readable form
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_conversion() {
        let data: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0];
        let bytes = elements_to_le_bytes(&data, data.len());
        assert_eq!(bytes.len(), data.len() * 4);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());

        let recovered: Vec<f32> = le_bytes_to_elements(&bytes).unwrap();
        assert_eq!(data, recovered);
    }

    #[test]
    fn test_misaligned_bytes() {
        let result = le_bytes_to_elements::<u32>(&[1, 2, 3]);
        assert!(matches!(result, Err(TileError::InvalidFormat(_))));
    }

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(254, 16), 16);
        assert_eq!(ceil_div(254, 8), 32);
        assert_eq!(ceil_div(1, 8), 1);
        assert_eq!(ceil_div(0, 8), 0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(64 * 1024 * 1024), "64.00 MB");
    }
}
