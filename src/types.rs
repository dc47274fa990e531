//! Core data types: dtype tags, voxel elements, slicing axes and value ranges

use crate::codec::DynArray;
use ndarray::ArrayD;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element data types understood by the codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DType {
    /// Boolean mask values
    #[serde(rename = "bool")]
    Bool = 0,
    /// Unsigned 8-bit integer
    #[serde(rename = "uint8")]
    U8 = 1,
    /// Unsigned 16-bit integer
    #[serde(rename = "uint16")]
    U16 = 2,
    /// Unsigned 32-bit integer
    #[serde(rename = "uint32")]
    U32 = 3,
    /// Unsigned 64-bit integer
    #[serde(rename = "uint64")]
    U64 = 4,
    /// Signed 8-bit integer
    #[serde(rename = "int8")]
    I8 = 5,
    /// Signed 16-bit integer
    #[serde(rename = "int16")]
    I16 = 6,
    /// Signed 32-bit integer
    #[serde(rename = "int32")]
    I32 = 7,
    /// Signed 64-bit integer
    #[serde(rename = "int64")]
    I64 = 8,
    /// 32-bit floating point
    #[serde(rename = "float32")]
    F32 = 9,
    /// 64-bit floating point
    #[serde(rename = "float64")]
    F64 = 10,
}

impl DType {
    /// Size in bytes of this data type
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::Bool => 1,
            DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 => 8,
        }
    }

    /// Whether arrays of this type may travel as raw binary buffers.
    ///
    /// Browsers reconstruct these through typed arrays; 64-bit integers and
    /// booleans have no portable typed-array view and go through JSON.
    pub fn is_transportable(&self) -> bool {
        !matches!(self, DType::Bool | DType::U64 | DType::I64)
    }

    /// The numpy-style name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric voxel type that can be packed, quantized and put on the wire
pub trait Element:
    Copy + Default + PartialOrd + Zero + ToPrimitive + Serialize + fmt::Debug + Send + Sync + 'static
{
    /// Tag identifying this type on the wire
    const DTYPE: DType;

    /// Append the little-endian bytes of this value
    fn extend_le(self, out: &mut Vec<u8>);

    /// Read a value from exactly `DTYPE.size_in_bytes()` little-endian bytes
    fn from_le(bytes: &[u8]) -> Self;

    /// Wrap an owned array into the dynamically typed array
    fn into_dyn_array(array: ArrayD<Self>) -> DynArray;

    /// JSON representation; non-finite floats become `null`
    fn to_json(self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;

                fn extend_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn from_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }

                fn into_dyn_array(array: ArrayD<Self>) -> DynArray {
                    DynArray::$dtype(array)
                }
            }
        )*
    };
}

impl_element! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

/// Volume axis along which 2D slices are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SliceAxis {
    /// Axis 0 (slices are `D1 x D2` images)
    Dim0 = 0,
    /// Axis 1 (slices are `D0 x D2` images)
    Dim1 = 1,
    /// Axis 2 (slices are `D0 x D1` images)
    Dim2 = 2,
}

impl SliceAxis {
    /// Convert from usize index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SliceAxis::Dim0),
            1 => Some(SliceAxis::Dim1),
            2 => Some(SliceAxis::Dim2),
            _ => None,
        }
    }

    /// Convert to usize index
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// The two remaining axes, in ascending order: `(tile rows, tile columns)`
    pub fn orthogonal(&self) -> (usize, usize) {
        match self {
            SliceAxis::Dim0 => (1, 2),
            SliceAxis::Dim1 => (0, 2),
            SliceAxis::Dim2 => (0, 1),
        }
    }

    /// Reorder a volume shape to `[slices, tile_height, tile_width]`
    pub fn slicing_shape(&self, shape: [usize; 3]) -> [usize; 3] {
        let (h, w) = self.orthogonal();
        [shape[self.to_index()], shape[h], shape[w]]
    }
}

/// Value range used to quantize wide data to 8 bits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Range spanned by the finite values of `values`, if there are any
    pub fn of_finite<T, I>(values: I) -> Option<Self>
    where
        T: Element,
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .filter_map(|v| v.to_f64())
            .filter(|v| v.is_finite())
            .fold(None, |range: Option<Self>, v| match range {
                None => Some(Self::new(v, v)),
                Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
            })
    }

    /// Map `value` into `0..=255`.
    ///
    /// Non-finite values and values of a degenerate range map to zero.
    pub fn quantize(&self, value: f64) -> u8 {
        let span = self.max - self.min;
        if !value.is_finite() || !span.is_finite() || span <= 0.0 {
            return 0;
        }
        let scaled = (value - self.min) / span * 255.0;
        scaled.round().clamp(0.0, 255.0) as u8
    }
}
