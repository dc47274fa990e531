//! Binary / JSON encoding of array payloads
//!
//! Front ends with a binary channel receive raw little-endian buffers plus a
//! small `{dtype, shape}` descriptor. Everything else (empty arrays,
//! zero-dimensional values, dtypes without a typed-array view, channels
//! without binary support) is sent as rank-preserving nested JSON lists.

use crate::compression::{get_compressor, CompressionMethod};
use crate::config::CodecOptions;
use crate::error::{Result, TileError};
use crate::types::{DType, Element};
use crate::utils::{elements_to_le_bytes, format_bytes, le_bytes_to_elements};
use bytes::Bytes;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dynamically typed n-dimensional array
#[derive(Debug, Clone, PartialEq)]
pub enum DynArray {
    Bool(ArrayD<bool>),
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

/// Run `$body` with `$a` bound to the inner array of every numeric variant
macro_rules! with_numeric {
    ($array:expr, $a:ident => $body:expr, bool $b:ident => $bool_body:expr) => {
        match $array {
            DynArray::Bool($b) => $bool_body,
            DynArray::U8($a) => $body,
            DynArray::U16($a) => $body,
            DynArray::U32($a) => $body,
            DynArray::U64($a) => $body,
            DynArray::I8($a) => $body,
            DynArray::I16($a) => $body,
            DynArray::I32($a) => $body,
            DynArray::I64($a) => $body,
            DynArray::F32($a) => $body,
            DynArray::F64($a) => $body,
        }
    };
}

impl DynArray {
    /// Element type tag
    pub fn dtype(&self) -> DType {
        match self {
            DynArray::Bool(_) => DType::Bool,
            DynArray::U8(_) => DType::U8,
            DynArray::U16(_) => DType::U16,
            DynArray::U32(_) => DType::U32,
            DynArray::U64(_) => DType::U64,
            DynArray::I8(_) => DType::I8,
            DynArray::I16(_) => DType::I16,
            DynArray::I32(_) => DType::I32,
            DynArray::I64(_) => DType::I64,
            DynArray::F32(_) => DType::F32,
            DynArray::F64(_) => DType::F64,
        }
    }

    /// Array shape
    pub fn shape(&self) -> &[usize] {
        with_numeric!(self, a => a.shape(), bool b => b.shape())
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        with_numeric!(self, a => a.len(), bool b => b.len())
    }

    /// Whether the array has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rank-preserving nested JSON lists; zero-dimensional arrays become scalars
    pub fn to_json(&self) -> Value {
        with_numeric!(
            self,
            a => nested_json(a.view(), |&v| v.to_json()),
            bool b => nested_json(b.view(), |&v| Value::Bool(v))
        )
    }

    /// Cast 64-bit types to their 32-bit counterparts.
    ///
    /// `f64` values are rounded to the nearest `f32`. Integers must fit the
    /// 32-bit type; any value that does not is an `UnsupportedDataType` error
    /// naming the source dtype.
    pub fn narrowed_for_webgl(self) -> Result<Self> {
        match self {
            DynArray::F64(a) => Ok(DynArray::F32(a.mapv(|v| v as f32))),
            DynArray::I64(a) => narrow_integers(&a, DType::I64).map(DynArray::I32),
            DynArray::U64(a) => narrow_integers(&a, DType::U64).map(DynArray::U32),
            other => Ok(other),
        }
    }

    /// Little-endian bytes in logical (C) order, or `None` for booleans
    fn to_le_bytes(&self) -> Option<Vec<u8>> {
        with_numeric!(
            self,
            a => Some(elements_to_le_bytes(a.iter(), a.len())),
            bool _b => None
        )
    }
}

macro_rules! impl_from_array {
    ($($ty:ty),*) => {
        $(
            impl From<ArrayD<$ty>> for DynArray {
                fn from(array: ArrayD<$ty>) -> Self {
                    <$ty as Element>::into_dyn_array(array)
                }
            }
        )*
    };
}

impl_from_array!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl From<ArrayD<bool>> for DynArray {
    fn from(array: ArrayD<bool>) -> Self {
        DynArray::Bool(array)
    }
}

fn narrow_integers<S, T>(array: &ArrayD<S>, source: DType) -> Result<ArrayD<T>>
where
    S: Copy,
    T: TryFrom<S>,
{
    let values = array
        .iter()
        .map(|&v| T::try_from(v).map_err(|_| TileError::UnsupportedDataType(source)))
        .collect::<Result<Vec<T>>>()?;
    Ok(ArrayD::from_shape_vec(IxDyn(array.shape()), values)?)
}

fn nested_json<T, F>(view: ArrayViewD<'_, T>, scalar: F) -> Value
where
    F: Fn(&T) -> Value + Copy,
{
    if view.ndim() == 0 {
        return view.iter().next().map(scalar).unwrap_or(Value::Null);
    }
    Value::Array(
        view.axis_iter(Axis(0))
            .map(|sub| nested_json(sub, scalar))
            .collect(),
    )
}

/// Out-of-band tag that lets the receiver reshape a binary buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayDescriptor {
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub compression: CompressionMethod,
}

/// A raw array buffer together with its descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryArray {
    /// Little-endian element bytes, C order, possibly compressed
    pub data: Bytes,
    pub shape: Vec<usize>,
    pub dtype: DType,
    pub compression: CompressionMethod,
}

impl BinaryArray {
    /// Encode a numeric array, optionally compressing its bytes
    pub fn encode(array: &DynArray, options: &CodecOptions) -> Result<Self> {
        let dtype = array.dtype();
        if !dtype.is_transportable() {
            return Err(TileError::UnsupportedDataType(dtype));
        }
        let raw = array
            .to_le_bytes()
            .ok_or(TileError::UnsupportedDataType(dtype))?;

        let data = match options.compression {
            CompressionMethod::None => raw,
            method => get_compressor(method).compress(&raw, options.level)?,
        };

        Ok(Self {
            data: Bytes::from(data),
            shape: array.shape().to_vec(),
            dtype,
            compression: options.compression,
        })
    }

    /// The descriptor sent next to the buffer
    pub fn descriptor(&self) -> ArrayDescriptor {
        ArrayDescriptor {
            dtype: self.dtype,
            shape: self.shape.clone(),
            compression: self.compression,
        }
    }

    /// Number of elements described by the shape
    ///
    /// Descriptors come off the wire, so a shape whose product overflows is
    /// an `InvalidFormat` error.
    pub fn element_count(&self) -> Result<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| {
                TileError::InvalidFormat(format!("Shape {:?} overflows the address space", self.shape))
            })
    }

    /// Decoded size of the buffer in bytes
    pub fn byte_len(&self) -> Result<usize> {
        self.element_count()?
            .checked_mul(self.dtype.size_in_bytes())
            .ok_or_else(|| {
                TileError::InvalidFormat(format!(
                    "Shape {:?} of {} overflows the address space",
                    self.shape, self.dtype
                ))
            })
    }

    /// Rebuild the original array
    pub fn decode(&self) -> Result<DynArray> {
        let expected = self.byte_len()?;
        let raw = match self.compression {
            CompressionMethod::None => self.data.to_vec(),
            method => get_compressor(method).decompress(&self.data, expected)?,
        };

        if raw.len() != expected {
            return Err(TileError::InvalidFormat(format!(
                "Buffer holds {} bytes but shape {:?} of {} needs {}",
                raw.len(),
                self.shape,
                self.dtype,
                expected
            )));
        }

        match self.dtype {
            DType::U8 => self.reshape::<u8>(&raw),
            DType::U16 => self.reshape::<u16>(&raw),
            DType::U32 => self.reshape::<u32>(&raw),
            DType::I8 => self.reshape::<i8>(&raw),
            DType::I16 => self.reshape::<i16>(&raw),
            DType::I32 => self.reshape::<i32>(&raw),
            DType::F32 => self.reshape::<f32>(&raw),
            DType::F64 => self.reshape::<f64>(&raw),
            other => Err(TileError::UnsupportedDataType(other)),
        }
    }

    fn reshape<T: Element>(&self, raw: &[u8]) -> Result<DynArray> {
        let values = le_bytes_to_elements::<T>(raw)?;
        let array = ArrayD::from_shape_vec(IxDyn(&self.shape), values)?;
        Ok(T::into_dyn_array(array))
    }

    /// Frame descriptor and buffer into a single bincode blob
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Parse a blob produced by [`BinaryArray::to_bincode`]
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Values accepted by the codec
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON-native values: scalars, strings, null and already-converted lists
    Json(Value),
    /// A typed array
    Array(DynArray),
    /// A buffer that was already encoded
    Binary(BinaryArray),
    /// A sequence of payloads, e.g. one array per animation frame
    Sequence(Vec<Payload>),
}

impl From<DynArray> for Payload {
    fn from(array: DynArray) -> Self {
        Payload::Array(array)
    }
}

impl<T: Element> From<ArrayD<T>> for Payload {
    fn from(array: ArrayD<T>) -> Self {
        Payload::Array(T::into_dyn_array(array))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(items: Vec<Payload>) -> Self {
        Payload::Sequence(items)
    }
}

impl From<Encoded> for Payload {
    fn from(encoded: Encoded) -> Self {
        match encoded {
            Encoded::Binary(binary) => Payload::Binary(binary),
            Encoded::Json(value) => Payload::Json(value),
            Encoded::Sequence(items) => {
                Payload::Sequence(items.into_iter().map(Payload::from).collect())
            }
        }
    }
}

/// Result of encoding a payload
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Binary(BinaryArray),
    Json(Value),
    Sequence(Vec<Encoded>),
}

impl Encoded {
    /// Whether any part of this value travels as a binary buffer
    pub fn has_binary(&self) -> bool {
        match self {
            Encoded::Binary(_) => true,
            Encoded::Json(_) => false,
            Encoded::Sequence(items) => items.iter().any(Encoded::has_binary),
        }
    }
}

/// Encode `value` with default options (binary transport, no compression)
pub fn array_sequence_to_binary_or_json(value: impl Into<Payload>) -> Result<Encoded> {
    encode_with(value, &CodecOptions::default())
}

/// Encode `value` for a channel described by `options`
pub fn encode_with(value: impl Into<Payload>, options: &CodecOptions) -> Result<Encoded> {
    encode_payload(value.into(), options)
}

fn encode_payload(payload: Payload, options: &CodecOptions) -> Result<Encoded> {
    match payload {
        Payload::Json(Value::Object(_)) => Err(TileError::UnsupportedType(
            "JSON objects cannot be encoded as arrays".to_string(),
        )),
        Payload::Json(value) => Ok(Encoded::Json(value)),
        Payload::Binary(binary) => Ok(Encoded::Binary(binary)),
        Payload::Sequence(items) if items.is_empty() => Ok(Encoded::Json(Value::Array(Vec::new()))),
        Payload::Sequence(items) => items
            .into_iter()
            .map(|item| encode_payload(item, options))
            .collect::<Result<Vec<_>>>()
            .map(Encoded::Sequence),
        Payload::Array(array) => encode_array(array, options),
    }
}

fn encode_array(array: DynArray, options: &CodecOptions) -> Result<Encoded> {
    if array.is_empty() {
        return Ok(Encoded::Json(Value::Array(Vec::new())));
    }

    let array = if options.narrow_for_webgl {
        array.narrowed_for_webgl()?
    } else {
        array
    };

    if array.ndim() > 0 && options.binary && array.dtype().is_transportable() {
        let binary = BinaryArray::encode(&array, options)?;
        tracing::debug!(
            dtype = %binary.dtype,
            shape = ?binary.shape,
            size = %format_bytes(binary.data.len()),
            compression = ?binary.compression,
            "Encoded binary array"
        );
        return Ok(Encoded::Binary(binary));
    }

    tracing::trace!(dtype = %array.dtype(), shape = ?array.shape(), "Encoding array as JSON");
    Ok(Encoded::Json(array.to_json()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::CompressionLevel;
    use ndarray::{arr0, arr1, arr2, Array3};
    use serde_json::json;

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(
            array_sequence_to_binary_or_json(json!(1)).unwrap(),
            Encoded::Json(json!(1))
        );
        assert_eq!(
            array_sequence_to_binary_or_json(json!("viridis")).unwrap(),
            Encoded::Json(json!("viridis"))
        );
        assert_eq!(
            array_sequence_to_binary_or_json(json!(true)).unwrap(),
            Encoded::Json(json!(true))
        );
        assert_eq!(
            array_sequence_to_binary_or_json(json!([])).unwrap(),
            Encoded::Json(json!([]))
        );
    }

    #[test]
    fn test_empty_array_is_empty_list() {
        let empty = ArrayD::<f64>::zeros(IxDyn(&[0]));
        let encoded = array_sequence_to_binary_or_json(empty).unwrap();
        assert_eq!(encoded, Encoded::Json(json!([])));

        let empty_2d = ArrayD::<u8>::zeros(IxDyn(&[0, 3]));
        let encoded = array_sequence_to_binary_or_json(empty_2d).unwrap();
        match encoded {
            Encoded::Json(Value::Array(items)) => assert!(items.is_empty()),
            other => panic!("expected an empty list, got {:?}", other),
        }

        let empty_seq = array_sequence_to_binary_or_json(Vec::<Payload>::new()).unwrap();
        assert_eq!(empty_seq, Encoded::Json(json!([])));
    }

    #[test]
    fn test_zero_dimensional_becomes_scalar() {
        let value = arr0(5i32).into_dyn();
        assert_eq!(
            array_sequence_to_binary_or_json(value).unwrap(),
            Encoded::Json(json!(5))
        );
        let flag = DynArray::Bool(arr0(true).into_dyn());
        assert_eq!(
            array_sequence_to_binary_or_json(flag).unwrap(),
            Encoded::Json(json!(true))
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs: Vec<Payload> = vec![
            json!(1).into(),
            json!(2.5).into(),
            ArrayD::<f32>::zeros(IxDyn(&[0])).into(),
            arr0(7u16).into_dyn().into(),
            arr2(&[[1.0f32, 2.0], [3.0, 4.0]]).into_dyn().into(),
        ];
        for input in inputs {
            let once = array_sequence_to_binary_or_json(input).unwrap();
            let twice = array_sequence_to_binary_or_json(once.clone()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_numeric_array_goes_binary() {
        let array = arr2(&[[1u16, 2, 3], [4, 5, 6]]).into_dyn();
        let encoded = array_sequence_to_binary_or_json(array.clone()).unwrap();
        let Encoded::Binary(binary) = encoded else {
            panic!("expected binary encoding");
        };
        assert_eq!(binary.dtype, DType::U16);
        assert_eq!(binary.shape, vec![2, 3]);
        assert_eq!(binary.data.len(), 12);
        assert_eq!(&binary.data[..4], &[1, 0, 2, 0]);
        assert_eq!(binary.decode().unwrap(), DynArray::U16(array));
    }

    #[test]
    fn test_binary_round_trip_is_exact() {
        let floats = arr1(&[0.1f64, -0.0, f64::MAX, f64::MIN_POSITIVE, f64::NAN]).into_dyn();
        let Encoded::Binary(binary) = array_sequence_to_binary_or_json(floats.clone()).unwrap()
        else {
            panic!("expected binary encoding");
        };
        let DynArray::F64(decoded) = binary.decode().unwrap() else {
            panic!("dtype changed");
        };
        for (a, b) in floats.iter().zip(decoded.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }

        let ints = Array3::from_shape_fn((3, 4, 5), |(i, j, k)| (i * 100 + j * 10 + k) as i32 - 150)
            .into_dyn();
        let Encoded::Binary(binary) = array_sequence_to_binary_or_json(ints.clone()).unwrap()
        else {
            panic!("expected binary encoding");
        };
        assert_eq!(binary.decode().unwrap(), DynArray::I32(ints));
    }

    #[test]
    fn test_non_contiguous_view_is_encoded_in_logical_order() {
        let array = arr2(&[[1u8, 2], [3, 4]]).reversed_axes().into_dyn();
        let Encoded::Binary(binary) = array_sequence_to_binary_or_json(array).unwrap() else {
            panic!("expected binary encoding");
        };
        assert_eq!(&binary.data[..], &[1, 3, 2, 4]);
    }

    #[test]
    fn test_unsupported_dtype_falls_back_to_json() {
        let array = arr2(&[[1i64, 2], [3, 4]]).into_dyn();
        assert_eq!(
            array_sequence_to_binary_or_json(array).unwrap(),
            Encoded::Json(json!([[1, 2], [3, 4]]))
        );

        let mask = DynArray::Bool(arr1(&[true, false]).into_dyn());
        assert_eq!(
            array_sequence_to_binary_or_json(mask).unwrap(),
            Encoded::Json(json!([true, false]))
        );
    }

    #[test]
    fn test_json_only_channel_preserves_rank() {
        let array = Array3::<u8>::ones((2, 1, 2)).into_dyn();
        let encoded = encode_with(array, &CodecOptions::json_only()).unwrap();
        assert_eq!(encoded, Encoded::Json(json!([[[1, 1]], [[1, 1]]])));
    }

    #[test]
    fn test_non_finite_json_values_become_null() {
        let array = arr1(&[1.5f32, f32::NAN]).into_dyn();
        let encoded = encode_with(array, &CodecOptions::json_only()).unwrap();
        assert_eq!(encoded, Encoded::Json(json!([1.5, null])));
    }

    #[test]
    fn test_webgl_narrowing() {
        let options = CodecOptions::default().with_webgl_narrowing(true);
        let array = arr1(&[1.5f64, 2.5]).into_dyn();
        let Encoded::Binary(binary) = encode_with(array, &options).unwrap() else {
            panic!("expected binary encoding");
        };
        assert_eq!(binary.dtype, DType::F32);

        let big = arr1(&[1i64, -2]).into_dyn();
        let Encoded::Binary(binary) = encode_with(big, &options).unwrap() else {
            panic!("narrowed int64 should travel as binary");
        };
        assert_eq!(binary.dtype, DType::I32);
        assert_eq!(
            binary.decode().unwrap(),
            DynArray::I32(arr1(&[1i32, -2]).into_dyn())
        );
    }

    #[test]
    fn test_webgl_narrowing_rejects_out_of_range_integers() {
        let options = CodecOptions::default().with_webgl_narrowing(true);

        let wide = arr1(&[1i64, i64::from(i32::MAX) + 1]).into_dyn();
        let result = encode_with(wide, &options);
        assert!(matches!(result, Err(TileError::UnsupportedDataType(DType::I64))));

        let wide = arr1(&[u64::from(u32::MAX) + 1]).into_dyn();
        let result = encode_with(wide, &options);
        assert!(matches!(result, Err(TileError::UnsupportedDataType(DType::U64))));

        let edge = arr1(&[i64::from(i32::MIN), i64::from(i32::MAX)]).into_dyn();
        let narrowed = DynArray::I64(edge).narrowed_for_webgl().unwrap();
        assert_eq!(
            narrowed,
            DynArray::I32(arr1(&[i32::MIN, i32::MAX]).into_dyn())
        );
    }

    #[test]
    fn test_sequence_of_frames() {
        let frames: Vec<Payload> = (0..3)
            .map(|i| arr1(&[i as f32, i as f32 + 0.5]).into_dyn().into())
            .collect();
        let encoded = array_sequence_to_binary_or_json(frames).unwrap();
        let Encoded::Sequence(items) = &encoded else {
            panic!("expected a sequence");
        };
        assert_eq!(items.len(), 3);
        assert!(encoded.has_binary());
    }

    #[test]
    fn test_objects_are_rejected() {
        let result = array_sequence_to_binary_or_json(json!({"x": 1}));
        assert!(matches!(result, Err(TileError::UnsupportedType(_))));
    }

    #[test]
    fn test_compressed_round_trip() {
        let options =
            CodecOptions::default().with_compression(CompressionMethod::Zstd, CompressionLevel::fast());
        let array = ArrayD::<f32>::zeros(IxDyn(&[64, 64]));
        let Encoded::Binary(binary) = encode_with(array.clone(), &options).unwrap() else {
            panic!("expected binary encoding");
        };
        assert!(binary.data.len() < 64 * 64 * 4);
        assert_eq!(binary.descriptor().compression, CompressionMethod::Zstd);
        assert_eq!(binary.decode().unwrap(), DynArray::F32(array));
    }

    #[test]
    fn test_descriptor_json() {
        let binary = BinaryArray::encode(
            &DynArray::U8(arr1(&[1u8, 2, 3]).into_dyn()),
            &CodecOptions::default(),
        )
        .unwrap();
        let descriptor = serde_json::to_value(binary.descriptor()).unwrap();
        assert_eq!(
            descriptor,
            json!({"dtype": "uint8", "shape": [3], "compression": "None"})
        );
    }

    #[test]
    fn test_bincode_framing() {
        let binary = BinaryArray::encode(
            &DynArray::I16(arr2(&[[-1i16, 2], [3, -4]]).into_dyn()),
            &CodecOptions::default(),
        )
        .unwrap();
        let framed = binary.to_bincode().unwrap();
        assert_eq!(BinaryArray::from_bincode(&framed).unwrap(), binary);
    }

    #[test]
    fn test_truncated_buffer_is_rejected() {
        let mut binary = BinaryArray::encode(
            &DynArray::U32(arr1(&[1u32, 2, 3]).into_dyn()),
            &CodecOptions::default(),
        )
        .unwrap();
        binary.data = binary.data.slice(..8);
        assert!(matches!(binary.decode(), Err(TileError::InvalidFormat(_))));
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let binary = BinaryArray {
            data: Bytes::from_static(&[0u8; 8]),
            shape: vec![usize::MAX, 2],
            dtype: DType::U8,
            compression: CompressionMethod::None,
        };
        let framed = binary.to_bincode().unwrap();
        let received = BinaryArray::from_bincode(&framed).unwrap();
        assert!(matches!(received.element_count(), Err(TileError::InvalidFormat(_))));
        assert!(matches!(received.decode(), Err(TileError::InvalidFormat(_))));

        // element count fits, byte length does not
        let wide = BinaryArray {
            shape: vec![usize::MAX / 2],
            dtype: DType::F64,
            ..received
        };
        assert!(wide.element_count().is_ok());
        assert!(matches!(wide.decode(), Err(TileError::InvalidFormat(_))));
    }

    #[test]
    fn test_oversized_compressed_descriptor_is_rejected() {
        let options = CodecOptions::default()
            .with_compression(CompressionMethod::Deflate, CompressionLevel::best());
        let Encoded::Binary(binary) =
            encode_with(ArrayD::<f64>::zeros(IxDyn(&[16])), &options).unwrap()
        else {
            panic!("expected binary encoding");
        };

        // a lying descriptor must not reserve its claimed size
        let huge = BinaryArray {
            shape: vec![1 << 60],
            ..binary.clone()
        };
        assert!(matches!(huge.decode(), Err(TileError::Decompression(_))));

        // a stream that inflates past its descriptor is cut off
        let small = BinaryArray {
            shape: vec![2],
            ..binary
        };
        assert!(matches!(small.decode(), Err(TileError::Decompression(_))));
    }
}
