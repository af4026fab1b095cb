//! PostgreSQL array values with binary (`array_send`/`array_recv`) and text
//! (`array_out`/`array_in`) codecs.
//!
//! An [`Array<T>`] is built from nested Rust containers, encoded to either
//! wire form, decoded back, and written out into nested containers again:
//!
//! ```
//! use pgarray::Int4Array;
//!
//! let array = Int4Array::from_native(&vec![vec![1, 2], vec![3, 4]])?;
//! let text = pgarray::to_text(&array)?.unwrap();
//! assert_eq!(text, "{{1,2},{3,4}}");
//!
//! let decoded: Int4Array = pgarray::from_binary(&pgarray::to_binary(&array)?)?;
//! let mut out: Vec<[i32; 2]> = Vec::new();
//! decoded.assign_to(&mut out)?;
//! assert_eq!(out, vec![[1, 2], [3, 4]]);
//! # Ok::<(), pgarray::Error>(())
//! ```

pub mod constants;
pub mod decode;
pub mod element;
pub mod encode;
pub mod error;
pub mod native;
pub mod options;
pub mod text;
pub mod types;

pub use crate::element::{
    AssignTo, Bool, Cidr, Element, Float4, Float8, FromNative, Inet, InfinityModifier, Int2,
    Int4, Int8, IsNull, Text, Timestamp, Uuid,
};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::native::{NativeSource, NativeTarget};
pub use crate::options::{DecodeOptions, EncodeOptions};
pub use crate::types::{
    validate_rectangular, Array, ArrayDimension, BoolArray, CidrArray, Delimiter, EnumArray,
    Float4Array, Float8Array, InetArray, Int2Array, Int4Array, Int8Array, ShapeProbe, Status,
    TextArray, TimestampArray, UuidArray,
};

pub fn to_binary<T: Element>(array: &Array<T>) -> Result<Vec<u8>> {
    to_binary_with_options(array, &EncodeOptions::default())
}

pub fn to_binary_with_options<T: Element>(
    array: &Array<T>,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    encode::to_binary(array, options)
}

pub fn to_text<T: Element>(array: &Array<T>) -> Result<Option<String>> {
    to_text_with_options(array, &EncodeOptions::default())
}

pub fn to_text_with_options<T: Element>(
    array: &Array<T>,
    options: &EncodeOptions,
) -> Result<Option<String>> {
    encode::to_text(array, options)
}

pub fn from_binary<T: Element>(input: &[u8]) -> Result<Array<T>> {
    from_binary_with_options(input, &DecodeOptions::default())
}

pub fn from_binary_with_options<T: Element>(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<Array<T>> {
    decode::from_binary(input, options)
}

pub fn from_text<T: Element>(input: &str) -> Result<Array<T>> {
    from_text_with_options(input, &DecodeOptions::default())
}

pub fn from_text_with_options<T: Element>(
    input: &str,
    options: &DecodeOptions,
) -> Result<Array<T>> {
    decode::from_text(input, options)
}

/// Check that `input` is a well-formed array literal of `T` without keeping
/// the decoded value.
pub fn validate_text<T: Element>(input: &str, options: &DecodeOptions) -> Result<()> {
    decode::from_text::<T>(input, options).map(|_| ())
}
