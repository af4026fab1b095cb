pub mod binary;
pub mod scanner;
pub mod text;

pub use binary::{read_header_only, ArrayHeader};
pub use scanner::{ArrayLiteral, Scanner};

use crate::element::Element;
use crate::options::DecodeOptions;
use crate::types::Array;
use crate::Result;

/// Decode PostgreSQL's binary array format.
///
/// # Examples
/// ```
/// use pgarray::{decode, DecodeOptions, Int4Array};
///
/// let bytes = Int4Array::from_native(&vec![Some(1), None])?.to_binary()?;
/// let array: Int4Array = decode::from_binary(&bytes, &DecodeOptions::default())?;
/// assert!(array.has_null());
/// # Ok::<(), pgarray::Error>(())
/// ```
pub fn from_binary<T: Element>(raw: &[u8], options: &DecodeOptions) -> Result<Array<T>> {
    binary::read_array(raw, options)
}

/// Decode an array literal such as `{{1,2},{3,4}}`.
///
/// # Examples
/// ```
/// use pgarray::{decode, DecodeOptions, TextArray};
///
/// let array: TextArray = decode::from_text(r#"{"NULL",NULL}"#, &DecodeOptions::default())?;
/// assert_eq!(array.elements[0].as_str(), Some("NULL"));
/// assert!(array.elements[1].status.is_null());
/// # Ok::<(), pgarray::Error>(())
/// ```
pub fn from_text<T: Element>(raw: &str, options: &DecodeOptions) -> Result<Array<T>> {
    text::parse_array(raw, options)
}
