pub mod binary;
pub mod text;

use bytes::BytesMut;

use crate::element::{Element, IsNull};
use crate::options::EncodeOptions;
use crate::types::Array;
use crate::{Error, Result};

/// Encode a present array into PostgreSQL's binary array format.
///
/// A NULL array has no binary body and is reported as an error; callers
/// that frame values themselves should use [`binary::write_array`].
///
/// # Examples
/// ```
/// use pgarray::{encode, EncodeOptions, TextArray};
///
/// let array = TextArray::from_native(&vec![Some("red"), None])?;
/// let bytes = encode::to_binary(&array, &EncodeOptions::default())?;
/// assert_eq!(&bytes[..4], &1i32.to_be_bytes());
/// # Ok::<(), pgarray::Error>(())
/// ```
pub fn to_binary<T: Element>(array: &Array<T>, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut out = BytesMut::new();
    match binary::write_array(array, options, &mut out)? {
        IsNull::No => Ok(out.to_vec()),
        IsNull::Yes => Err(Error::InvalidShape(
            "NULL array has no binary form".to_string(),
        )),
    }
}

/// Encode an array literal, or `None` for a NULL array.
///
/// # Examples
/// ```
/// use pgarray::{encode, EncodeOptions, Int4Array};
///
/// let array = Int4Array::from_native(&[[1, 2], [3, 4]])?;
/// let text = encode::to_text(&array, &EncodeOptions::default())?;
/// assert_eq!(text.as_deref(), Some("{{1,2},{3,4}}"));
/// # Ok::<(), pgarray::Error>(())
/// ```
pub fn to_text<T: Element>(array: &Array<T>, options: &EncodeOptions) -> Result<Option<String>> {
    let mut out = String::new();
    match text::write_array(array, options, &mut out)? {
        IsNull::No => Ok(Some(out)),
        IsNull::Yes => Ok(None),
    }
}
