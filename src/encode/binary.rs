use bytes::{BufMut, BytesMut};

use crate::constants::NULL_LENGTH;
use crate::element::{encodes_payload, Element, IsNull};
use crate::options::EncodeOptions;
use crate::types::{Array, Status};
use crate::{Error, Result};

/// Arrays with at least this many elements encode in parallel when the
/// `parallel` feature is enabled.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 256;

/// Append the `array_send` form of `array` to `out`.
///
/// Returns [`IsNull::Yes`] without writing for a NULL array.
pub fn write_array<T: Element>(
    array: &Array<T>,
    options: &EncodeOptions,
    out: &mut BytesMut,
) -> Result<IsNull> {
    if !encodes_payload(array.status, "array")? {
        return Ok(IsNull::Yes);
    }
    array.validate()?;

    let element_oid = options.element_oid.unwrap_or(T::TYPE_OID);
    out.reserve(12 + array.dimensions.len() * 8 + array.elements.len() * 8);
    out.put_i32(to_i32(array.dimensions.len(), "dimension count")?);
    out.put_i32(i32::from(array.has_null()));
    // oids are unsigned on the server but travel as a 4-byte word
    out.put_u32(element_oid);
    for dim in &array.dimensions {
        out.put_i32(dim.length);
        out.put_i32(dim.lower_bound);
    }

    write_elements(&array.elements, out)?;
    Ok(IsNull::No)
}

#[cfg(feature = "parallel")]
fn write_elements<T: Element>(elements: &[T], out: &mut BytesMut) -> Result<()> {
    use rayon::prelude::*;

    if elements.len() < PARALLEL_THRESHOLD {
        return write_elements_serial(elements, out);
    }
    let chunks: Vec<BytesMut> = elements
        .par_iter()
        .map(|element| -> Result<BytesMut> {
            let mut buf = BytesMut::new();
            write_element(element, &mut buf)?;
            Ok(buf)
        })
        .collect::<Result<_>>()?;
    for chunk in chunks {
        out.extend_from_slice(&chunk);
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn write_elements<T: Element>(elements: &[T], out: &mut BytesMut) -> Result<()> {
    write_elements_serial(elements, out)
}

fn write_elements_serial<T: Element>(elements: &[T], out: &mut BytesMut) -> Result<()> {
    for element in elements {
        write_element(element, out)?;
    }
    Ok(())
}

/// Length-prefixed element; the prefix is patched once the payload size is known.
fn write_element<T: Element>(element: &T, out: &mut BytesMut) -> Result<()> {
    if element.status() == Status::Null {
        out.put_i32(NULL_LENGTH);
        return Ok(());
    }
    let start = out.len();
    out.put_i32(0);
    match element.encode_binary(out)? {
        IsNull::Yes => {
            out.truncate(start);
            out.put_i32(NULL_LENGTH);
        }
        IsNull::No => {
            let len = to_i32(out.len() - start - 4, "element length")?;
            out[start..start + 4].copy_from_slice(&len.to_be_bytes());
        }
    }
    Ok(())
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| Error::DimensionOverflow(format!("{what} {value} exceeds i32")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Int4, Text};
    use crate::types::ArrayDimension;

    fn words(bytes: &[u8], count: usize) -> Vec<i32> {
        bytes
            .chunks_exact(4)
            .take(count)
            .map(|chunk| i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    #[rstest::rstest]
    fn test_text_array_with_null_layout() {
        let array = Array::new(
            vec![Text::new("red"), Text::null()],
            vec![ArrayDimension::with_length(2)],
        )
        .unwrap();
        let mut out = BytesMut::new();
        write_array(&array, &EncodeOptions::default(), &mut out).unwrap();

        assert_eq!(words(&out, 5), vec![1, 1, 25, 2, 1]);
        assert_eq!(&out[20..24], &3i32.to_be_bytes());
        assert_eq!(&out[24..27], b"red");
        assert_eq!(&out[27..], &(-1i32).to_be_bytes());
    }

    #[rstest::rstest]
    fn test_element_oid_override() {
        let array = Array::new(vec![Text::new("ok")], vec![ArrayDimension::with_length(1)])
            .unwrap();
        let mut out = BytesMut::new();
        let options = EncodeOptions::new().with_element_oid(16_394);
        write_array(&array, &options, &mut out).unwrap();
        assert_eq!(words(&out, 3), vec![1, 0, 16_394]);
    }

    #[rstest::rstest]
    fn test_empty_and_null_arrays() {
        let mut out = BytesMut::new();
        let written = write_array(&Array::<Int4>::empty(), &EncodeOptions::default(), &mut out)
            .unwrap();
        assert_eq!(written, IsNull::No);
        assert_eq!(words(&out, 3), vec![0, 0, 23]);
        assert_eq!(out.len(), 12);

        let mut out = BytesMut::new();
        let written = write_array(&Array::<Int4>::null(), &EncodeOptions::default(), &mut out)
            .unwrap();
        assert_eq!(written, IsNull::Yes);
        assert!(out.is_empty());
    }

    #[rstest::rstest]
    fn test_undefined_element_fails() {
        let array = Array::new(
            vec![Int4::new(1), Int4::default()],
            vec![ArrayDimension::with_length(2)],
        )
        .unwrap();
        let mut out = BytesMut::new();
        let err = write_array(&array, &EncodeOptions::default(), &mut out).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::State);
    }
}
