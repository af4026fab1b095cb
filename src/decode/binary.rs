use bytes::Buf;
use tracing::{debug, trace};

use crate::constants::NULL_LENGTH;
use crate::element::Element;
use crate::options::DecodeOptions;
use crate::types::{element_count, Array, ArrayDimension, Status};
use crate::{Error, Result};

/// The fixed part of a binary array: everything before the first element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayHeader {
    pub has_null: bool,
    pub element_oid: u32,
    pub dimensions: Vec<ArrayDimension>,
}

/// Bounds-checked big-endian reads that report the failing offset.
struct Reader<'a> {
    input: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            total: input.len(),
        }
    }

    fn offset(&self) -> usize {
        self.total - self.input.remaining()
    }

    fn remaining(&self) -> usize {
        self.input.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.input.remaining() < needed {
            return Err(Error::Truncated {
                offset: self.offset(),
                needed,
                remaining: self.input.remaining(),
            });
        }
        Ok(())
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.input.get_i32())
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.input.get_u32())
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let (head, tail) = self.input.split_at(len);
        self.input = tail;
        Ok(head)
    }
}

fn read_header(reader: &mut Reader<'_>, options: &DecodeOptions) -> Result<ArrayHeader> {
    let ndim = reader.read_i32()?;
    if ndim < 0 {
        return Err(Error::InvalidHeader(format!("negative dimension count {ndim}")));
    }
    let ndim = ndim as usize;
    if ndim > options.max_dimensions {
        return Err(Error::DimensionOverflow(format!(
            "{ndim} dimensions exceed the limit of {}",
            options.max_dimensions
        )));
    }

    let has_null = match reader.read_i32()? {
        0 => false,
        1 => true,
        flag => return Err(Error::InvalidHeader(format!("invalid null flag {flag}"))),
    };
    let element_oid = reader.read_u32()?;

    let mut dimensions = Vec::with_capacity(ndim);
    for axis in 0..ndim {
        let length = reader.read_i32()?;
        let lower_bound = reader.read_i32()?;
        if length < 0 {
            return Err(Error::InvalidHeader(format!(
                "negative length {length} for dimension {axis}"
            )));
        }
        if i64::from(lower_bound) + i64::from(length) - 1 > i64::from(i32::MAX) {
            return Err(Error::DimensionOverflow(format!(
                "upper bound of dimension {axis} exceeds i32"
            )));
        }
        dimensions.push(ArrayDimension::new(length, lower_bound));
    }

    Ok(ArrayHeader {
        has_null,
        element_oid,
        dimensions,
    })
}

/// Parse only the header of a binary array, leaving the elements unread.
///
/// # Examples
/// ```
/// use pgarray::decode::read_header_only;
/// use pgarray::{DecodeOptions, Int4Array};
///
/// let bytes = Int4Array::from_native(&vec![1, 2, 3])?.to_binary()?;
/// let header = read_header_only(&bytes, &DecodeOptions::default())?;
/// assert_eq!(header.element_oid, 23);
/// assert_eq!(header.dimensions[0].length, 3);
/// # Ok::<(), pgarray::Error>(())
/// ```
pub fn read_header_only(raw: &[u8], options: &DecodeOptions) -> Result<ArrayHeader> {
    read_header(&mut Reader::new(raw), options)
}

/// Decode a present array from its `array_send` form.
pub fn read_array<T: Element>(raw: &[u8], options: &DecodeOptions) -> Result<Array<T>> {
    let mut reader = Reader::new(raw);
    let header = read_header(&mut reader, options)?;
    trace!(
        ndim = header.dimensions.len(),
        has_null = header.has_null,
        element_oid = header.element_oid,
        "decoded binary array header"
    );

    if let Some(expected) = options.expected_element_oid {
        if header.element_oid != expected {
            debug!(
                expected,
                found = header.element_oid,
                "rejecting binary array with unexpected element oid"
            );
            return Err(Error::InvalidHeader(format!(
                "element oid {} does not match expected {expected}",
                header.element_oid
            )));
        }
    } else if header.element_oid != T::TYPE_OID {
        debug!(
            element_type = T::TYPE_NAME,
            found = header.element_oid,
            "binary array element oid differs from the element type"
        );
    }

    let count = element_count(&header.dimensions)?;
    // every element carries at least its 4-byte length word
    if count > reader.remaining() / 4 {
        return Err(Error::Truncated {
            offset: reader.offset(),
            needed: count.saturating_mul(4),
            remaining: reader.remaining(),
        });
    }

    let mut elements = Vec::with_capacity(count);
    for index in 0..count {
        let len = reader.read_i32()?;
        let element = match len {
            NULL_LENGTH => T::decode_binary(None)?,
            len if len < NULL_LENGTH => {
                return Err(Error::InvalidHeader(format!(
                    "element {index} has invalid length {len}"
                )))
            }
            len => T::decode_binary(Some(reader.read_bytes(len as usize)?))?,
        };
        elements.push(element);
    }

    if reader.remaining() > 0 {
        debug!(
            trailing = reader.remaining(),
            "rejecting binary array with trailing bytes"
        );
        return Err(Error::InvalidHeader(format!(
            "{} trailing bytes after {count} elements",
            reader.remaining()
        )));
    }

    if count == 0 {
        return Ok(Array::empty());
    }
    Ok(Array::from_parts(elements, header.dimensions, Status::Present))
}
