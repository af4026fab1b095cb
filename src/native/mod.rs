//! Conversion between arrays and nested native Rust containers.
//!
//! [`NativeSource`] walks a native value into dimensions plus row-major
//! elements; [`NativeTarget`] distributes them back out. Both are implemented
//! for `Vec`, fixed-size arrays and `Option`, nested to any depth, over the
//! scalar types the shipped elements understand.

mod build;
mod walk;

pub use build::{ElementCursor, NativeTarget};
pub use walk::NativeSource;

use crate::element::Element;
use crate::types::{Array, ShapeProbe, Status};
use crate::{Error, Result};

/// Flatten `native` into a fresh array without touching any existing value.
pub(crate) fn collect<E, N>(native: &N) -> Result<Array<E>>
where
    E: Element,
    N: NativeSource<E> + ?Sized,
{
    if native.is_null() {
        return Ok(Array::null());
    }
    if N::RANK == 0 {
        return Err(Error::InvalidShape(
            "scalar value where an array was expected".to_string(),
        ));
    }

    let mut probe = ShapeProbe::new(N::RANK);
    native.measure(0, &mut probe)?;
    let dimensions = probe.into_dimensions()?;
    if dimensions.is_empty() {
        return Ok(Array::empty());
    }

    let mut elements = Vec::new();
    native.flatten(&mut elements)?;
    Ok(Array::from_parts(elements, dimensions, Status::Present))
}

/// Write `array` into `dst`, checking rank and fixed lengths before mutating.
pub(crate) fn distribute<E, D>(array: &Array<E>, dst: &mut D) -> Result<()>
where
    E: Element,
    D: NativeTarget<E> + ?Sized,
{
    match array.status {
        Status::Undefined => return Err(Error::undefined(E::TYPE_NAME)),
        Status::Null => return dst.assign_null(),
        Status::Present => {}
    }
    if D::RANK == 0 {
        return Err(Error::InvalidShape(
            "scalar destination for an array".to_string(),
        ));
    }
    if array.dimensions.is_empty() {
        return dst.assign_empty();
    }
    if array.dimensions.len() != D::RANK {
        return Err(Error::Rank {
            expected: D::RANK,
            actual: array.dimensions.len(),
        });
    }

    D::check_shape(&array.dimensions, 0)?;
    let mut cursor = ElementCursor::new(&array.elements);
    dst.fill_from(&array.dimensions, &mut cursor)?;
    if !cursor.is_exhausted() {
        return Err(Error::InvalidShape(format!(
            "{} elements left over after {}",
            array.elements.len() - cursor.position(),
            cursor.position()
        )));
    }
    Ok(())
}
