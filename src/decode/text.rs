use tracing::{debug, trace};

use super::scanner::Scanner;
use crate::element::Element;
use crate::options::DecodeOptions;
use crate::types::{Array, Status};
use crate::Result;

/// Decode a present array from its `array_in` literal.
///
/// Explicit bounds (`[0:1]={a,b}`) are honoured; without them every
/// dimension starts at 1.
pub fn parse_array<T: Element>(raw: &str, options: &DecodeOptions) -> Result<Array<T>> {
    let delimiter = options.delimiter.unwrap_or_else(T::delimiter);
    let literal = Scanner::new(raw, delimiter.as_byte(), options.max_dimensions)
        .scan()
        .map_err(|err| {
            debug!(error = %err, "rejecting array literal");
            err
        })?;
    trace!(
        ndim = literal.dimensions.len(),
        elements = literal.items.len(),
        "scanned array literal"
    );

    if literal.items.is_empty() {
        return Ok(Array::empty());
    }
    let elements = literal
        .items
        .iter()
        .map(|item| T::decode_text(item.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Array::from_parts(elements, literal.dimensions, Status::Present))
}
