use smallvec::SmallVec;

use crate::constants::{MAX_DIMENSIONS, NULL_KEYWORD};
use crate::element::{encodes_payload, Element, IsNull};
use crate::options::EncodeOptions;
use crate::text::string::push_element;
use crate::types::{Array, Status};
use crate::Result;

/// Append the `array_out` form of `array` to `out`.
///
/// Lower bounds are never written, so a text round trip resets them to 1.
pub fn write_array<T: Element>(
    array: &Array<T>,
    options: &EncodeOptions,
    out: &mut String,
) -> Result<IsNull> {
    if !encodes_payload(array.status, "array")? {
        return Ok(IsNull::Yes);
    }
    array.validate()?;
    if array.dimensions.is_empty() {
        out.push_str("{}");
        return Ok(IsNull::No);
    }

    let delimiter = options.delimiter.unwrap_or_else(T::delimiter).as_char();

    // strides[d] = number of elements spanned by one sub-array at depth d
    let mut strides: SmallVec<[usize; MAX_DIMENSIONS]> = SmallVec::new();
    let mut span = 1usize;
    for dim in array.dimensions.iter().rev() {
        span *= dim.length as usize;
        strides.push(span);
    }
    strides.reverse();

    let mut scratch = String::new();
    for (idx, element) in array.elements.iter().enumerate() {
        if idx > 0 {
            for &stride in &strides {
                if idx % stride == 0 {
                    out.push('}');
                }
            }
            out.push(delimiter);
        }
        for &stride in &strides {
            if idx % stride == 0 {
                out.push('{');
            }
        }
        write_element(element, delimiter, &mut scratch, out)?;
    }
    for _ in 0..strides.len() {
        out.push('}');
    }
    Ok(IsNull::No)
}

fn write_element<T: Element>(
    element: &T,
    delimiter: char,
    scratch: &mut String,
    out: &mut String,
) -> Result<()> {
    if element.status() == Status::Null {
        out.push_str(NULL_KEYWORD);
        return Ok(());
    }
    scratch.clear();
    match element.encode_text(scratch)? {
        IsNull::Yes => out.push_str(NULL_KEYWORD),
        IsNull::No => push_element(out, scratch, delimiter),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Int4, Text};
    use crate::types::{ArrayDimension, Delimiter};

    fn text_of<T: Element>(array: &Array<T>, options: &EncodeOptions) -> String {
        let mut out = String::new();
        write_array(array, options, &mut out).unwrap();
        out
    }

    #[rstest::rstest]
    fn test_nested_braces() {
        let array = Array::new(
            (1..=6).map(Int4::new).collect(),
            vec![ArrayDimension::with_length(3), ArrayDimension::with_length(2)],
        )
        .unwrap();
        assert_eq!(
            text_of(&array, &EncodeOptions::default()),
            "{{1,2},{3,4},{5,6}}"
        );
    }

    #[rstest::rstest]
    fn test_three_levels() {
        let array = Array::new(
            (1..=8).map(Int4::new).collect(),
            vec![ArrayDimension::with_length(2); 3],
        )
        .unwrap();
        assert_eq!(
            text_of(&array, &EncodeOptions::default()),
            "{{{1,2},{3,4}},{{5,6},{7,8}}}"
        );
    }

    #[rstest::rstest]
    fn test_quoting_and_null() {
        let array = Array::new(
            vec![
                Text::new("NULL"),
                Text::null(),
                Text::new(""),
                Text::new("a b"),
                Text::new("x,y"),
            ],
            vec![ArrayDimension::with_length(5)],
        )
        .unwrap();
        assert_eq!(
            text_of(&array, &EncodeOptions::default()),
            r#"{"NULL",NULL,"",a b,"x,y"}"#
        );
    }

    #[rstest::rstest]
    fn test_delimiter_override() {
        let array = Array::new(
            vec![Text::new("x,y"), Text::new("z")],
            vec![ArrayDimension::with_length(2)],
        )
        .unwrap();
        let options = EncodeOptions::new().with_delimiter(Delimiter::Semicolon);
        assert_eq!(text_of(&array, &options), "{x,y;z}");
    }

    #[rstest::rstest]
    fn test_empty_null_and_bounds() {
        assert_eq!(
            text_of(&Array::<Int4>::empty(), &EncodeOptions::default()),
            "{}"
        );

        let mut out = String::new();
        let written =
            write_array(&Array::<Int4>::null(), &EncodeOptions::default(), &mut out).unwrap();
        assert_eq!(written, IsNull::Yes);
        assert!(out.is_empty());

        let shifted = Array::new(
            vec![Int4::new(7)],
            vec![ArrayDimension::new(1, 5)],
        )
        .unwrap();
        assert_eq!(text_of(&shifted, &EncodeOptions::default()), "{7}");
    }
}
