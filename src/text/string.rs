use crate::constants::{is_array_whitespace, is_null_keyword, is_structural_char};

/// Whether an element's text must be double-quoted inside an array literal.
pub fn needs_quoting(value: &str, delimiter: char) -> bool {
    if value.is_empty() || is_null_keyword(value) {
        return true;
    }

    let bytes = value.as_bytes();
    let (first, last) = (bytes[0] as char, bytes[bytes.len() - 1] as char);
    if is_array_whitespace(first) || is_array_whitespace(last) {
        return true;
    }

    if delimiter.is_ascii() {
        let delimiter = delimiter as u8;
        return bytes
            .iter()
            .any(|&byte| byte == delimiter || matches!(byte, b'{' | b'}' | b'"' | b'\\'));
    }
    value
        .chars()
        .any(|ch| ch == delimiter || is_structural_char(ch))
}

/// Append `value` with `\` and `"` backslash-escaped.
pub fn escape_string_into(out: &mut String, value: &str) {
    let bytes = value.as_bytes();
    let mut start = 0;
    for (idx, byte) in bytes.iter().enumerate() {
        if !matches!(byte, b'"' | b'\\') {
            continue;
        }
        if start < idx {
            out.push_str(&value[start..idx]);
        }
        out.push('\\');
        out.push(*byte as char);
        start = idx + 1;
    }
    if start < value.len() {
        out.push_str(&value[start..]);
    }
}

/// Append `value` to `out`, quoted and escaped when the literal requires it.
pub fn push_element(out: &mut String, value: &str, delimiter: char) {
    if needs_quoting(value, delimiter) {
        out.reserve(value.len() + 2);
        out.push('"');
        escape_string_into(out, value);
        out.push('"');
    } else {
        out.push_str(value);
    }
}
