/// Unquoted keyword denoting a null element in the text form.
pub const NULL_KEYWORD: &str = "NULL";

/// Lower bound given to every dimension built from a native sequence.
pub const DEFAULT_LOWER_BOUND: i32 = 1;

/// PostgreSQL's MAXDIM.
pub const MAX_DIMENSIONS: usize = 6;

/// Length prefix marking a null element in the binary form.
pub const NULL_LENGTH: i32 = -1;

#[inline]
pub fn is_null_keyword(s: &str) -> bool {
    s.eq_ignore_ascii_case(NULL_KEYWORD)
}

/// Whitespace as the server's array parser sees it, vertical tab included.
#[inline]
pub fn is_array_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

#[inline]
pub fn is_structural_char(ch: char) -> bool {
    matches!(ch, '{' | '}' | '"' | '\\')
}
