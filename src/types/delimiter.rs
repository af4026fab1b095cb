use std::fmt;

use serde::{Deserialize, Serialize};

/// Character separating elements of an array literal.
///
/// PostgreSQL stores the delimiter per element type (`typdelim`); every
/// built-in type uses a comma except `box`, which uses a semicolon.
///
/// # Examples
/// ```
/// use pgarray::Delimiter;
///
/// let delim = Delimiter::Semicolon;
/// assert_eq!(delim.as_char(), ';');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
        }
    }

    #[inline]
    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }

    /// Parse a delimiter from a character.
    ///
    /// # Examples
    /// ```
    /// use pgarray::Delimiter;
    ///
    /// assert_eq!(Delimiter::from_char(';'), Some(Delimiter::Semicolon));
    /// assert_eq!(Delimiter::from_char('|'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Delimiter::Comma),
            ';' => Some(Delimiter::Semicolon),
            _ => None,
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_delimiter_conversion() {
        assert_eq!(Delimiter::Comma.as_char(), ',');
        assert_eq!(Delimiter::Semicolon.as_char(), ';');
        assert_eq!(Delimiter::default(), Delimiter::Comma);
    }

    #[rstest::rstest]
    fn test_delimiter_from_char() {
        assert_eq!(Delimiter::from_char(','), Some(Delimiter::Comma));
        assert_eq!(Delimiter::from_char(';'), Some(Delimiter::Semicolon));
        assert_eq!(Delimiter::from_char('\t'), None);
    }
}
