use thiserror::Error;

/// Coarse classification of an [`Error`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Shape,
    Conversion,
    Assignment,
    Truncated,
    DimensionOverflow,
    TextSyntax,
    State,
    Decode,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sibling sub-sequences (or a fixed destination) disagree on a length.
    #[error("shape mismatch at depth {depth}: expected length {expected}, found {actual}")]
    Shape {
        depth: usize,
        expected: usize,
        actual: usize,
    },

    /// Number of dimensions differs from the rank of the destination.
    #[error("rank mismatch: destination has {expected} dimensions, array has {actual}")]
    Rank { expected: usize, actual: usize },

    #[error("invalid array shape: {0}")]
    InvalidShape(String),

    #[error("cannot convert {detail} into {type_name}")]
    Conversion {
        type_name: &'static str,
        detail: String,
    },

    #[error("cannot assign {type_name}: {detail}")]
    Assignment {
        type_name: &'static str,
        detail: String,
    },

    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("dimension overflow: {0}")]
    DimensionOverflow(String),

    #[error("invalid array header: {0}")]
    InvalidHeader(String),

    #[error("array literal syntax error at offset {offset}: {detail}")]
    TextSyntax { offset: usize, detail: String },

    #[error("{type_name} value has undefined status")]
    UndefinedStatus { type_name: &'static str },

    #[error("invalid {type_name} value: {detail}")]
    InvalidElement {
        type_name: &'static str,
        detail: String,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape { .. } | Error::Rank { .. } | Error::InvalidShape(_) => ErrorKind::Shape,
            Error::Conversion { .. } => ErrorKind::Conversion,
            Error::Assignment { .. } => ErrorKind::Assignment,
            Error::Truncated { .. } => ErrorKind::Truncated,
            Error::DimensionOverflow(_) => ErrorKind::DimensionOverflow,
            Error::TextSyntax { .. } => ErrorKind::TextSyntax,
            Error::UndefinedStatus { .. } => ErrorKind::State,
            Error::InvalidHeader(_) | Error::InvalidElement { .. } => ErrorKind::Decode,
        }
    }

    pub fn shape(depth: usize, expected: usize, actual: usize) -> Self {
        Error::Shape {
            depth,
            expected,
            actual,
        }
    }

    pub fn conversion(type_name: &'static str, detail: impl Into<String>) -> Self {
        Error::Conversion {
            type_name,
            detail: detail.into(),
        }
    }

    pub fn assignment(type_name: &'static str, detail: impl Into<String>) -> Self {
        Error::Assignment {
            type_name,
            detail: detail.into(),
        }
    }

    pub fn syntax(offset: usize, detail: impl Into<String>) -> Self {
        Error::TextSyntax {
            offset,
            detail: detail.into(),
        }
    }

    pub fn invalid_element(type_name: &'static str, detail: impl Into<String>) -> Self {
        Error::InvalidElement {
            type_name,
            detail: detail.into(),
        }
    }

    pub fn undefined(type_name: &'static str) -> Self {
        Error::UndefinedStatus { type_name }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
