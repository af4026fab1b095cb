use crate::constants::MAX_DIMENSIONS;
use crate::types::Delimiter;

#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Element type oid written into the binary header. Falls back to the
    /// element type's own oid; required for types with a per-database oid
    /// such as enums.
    pub element_oid: Option<u32>,
    /// Overrides the element type's text delimiter.
    pub delimiter: Option<Delimiter>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element_oid(mut self, oid: u32) -> Self {
        self.element_oid = Some(oid);
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub delimiter: Option<Delimiter>,
    pub max_dimensions: usize,
    /// Reject binary input whose header names a different element oid.
    pub expected_element_oid: Option<u32>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_max_dimensions(mut self, max_dimensions: usize) -> Self {
        self.max_dimensions = max_dimensions;
        self
    }

    pub fn with_expected_element_oid(mut self, oid: u32) -> Self {
        self.expected_element_oid = Some(oid);
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_dimensions: MAX_DIMENSIONS,
            expected_element_oid: None,
        }
    }
}
