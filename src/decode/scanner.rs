use std::borrow::Cow;

use memchr::memchr2;

use crate::constants::{is_array_whitespace, is_null_keyword};
use crate::types::{ArrayDimension, ShapeProbe};
use crate::{Error, Result};

/// A scanned array literal: raw element texts (`None` for NULL) in row-major
/// order plus the dimensions they form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteral<'a> {
    pub items: Vec<Option<Cow<'a, str>>>,
    pub dimensions: Vec<ArrayDimension>,
}

/// Explicit `[lb:ub]` bounds written before `=`.
type Bounds = Vec<(i32, i32)>;

pub struct Scanner<'a> {
    input: &'a str,
    position: usize,
    delimiter: u8,
    max_dimensions: usize,
    leaf_depth: Option<usize>,
    probe: ShapeProbe,
    items: Vec<Option<Cow<'a, str>>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str, delimiter: u8, max_dimensions: usize) -> Self {
        Self {
            input,
            position: 0,
            delimiter,
            max_dimensions,
            leaf_depth: None,
            probe: ShapeProbe::default(),
            items: Vec::new(),
        }
    }

    /// Scan the whole input as one array literal.
    pub fn scan(mut self) -> Result<ArrayLiteral<'a>> {
        self.skip_whitespace();
        let bounds = if self.peek() == Some(b'[') {
            Some(self.scan_bounds()?)
        } else {
            None
        };

        self.skip_whitespace();
        if self.peek() != Some(b'{') {
            return Err(self.error("array literal must start with '{'"));
        }
        self.scan_array(0)?;
        self.skip_whitespace();
        if self.position < self.input.len() {
            return Err(self.error("unexpected content after the closing '}'"));
        }

        let dimensions = self.finish_dimensions(bounds)?;
        Ok(ArrayLiteral {
            items: self.items,
            dimensions,
        })
    }

    fn finish_dimensions(&mut self, bounds: Option<Bounds>) -> Result<Vec<ArrayDimension>> {
        if self.items.is_empty() {
            if bounds.is_some() {
                return Err(Error::syntax(0, "dimension bounds given for an empty array"));
            }
            return Ok(Vec::new());
        }

        let rank = self.leaf_depth.map_or(0, |depth| depth + 1);
        if let Some(depth) = (0..self.probe.rank())
            .find(|&depth| matches!(self.probe.length_at(depth), None | Some(0)))
        {
            return Err(Error::InvalidShape(format!(
                "zero-length sub-array at depth {depth} beside non-empty siblings"
            )));
        }
        let mut dimensions = std::mem::take(&mut self.probe).into_dimensions()?;
        if dimensions.len() != rank {
            return Err(Error::InvalidShape(format!(
                "elements at depth {} but sub-arrays nest {} deep",
                rank,
                dimensions.len()
            )));
        }

        if let Some(bounds) = bounds {
            if bounds.len() != rank {
                return Err(Error::syntax(
                    0,
                    format!("{} bounds given for {rank} dimensions", bounds.len()),
                ));
            }
            for (axis, (dim, (lower, upper))) in dimensions.iter_mut().zip(bounds).enumerate() {
                if i64::from(upper) - i64::from(lower) + 1 != i64::from(dim.length) {
                    return Err(Error::syntax(
                        0,
                        format!(
                            "bounds [{lower}:{upper}] of dimension {axis} do not match length {}",
                            dim.length
                        ),
                    ));
                }
                dim.lower_bound = lower;
            }
        }
        Ok(dimensions)
    }

    fn scan_bounds(&mut self) -> Result<Bounds> {
        let mut bounds = Vec::new();
        while self.peek() == Some(b'[') {
            self.position += 1;
            let first = self.scan_integer()?;
            let (lower, upper) = if self.peek() == Some(b':') {
                self.position += 1;
                (first, self.scan_integer()?)
            } else {
                (1, first)
            };
            self.expect(b']')?;
            if upper < lower.saturating_sub(1) {
                return Err(self.error("upper bound below lower bound"));
            }
            bounds.push((lower, upper));
            if bounds.len() > self.max_dimensions {
                return Err(Error::DimensionOverflow(format!(
                    "more than {} dimensions",
                    self.max_dimensions
                )));
            }
            self.skip_whitespace();
        }
        self.expect(b'=')?;
        Ok(bounds)
    }

    fn scan_integer(&mut self) -> Result<i32> {
        self.skip_whitespace();
        let start = self.position;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.position += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        let digits = &self.input[start..self.position];
        let value = digits
            .parse::<i32>()
            .map_err(|_| Error::syntax(start, format!("invalid bound {digits:?}")))?;
        self.skip_whitespace();
        Ok(value)
    }

    fn scan_array(&mut self, depth: usize) -> Result<()> {
        if depth >= self.max_dimensions {
            return Err(Error::DimensionOverflow(format!(
                "array literal nests deeper than {} dimensions",
                self.max_dimensions
            )));
        }
        if let Some(leaf) = self.leaf_depth.filter(|&leaf| leaf < depth) {
            return Err(Error::InvalidShape(format!(
                "sub-array at depth {depth} below elements at depth {leaf}"
            )));
        }
        self.expect(b'{')?;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.position += 1;
            return self.probe.observe(depth, 0);
        }

        let mut length = 0usize;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'{') {
                self.scan_array(depth + 1)?;
            } else {
                match self.leaf_depth {
                    None => self.leaf_depth = Some(depth),
                    Some(leaf) if leaf != depth => {
                        return Err(Error::InvalidShape(format!(
                            "element at depth {depth} where sub-arrays nest to depth {leaf}"
                        )))
                    }
                    Some(_) => {}
                }
                let item = self.scan_element()?;
                self.items.push(item);
            }
            length += 1;

            self.skip_whitespace();
            match self.peek() {
                Some(b'}') => {
                    self.position += 1;
                    break;
                }
                Some(byte) if byte == self.delimiter => self.position += 1,
                Some(_) => return Err(self.error("expected delimiter or '}'")),
                None => return Err(self.error("unterminated array literal")),
            }
        }
        self.probe.observe(depth, length)
    }

    fn scan_element(&mut self) -> Result<Option<Cow<'a, str>>> {
        match self.peek() {
            Some(b'"') => self.scan_quoted().map(Some),
            Some(_) => self.scan_unquoted(),
            None => Err(self.error("unterminated array literal")),
        }
    }

    fn scan_quoted(&mut self) -> Result<Cow<'a, str>> {
        let open = self.position;
        self.position += 1;
        let mut owned: Option<String> = None;
        let mut start = self.position;
        loop {
            let rest = &self.input.as_bytes()[self.position..];
            let Some(found) = memchr2(b'"', b'\\', rest) else {
                return Err(Error::syntax(open, "unterminated quoted element"));
            };
            let at = self.position + found;
            if rest[found] == b'"' {
                self.position = at + 1;
                return Ok(match owned {
                    Some(mut buf) => {
                        buf.push_str(&self.input[start..at]);
                        Cow::Owned(buf)
                    }
                    None => Cow::Borrowed(&self.input[start..at]),
                });
            }
            let escaped = self.input[at + 1..]
                .chars()
                .next()
                .ok_or_else(|| Error::syntax(open, "unterminated quoted element"))?;
            let buf = owned.get_or_insert_with(String::new);
            buf.push_str(&self.input[start..at]);
            buf.push(escaped);
            self.position = at + 1 + escaped.len_utf8();
            start = self.position;
        }
    }

    fn scan_unquoted(&mut self) -> Result<Option<Cow<'a, str>>> {
        let start = self.position;
        let bytes = self.input.as_bytes();
        let mut owned: Option<String> = None;
        // length of `owned` up to its last escaped or non-whitespace char
        let mut keep = 0usize;
        let mut segment = start;

        while let Some(&byte) = bytes.get(self.position) {
            if byte == self.delimiter || matches!(byte, b'{' | b'}') {
                break;
            }
            match byte {
                b'"' => return Err(self.error("unexpected '\"' in unquoted element")),
                b'\\' => {
                    let escaped = self.input[self.position + 1..]
                        .chars()
                        .next()
                        .ok_or_else(|| self.error("dangling '\\' at end of input"))?;
                    let buf = owned.get_or_insert_with(String::new);
                    push_trimmed(buf, &self.input[segment..self.position], &mut keep);
                    buf.push(escaped);
                    keep = buf.len();
                    self.position += 1 + escaped.len_utf8();
                    segment = self.position;
                }
                _ => self.position += 1,
            }
        }

        let token = match owned {
            Some(mut buf) => {
                push_trimmed(&mut buf, &self.input[segment..self.position], &mut keep);
                buf.truncate(keep);
                return Ok(Some(Cow::Owned(buf)));
            }
            None => self.input[start..self.position].trim_end_matches(is_array_whitespace),
        };
        if token.is_empty() {
            return Err(Error::syntax(start, "empty unquoted element"));
        }
        if is_null_keyword(token) {
            return Ok(None);
        }
        Ok(Some(Cow::Borrowed(token)))
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() != Some(byte) {
            return Err(self.error(format!("expected '{}'", byte as char)));
        }
        self.position += 1;
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(byte) if is_array_whitespace(byte as char)) {
            self.position += 1;
        }
    }

    fn error(&self, detail: impl Into<String>) -> Error {
        Error::syntax(self.position, detail)
    }
}

/// Append `segment`, advancing `keep` past its last non-whitespace char.
fn push_trimmed(buf: &mut String, segment: &str, keep: &mut usize) {
    let content = segment.trim_end_matches(is_array_whitespace);
    if !content.is_empty() {
        buf.push_str(content);
        *keep = buf.len();
        buf.push_str(&segment[content.len()..]);
    } else {
        buf.push_str(segment);
    }
}
