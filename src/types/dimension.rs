use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{DEFAULT_LOWER_BOUND, MAX_DIMENSIONS};
use crate::{Error, Result};

/// One axis of a rectangular array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayDimension {
    pub length: i32,
    pub lower_bound: i32,
}

impl ArrayDimension {
    pub fn new(length: i32, lower_bound: i32) -> Self {
        Self {
            length,
            lower_bound,
        }
    }

    /// A dimension of `length` starting at the default lower bound of 1.
    pub fn with_length(length: i32) -> Self {
        Self::new(length, DEFAULT_LOWER_BOUND)
    }

    /// Last valid index on this axis.
    pub fn upper_bound(&self) -> i64 {
        self.lower_bound as i64 + self.length as i64 - 1
    }
}

/// Number of elements described by `dimensions`, or 0 when there are none.
pub fn element_count(dimensions: &[ArrayDimension]) -> Result<usize> {
    if dimensions.is_empty() {
        return Ok(0);
    }
    dimensions.iter().try_fold(1usize, |count, dim| {
        let length = usize::try_from(dim.length).map_err(|_| {
            Error::InvalidHeader(format!("negative dimension length {}", dim.length))
        })?;
        count.checked_mul(length).ok_or_else(|| {
            Error::DimensionOverflow(format!(
                "element count of {} dimensions overflows",
                dimensions.len()
            ))
        })
    })
}

/// Records the length observed at each nesting depth and rejects siblings
/// that disagree.
#[derive(Debug, Clone, Default)]
pub struct ShapeProbe {
    levels: SmallVec<[Option<usize>; MAX_DIMENSIONS]>,
}

impl ShapeProbe {
    pub fn new(rank: usize) -> Self {
        let mut levels = SmallVec::with_capacity(rank);
        levels.resize(rank, None);
        Self { levels }
    }

    pub fn rank(&self) -> usize {
        self.levels.len()
    }

    pub fn observe(&mut self, depth: usize, length: usize) -> Result<()> {
        if depth >= self.levels.len() {
            self.levels.resize(depth + 1, None);
        }
        match self.levels[depth] {
            None => {
                self.levels[depth] = Some(length);
                Ok(())
            }
            Some(expected) if expected == length => Ok(()),
            Some(expected) => Err(Error::shape(depth, expected, length)),
        }
    }

    /// Length recorded at `depth`, if any sibling at that depth was seen.
    pub fn length_at(&self, depth: usize) -> Option<usize> {
        self.levels.get(depth).copied().flatten()
    }

    /// Collapse the observations into dimensions with the default lower bound.
    ///
    /// Any zero-length or never-reached level means the array holds no
    /// elements, which is represented by an empty dimension list.
    pub fn into_dimensions(self) -> Result<Vec<ArrayDimension>> {
        if self
            .levels
            .iter()
            .any(|level| matches!(level, None | Some(0)))
        {
            return Ok(Vec::new());
        }
        self.levels
            .iter()
            .flatten()
            .map(|&length| {
                i32::try_from(length)
                    .map(ArrayDimension::with_length)
                    .map_err(|_| {
                        Error::DimensionOverflow(format!("dimension length {length} exceeds i32"))
                    })
            })
            .collect()
    }
}

/// Check that every sibling at each depth reports the same length.
///
/// `levels[d]` lists the lengths observed for each sub-sequence at depth `d`.
///
/// # Examples
/// ```
/// use pgarray::{validate_rectangular, ArrayDimension};
///
/// let dims = validate_rectangular(&[&[2], &[3, 3]]).unwrap();
/// assert_eq!(dims, vec![ArrayDimension::with_length(2), ArrayDimension::with_length(3)]);
/// assert!(validate_rectangular(&[&[2], &[2, 1]]).is_err());
/// ```
pub fn validate_rectangular(levels: &[&[usize]]) -> Result<Vec<ArrayDimension>> {
    let mut probe = ShapeProbe::new(levels.len());
    for (depth, lengths) in levels.iter().enumerate() {
        for &length in lengths.iter() {
            probe.observe(depth, length)?;
        }
    }
    probe.into_dimensions()
}
