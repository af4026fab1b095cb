use std::net::{IpAddr, Ipv4Addr};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::element::{AssignTo, Element};
use crate::types::{ArrayDimension, Status};
use crate::{Error, Result};

/// Row-major read position over an array's flat element list.
#[derive(Debug)]
pub struct ElementCursor<'a, E> {
    elements: &'a [E],
    position: usize,
}

impl<'a, E> ElementCursor<'a, E> {
    pub fn new(elements: &'a [E]) -> Self {
        Self {
            elements,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a E> {
        self.elements.get(self.position)
    }

    pub fn advance(&mut self) -> Result<&'a E> {
        let element = self.elements.get(self.position).ok_or_else(|| {
            Error::InvalidShape(format!(
                "dimensions describe more than {} elements",
                self.elements.len()
            ))
        })?;
        self.position += 1;
        Ok(element)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.elements.len()
    }
}

/// A native destination that array elements of type `E` can be written into.
///
/// The destination's type fixes its rank and which levels have a fixed
/// length (`[N; K]`) versus a resizable one (`Vec<N>`). Only `Option`
/// accepts a NULL array.
pub trait NativeTarget<E> {
    const RANK: usize;

    /// Verify fixed-length levels against `dimensions` before any mutation.
    fn check_shape(dimensions: &[ArrayDimension], depth: usize) -> Result<()>;

    fn assign_null(&mut self) -> Result<()> {
        Err(Error::assignment(
            "array",
            "NULL array into a destination that cannot hold NULL",
        ))
    }

    /// Store a present array with no elements.
    fn assign_empty(&mut self) -> Result<()>;

    /// Placeholder value that `fill_from` overwrites.
    fn vacant() -> Self
    where
        Self: Sized;

    /// Populate from `dimensions` (this level first), consuming elements.
    fn fill_from(
        &mut self,
        dimensions: &[ArrayDimension],
        cursor: &mut ElementCursor<'_, E>,
    ) -> Result<()>;
}

fn split_level(dimensions: &[ArrayDimension]) -> Result<(usize, &[ArrayDimension])> {
    let (dim, rest) = dimensions
        .split_first()
        .ok_or_else(|| Error::InvalidShape("destination deeper than the array".to_string()))?;
    let length = usize::try_from(dim.length)
        .map_err(|_| Error::InvalidHeader(format!("negative dimension length {}", dim.length)))?;
    Ok((length, rest))
}

impl<E, N: NativeTarget<E>> NativeTarget<E> for Vec<N> {
    const RANK: usize = N::RANK + 1;

    fn check_shape(dimensions: &[ArrayDimension], depth: usize) -> Result<()> {
        let (_, rest) = split_level(dimensions)?;
        N::check_shape(rest, depth + 1)
    }

    fn assign_empty(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }

    fn vacant() -> Self {
        Vec::new()
    }

    fn fill_from(
        &mut self,
        dimensions: &[ArrayDimension],
        cursor: &mut ElementCursor<'_, E>,
    ) -> Result<()> {
        let (length, rest) = split_level(dimensions)?;
        self.clear();
        self.reserve(length);
        for _ in 0..length {
            let mut item = N::vacant();
            item.fill_from(rest, cursor)?;
            self.push(item);
        }
        Ok(())
    }
}

impl<E, N: NativeTarget<E>, const K: usize> NativeTarget<E> for [N; K] {
    const RANK: usize = N::RANK + 1;

    fn check_shape(dimensions: &[ArrayDimension], depth: usize) -> Result<()> {
        let (length, rest) = split_level(dimensions)?;
        if length != K {
            return Err(Error::shape(depth, K, length));
        }
        N::check_shape(rest, depth + 1)
    }

    fn assign_empty(&mut self) -> Result<()> {
        if K != 0 {
            return Err(Error::shape(0, K, 0));
        }
        Ok(())
    }

    fn vacant() -> Self {
        std::array::from_fn(|_| N::vacant())
    }

    fn fill_from(
        &mut self,
        dimensions: &[ArrayDimension],
        cursor: &mut ElementCursor<'_, E>,
    ) -> Result<()> {
        let (length, rest) = split_level(dimensions)?;
        if length != K {
            return Err(Error::shape(0, K, length));
        }
        for slot in self.iter_mut() {
            slot.fill_from(rest, cursor)?;
        }
        Ok(())
    }
}

impl<E: Element, N: NativeTarget<E>> NativeTarget<E> for Option<N> {
    const RANK: usize = N::RANK;

    fn check_shape(dimensions: &[ArrayDimension], depth: usize) -> Result<()> {
        N::check_shape(dimensions, depth)
    }

    fn assign_null(&mut self) -> Result<()> {
        *self = None;
        Ok(())
    }

    fn assign_empty(&mut self) -> Result<()> {
        let mut inner = N::vacant();
        inner.assign_empty()?;
        *self = Some(inner);
        Ok(())
    }

    fn vacant() -> Self {
        None
    }

    fn fill_from(
        &mut self,
        dimensions: &[ArrayDimension],
        cursor: &mut ElementCursor<'_, E>,
    ) -> Result<()> {
        if N::RANK == 0 && cursor.peek().is_some_and(|el| el.status() == Status::Null) {
            cursor.advance()?;
            *self = None;
            return Ok(());
        }
        let mut inner = self.take().unwrap_or_else(N::vacant);
        inner.fill_from(dimensions, cursor)?;
        *self = Some(inner);
        Ok(())
    }
}

macro_rules! native_slot {
    ($($native:ty = $vacant:expr),+ $(,)?) => {
        $(
            impl<E: AssignTo<$native>> NativeTarget<E> for $native {
                const RANK: usize = 0;

                fn check_shape(_dimensions: &[ArrayDimension], _depth: usize) -> Result<()> {
                    Ok(())
                }

                fn assign_empty(&mut self) -> Result<()> {
                    Err(Error::InvalidShape(
                        "scalar destination cannot hold an array".to_string(),
                    ))
                }

                fn vacant() -> Self {
                    $vacant
                }

                fn fill_from(
                    &mut self,
                    _dimensions: &[ArrayDimension],
                    cursor: &mut ElementCursor<'_, E>,
                ) -> Result<()> {
                    cursor.advance()?.assign_to(self)
                }
            }
        )+
    };
}

const UNSPECIFIED: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

native_slot!(
    bool = false,
    i8 = 0,
    i16 = 0,
    i32 = 0,
    i64 = 0,
    u8 = 0,
    u16 = 0,
    u32 = 0,
    u64 = 0,
    f32 = 0.0,
    f64 = 0.0,
    String = String::new(),
    IpAddr = UNSPECIFIED,
    (IpAddr, u8) = (UNSPECIFIED, 0),
    NaiveDateTime = DateTime::<Utc>::UNIX_EPOCH.naive_utc(),
    DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH,
    uuid::Uuid = uuid::Uuid::nil(),
);
