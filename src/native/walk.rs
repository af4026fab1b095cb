use crate::element::{Element, FromNative};
use crate::types::ShapeProbe;
use crate::{Error, Result};

/// A native value that can be flattened into array elements of type `E`.
///
/// Implemented for scalar leaves and for `Vec`, slices, fixed-size arrays,
/// references and `Option` wrapping any of them, to any depth. `RANK` is the
/// number of container levels above the leaves.
pub trait NativeSource<E> {
    const RANK: usize;

    /// Whether this value is the native null (only meaningful at the top).
    fn is_null(&self) -> bool {
        false
    }

    /// Record the length of every container level below `depth`.
    fn measure(&self, depth: usize, probe: &mut ShapeProbe) -> Result<()>;

    /// Append the leaves in row-major order.
    fn flatten(&self, out: &mut Vec<E>) -> Result<()>;
}

fn measure_items<E, N: NativeSource<E>>(
    items: &[N],
    depth: usize,
    probe: &mut ShapeProbe,
) -> Result<()> {
    probe.observe(depth, items.len())?;
    if N::RANK == 0 {
        return Ok(());
    }
    for item in items {
        item.measure(depth + 1, probe)?;
    }
    Ok(())
}

fn flatten_items<E, N: NativeSource<E>>(items: &[N], out: &mut Vec<E>) -> Result<()> {
    for item in items {
        item.flatten(out)?;
    }
    Ok(())
}

impl<E, N: NativeSource<E>> NativeSource<E> for [N] {
    const RANK: usize = N::RANK + 1;

    fn measure(&self, depth: usize, probe: &mut ShapeProbe) -> Result<()> {
        measure_items(self, depth, probe)
    }

    fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
        flatten_items(self, out)
    }
}

impl<E, N: NativeSource<E>> NativeSource<E> for Vec<N> {
    const RANK: usize = N::RANK + 1;

    fn measure(&self, depth: usize, probe: &mut ShapeProbe) -> Result<()> {
        measure_items(self, depth, probe)
    }

    fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
        flatten_items(self, out)
    }
}

impl<E, N: NativeSource<E>, const K: usize> NativeSource<E> for [N; K] {
    const RANK: usize = N::RANK + 1;

    fn measure(&self, depth: usize, probe: &mut ShapeProbe) -> Result<()> {
        measure_items(self, depth, probe)
    }

    fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
        flatten_items(self, out)
    }
}

impl<E, T: NativeSource<E> + ?Sized> NativeSource<E> for &T {
    const RANK: usize = T::RANK;

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn measure(&self, depth: usize, probe: &mut ShapeProbe) -> Result<()> {
        (**self).measure(depth, probe)
    }

    fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
        (**self).flatten(out)
    }
}

/// `None` is a null element at the leaves and a null array at the top; it
/// cannot stand in for a sub-array.
impl<E: Element, N: NativeSource<E>> NativeSource<E> for Option<N> {
    const RANK: usize = N::RANK;

    fn is_null(&self) -> bool {
        match self {
            Some(inner) => inner.is_null(),
            None => true,
        }
    }

    fn measure(&self, depth: usize, probe: &mut ShapeProbe) -> Result<()> {
        match self {
            Some(inner) => inner.measure(depth, probe),
            None if N::RANK == 0 => Ok(()),
            None => Err(Error::InvalidShape(format!(
                "NULL sub-array at depth {depth}"
            ))),
        }
    }

    fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
        match self {
            Some(inner) => inner.flatten(out),
            None if N::RANK == 0 => {
                out.push(E::null());
                Ok(())
            }
            None => Err(Error::InvalidShape("NULL sub-array".to_string())),
        }
    }
}

macro_rules! native_leaf {
    ($($native:ty),+ $(,)?) => {
        $(
            impl<E: FromNative<$native>> NativeSource<E> for $native {
                const RANK: usize = 0;

                fn measure(&self, _depth: usize, _probe: &mut ShapeProbe) -> Result<()> {
                    Ok(())
                }

                fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
                    out.push(E::from_native(self)?);
                    Ok(())
                }
            }
        )+
    };
}

native_leaf!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    str,
    std::net::IpAddr,
    (std::net::IpAddr, u8),
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    uuid::Uuid,
);

impl<E: FromNative<str>> NativeSource<E> for String {
    const RANK: usize = 0;

    fn measure(&self, _depth: usize, _probe: &mut ShapeProbe) -> Result<()> {
        Ok(())
    }

    fn flatten(&self, out: &mut Vec<E>) -> Result<()> {
        out.push(E::from_native(self.as_str())?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Int4, Text};
    use crate::ErrorKind;

    fn walk<E, N: NativeSource<E> + ?Sized>(native: &N) -> Result<(Vec<Option<usize>>, Vec<E>)> {
        let mut probe = ShapeProbe::new(N::RANK);
        native.measure(0, &mut probe)?;
        let lengths = (0..probe.rank()).map(|d| probe.length_at(d)).collect();
        let mut out = Vec::new();
        native.flatten(&mut out)?;
        Ok((lengths, out))
    }

    #[rstest::rstest]
    fn test_rank_is_static() {
        assert_eq!(<Vec<i32> as NativeSource<Int4>>::RANK, 1);
        assert_eq!(<[[i32; 2]; 3] as NativeSource<Int4>>::RANK, 2);
        assert_eq!(<Vec<Vec<Option<String>>> as NativeSource<Text>>::RANK, 2);
        assert_eq!(<&[&str] as NativeSource<Text>>::RANK, 1);
    }

    #[rstest::rstest]
    fn test_walk_mixed_containers() {
        let native: Vec<[i32; 2]> = vec![[1, 2], [3, 4], [5, 6]];
        let (lengths, elements) = walk::<Int4, _>(&native).unwrap();
        assert_eq!(lengths, vec![Some(3), Some(2)]);
        let values: Vec<i32> = elements.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }

    #[rstest::rstest]
    fn test_none_leaf_becomes_null_element() {
        let native = vec![Some("a"), None];
        let (_, elements) = walk::<Text, _>(&native).unwrap();
        assert_eq!(elements, vec![Text::new("a"), Text::null()]);
    }

    #[rstest::rstest]
    fn test_none_sub_array_rejected() {
        let native: Vec<Option<Vec<i32>>> = vec![Some(vec![1]), None];
        let err = walk::<Int4, _>(&native).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[rstest::rstest]
    fn test_ragged_rejected_with_depth() {
        let native = vec![vec![1, 2], vec![3]];
        let err = walk::<Int4, _>(&native).unwrap_err();
        assert_eq!(err, Error::shape(1, 2, 1));
    }

    #[rstest::rstest]
    fn test_top_level_null() {
        let none: Option<Vec<String>> = None;
        assert!(<Option<Vec<String>> as NativeSource<Text>>::is_null(&none));
        let some: Option<Vec<String>> = Some(vec![]);
        assert!(!<Option<Vec<String>> as NativeSource<Text>>::is_null(&some));
    }
}
