//! The capability contract every array element type satisfies, plus the
//! reference element types shipped with the crate.

mod bool;
mod float;
mod inet;
mod int;
mod text;
mod timestamp;
mod uuid;

use std::fmt;

use bytes::BytesMut;

use crate::types::{Delimiter, Status};
use crate::{Error, Result};

pub use self::bool::Bool;
pub use self::float::{Float4, Float8};
pub use self::inet::{Cidr, Inet};
pub use self::int::{Int2, Int4, Int8};
pub use self::text::Text;
pub use self::timestamp::{InfinityModifier, Timestamp};
pub use self::uuid::Uuid;

/// Whether an encoder wrote a value or signalled SQL NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsNull {
    Yes,
    No,
}

/// Wire codec for a single element of an array.
///
/// Encoders append to the output buffer and return [`IsNull::Yes`] without
/// writing anything when the value is NULL. Decoders receive `None` for
/// SQL NULL.
pub trait Element: Clone + fmt::Debug + Send + Sync + Sized {
    const TYPE_NAME: &'static str;
    const TYPE_OID: u32;
    const ARRAY_TYPE_OID: u32;

    fn null() -> Self;

    fn status(&self) -> Status;

    fn encode_binary(&self, out: &mut BytesMut) -> Result<IsNull>;

    fn decode_binary(raw: Option<&[u8]>) -> Result<Self>;

    fn encode_text(&self, out: &mut String) -> Result<IsNull>;

    fn decode_text(raw: Option<&str>) -> Result<Self>;

    /// Separator used between this type's elements in an array literal.
    fn delimiter() -> Delimiter {
        Delimiter::Comma
    }
}

/// Build an element from a single native value.
pub trait FromNative<N: ?Sized>: Sized {
    fn from_native(value: &N) -> Result<Self>;
}

/// Write an element into a native destination slot.
pub trait AssignTo<N> {
    fn assign_to(&self, dst: &mut N) -> Result<()>;
}

/// Resolve a status for an encoder: `Ok(true)` when a payload must be
/// written, `Ok(false)` for NULL.
#[inline]
pub(crate) fn encodes_payload(status: Status, type_name: &'static str) -> Result<bool> {
    match status {
        Status::Present => Ok(true),
        Status::Null => Ok(false),
        Status::Undefined => Err(Error::undefined(type_name)),
    }
}

/// Shared guard for `AssignTo` impls targeting non-nullable slots.
#[inline]
pub(crate) fn ensure_assignable(status: Status, type_name: &'static str) -> Result<()> {
    match status {
        Status::Present => Ok(()),
        Status::Null => Err(Error::assignment(
            type_name,
            "NULL into a destination that cannot hold NULL",
        )),
        Status::Undefined => Err(Error::undefined(type_name)),
    }
}

pub(crate) fn expect_len(raw: &[u8], len: usize, type_name: &'static str) -> Result<()> {
    if raw.len() != len {
        return Err(Error::invalid_element(
            type_name,
            format!("expected {len} bytes, got {}", raw.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[rstest::rstest]
    fn test_encodes_payload() {
        assert!(encodes_payload(Status::Present, "int4").unwrap());
        assert!(!encodes_payload(Status::Null, "int4").unwrap());
        let err = encodes_payload(Status::Undefined, "int4").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[rstest::rstest]
    fn test_ensure_assignable() {
        assert!(ensure_assignable(Status::Present, "text").is_ok());
        assert_eq!(
            ensure_assignable(Status::Null, "text").unwrap_err().kind(),
            ErrorKind::Assignment
        );
        assert_eq!(
            ensure_assignable(Status::Undefined, "text")
                .unwrap_err()
                .kind(),
            ErrorKind::State
        );
    }

    #[rstest::rstest]
    fn test_expect_len() {
        assert!(expect_len(&[0; 4], 4, "int4").is_ok());
        assert_eq!(
            expect_len(&[0; 3], 4, "int4").unwrap_err().kind(),
            ErrorKind::Decode
        );
    }
}
