use bytes::BytesMut;

use super::{encodes_payload, ensure_assignable, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

/// Variable-length text. Also carries enum labels, whose type oid is
/// assigned per database and must be supplied when encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Text {
    pub value: String,
    pub status: Status,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: Status::Present,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.status {
            Status::Present => Some(&self.value),
            _ => None,
        }
    }
}

impl Element for Text {
    const TYPE_NAME: &'static str = "text";
    const TYPE_OID: u32 = 25;
    const ARRAY_TYPE_OID: u32 = 1009;

    fn null() -> Self {
        Self {
            value: String::new(),
            status: Status::Null,
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn encode_binary(&self, out: &mut BytesMut) -> Result<IsNull> {
        if !encodes_payload(self.status, Self::TYPE_NAME)? {
            return Ok(IsNull::Yes);
        }
        out.extend_from_slice(self.value.as_bytes());
        Ok(IsNull::No)
    }

    fn decode_binary(raw: Option<&[u8]>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::null());
        };
        let text = std::str::from_utf8(raw)
            .map_err(|err| Error::invalid_element(Self::TYPE_NAME, format!("invalid utf-8: {err}")))?;
        Ok(Self::new(text))
    }

    fn encode_text(&self, out: &mut String) -> Result<IsNull> {
        if !encodes_payload(self.status, Self::TYPE_NAME)? {
            return Ok(IsNull::Yes);
        }
        out.push_str(&self.value);
        Ok(IsNull::No)
    }

    fn decode_text(raw: Option<&str>) -> Result<Self> {
        Ok(raw.map_or_else(Self::null, Self::new))
    }
}

impl FromNative<str> for Text {
    fn from_native(value: &str) -> Result<Self> {
        Ok(Self::new(value))
    }
}

impl FromNative<String> for Text {
    fn from_native(value: &String) -> Result<Self> {
        Ok(Self::new(value.as_str()))
    }
}

impl AssignTo<String> for Text {
    fn assign_to(&self, dst: &mut String) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        dst.clear();
        dst.push_str(&self.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[rstest::rstest]
    fn test_binary_is_raw_utf8() {
        let mut out = BytesMut::new();
        Text::new("red").encode_binary(&mut out).unwrap();
        assert_eq!(&out[..], b"red");
        assert_eq!(Text::decode_binary(Some(b"red")).unwrap(), Text::new("red"));
    }

    #[rstest::rstest]
    fn test_invalid_utf8_rejected() {
        let err = Text::decode_binary(Some(&[0xff, 0xfe])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[rstest::rstest]
    fn test_null_and_empty_are_distinct() {
        assert_eq!(Text::decode_text(None).unwrap().status, Status::Null);
        let empty = Text::decode_text(Some("")).unwrap();
        assert_eq!(empty.status, Status::Present);
        assert_eq!(empty.as_str(), Some(""));
    }

    #[rstest::rstest]
    fn test_assign_replaces_destination() {
        let mut dst = String::from("old");
        Text::new("new").assign_to(&mut dst).unwrap();
        assert_eq!(dst, "new");
    }
}
