use bytes::BytesMut;

use super::{encodes_payload, ensure_assignable, expect_len, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

type RawUuid = ::uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uuid {
    pub value: RawUuid,
    pub status: Status,
}

impl Uuid {
    pub fn new(value: RawUuid) -> Self {
        Self {
            value,
            status: Status::Present,
        }
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self::new(RawUuid::from_bytes(bytes))
    }
}

impl Element for Uuid {
    const TYPE_NAME: &'static str = "uuid";
    const TYPE_OID: u32 = 2950;
    const ARRAY_TYPE_OID: u32 = 2951;

    fn null() -> Self {
        Self {
            value: RawUuid::nil(),
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
        expect_len(raw, 16, Self::TYPE_NAME)?;
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(raw);
        Ok(Self::from_bytes(bytes))
    }

    fn encode_text(&self, out: &mut String) -> Result<IsNull> {
        if !encodes_payload(self.status, Self::TYPE_NAME)? {
            return Ok(IsNull::Yes);
        }
        let mut buffer = ::uuid::Uuid::encode_buffer();
        out.push_str(self.value.hyphenated().encode_lower(&mut buffer));
        Ok(IsNull::No)
    }

    fn decode_text(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::null());
        };
        RawUuid::parse_str(raw.trim())
            .map(Self::new)
            .map_err(|err| Error::invalid_element(Self::TYPE_NAME, format!("{raw:?}: {err}")))
    }
}

impl FromNative<RawUuid> for Uuid {
    fn from_native(value: &RawUuid) -> Result<Self> {
        Ok(Self::new(*value))
    }
}

impl FromNative<[u8; 16]> for Uuid {
    fn from_native(value: &[u8; 16]) -> Result<Self> {
        Ok(Self::from_bytes(*value))
    }
}

impl FromNative<[u8]> for Uuid {
    fn from_native(value: &[u8]) -> Result<Self> {
        RawUuid::from_slice(value)
            .map(Self::new)
            .map_err(|_| Error::conversion(Self::TYPE_NAME, format!("{} bytes", value.len())))
    }
}

impl FromNative<str> for Uuid {
    fn from_native(value: &str) -> Result<Self> {
        RawUuid::parse_str(value)
            .map(Self::new)
            .map_err(|_| Error::conversion(Self::TYPE_NAME, format!("string {value:?}")))
    }
}

impl AssignTo<RawUuid> for Uuid {
    fn assign_to(&self, dst: &mut RawUuid) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        *dst = self.value;
        Ok(())
    }
}

impl AssignTo<[u8; 16]> for Uuid {
    fn assign_to(&self, dst: &mut [u8; 16]) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        *dst = *self.value.as_bytes();
        Ok(())
    }
}

impl AssignTo<Vec<u8>> for Uuid {
    fn assign_to(&self, dst: &mut Vec<u8>) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        dst.clear();
        dst.extend_from_slice(self.value.as_bytes());
        Ok(())
    }
}

impl AssignTo<String> for Uuid {
    fn assign_to(&self, dst: &mut String) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        dst.clear();
        self.encode_text(dst)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const BYTES: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
    const TEXT: &str = "00010203-0405-0607-0809-0a0b0c0d0e0f";

    #[rstest::rstest]
    fn test_set_from_variants() {
        let expected = Uuid::from_bytes(BYTES);
        assert_eq!(Uuid::from_native(&BYTES).unwrap(), expected);
        assert_eq!(Uuid::from_native(&BYTES[..]).unwrap(), expected);
        assert_eq!(Uuid::from_native(TEXT).unwrap(), expected);
        assert_eq!(
            Uuid::from_native(&BYTES[..15]).unwrap_err().kind(),
            ErrorKind::Conversion
        );
    }

    #[rstest::rstest]
    fn test_assign_to_variants() {
        let src = Uuid::from_bytes(BYTES);

        let mut array = [0u8; 16];
        src.assign_to(&mut array).unwrap();
        assert_eq!(array, BYTES);

        let mut bytes = Vec::new();
        src.assign_to(&mut bytes).unwrap();
        assert_eq!(bytes, BYTES.to_vec());

        let mut text = String::new();
        src.assign_to(&mut text).unwrap();
        assert_eq!(text, TEXT);
    }

    #[rstest::rstest]
    fn test_text_and_binary_forms() {
        let src = Uuid::from_bytes(BYTES);
        let mut text = String::new();
        src.encode_text(&mut text).unwrap();
        assert_eq!(Uuid::decode_text(Some(&text)).unwrap(), src);

        let mut binary = BytesMut::new();
        src.encode_binary(&mut binary).unwrap();
        assert_eq!(&binary[..], &BYTES);
        assert_eq!(Uuid::decode_binary(Some(&binary)).unwrap(), src);
    }
}
