use bytes::BytesMut;

use super::{encodes_payload, ensure_assignable, expect_len, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bool {
    pub value: bool,
    pub status: Status,
}

impl Bool {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            status: Status::Present,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl Element for Bool {
    const TYPE_NAME: &'static str = "bool";
    const TYPE_OID: u32 = 16;
    const ARRAY_TYPE_OID: u32 = 1000;

    fn null() -> Self {
        Self {
            value: false,
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
        out.extend_from_slice(&[self.value as u8]);
        Ok(IsNull::No)
    }

    fn decode_binary(raw: Option<&[u8]>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::null());
        };
        expect_len(raw, 1, Self::TYPE_NAME)?;
        Ok(Self::new(raw[0] != 0))
    }

    fn encode_text(&self, out: &mut String) -> Result<IsNull> {
        if !encodes_payload(self.status, Self::TYPE_NAME)? {
            return Ok(IsNull::Yes);
        }
        out.push(if self.value { 't' } else { 'f' });
        Ok(IsNull::No)
    }

    fn decode_text(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::null());
        };
        parse_bool(raw)
            .map(Self::new)
            .ok_or_else(|| Error::invalid_element(Self::TYPE_NAME, format!("{raw:?}")))
    }
}

impl FromNative<bool> for Bool {
    fn from_native(value: &bool) -> Result<Self> {
        Ok(Self::new(*value))
    }
}

impl FromNative<str> for Bool {
    fn from_native(value: &str) -> Result<Self> {
        parse_bool(value)
            .map(Self::new)
            .ok_or_else(|| Error::conversion(Self::TYPE_NAME, format!("string {value:?}")))
    }
}

impl AssignTo<bool> for Bool {
    fn assign_to(&self, dst: &mut bool) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        *dst = self.value;
        Ok(())
    }
}
