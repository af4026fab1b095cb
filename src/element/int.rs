use bytes::BytesMut;

use super::{encodes_payload, ensure_assignable, expect_len, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

macro_rules! int_element {
    ($name:ident, $prim:ty, $type_name:literal, $oid:expr, $array_oid:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name {
            pub value: $prim,
            pub status: Status,
        }

        impl $name {
            pub fn new(value: $prim) -> Self {
                Self {
                    value,
                    status: Status::Present,
                }
            }
        }

        impl Element for $name {
            const TYPE_NAME: &'static str = $type_name;
            const TYPE_OID: u32 = $oid;
            const ARRAY_TYPE_OID: u32 = $array_oid;

            fn null() -> Self {
                Self {
                    value: 0,
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
                out.extend_from_slice(&self.value.to_be_bytes());
                Ok(IsNull::No)
            }

            fn decode_binary(raw: Option<&[u8]>) -> Result<Self> {
                let Some(raw) = raw else {
                    return Ok(Self::null());
                };
                const WIDTH: usize = std::mem::size_of::<$prim>();
                expect_len(raw, WIDTH, Self::TYPE_NAME)?;
                let mut bytes = [0u8; WIDTH];
                bytes.copy_from_slice(raw);
                Ok(Self::new(<$prim>::from_be_bytes(bytes)))
            }

            fn encode_text(&self, out: &mut String) -> Result<IsNull> {
                if !encodes_payload(self.status, Self::TYPE_NAME)? {
                    return Ok(IsNull::Yes);
                }
                let mut buffer = itoa::Buffer::new();
                out.push_str(buffer.format(self.value));
                Ok(IsNull::No)
            }

            fn decode_text(raw: Option<&str>) -> Result<Self> {
                let Some(raw) = raw else {
                    return Ok(Self::null());
                };
                raw.trim()
                    .parse::<$prim>()
                    .map(Self::new)
                    .map_err(|err| Error::invalid_element(Self::TYPE_NAME, format!("{raw:?}: {err}")))
            }
        }

        impl FromNative<str> for $name {
            fn from_native(value: &str) -> Result<Self> {
                value
                    .trim()
                    .parse::<$prim>()
                    .map(Self::new)
                    .map_err(|_| Error::conversion(Self::TYPE_NAME, format!("string {value:?}")))
            }
        }

        int_element!(@native $name, $prim; i8, i16, i32, i64, u8, u16, u32, u64);
    };

    (@native $name:ident, $prim:ty; $($src:ty),+) => {
        $(
            impl FromNative<$src> for $name {
                fn from_native(value: &$src) -> Result<Self> {
                    <$prim>::try_from(*value).map(Self::new).map_err(|_| {
                        Error::conversion(
                            Self::TYPE_NAME,
                            format!("{} {value} (out of range)", stringify!($src)),
                        )
                    })
                }
            }

            impl AssignTo<$src> for $name {
                fn assign_to(&self, dst: &mut $src) -> Result<()> {
                    ensure_assignable(self.status, Self::TYPE_NAME)?;
                    *dst = <$src>::try_from(self.value).map_err(|_| {
                        Error::assignment(
                            Self::TYPE_NAME,
                            format!("{} does not fit in {}", self.value, stringify!($src)),
                        )
                    })?;
                    Ok(())
                }
            }
        )+
    };
}

int_element!(Int2, i16, "int2", 21, 1005);
int_element!(Int4, i32, "int4", 23, 1007);
int_element!(Int8, i64, "int8", 20, 1016);
