use bytes::BytesMut;

use super::{encodes_payload, ensure_assignable, expect_len, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

macro_rules! float_element {
    ($name:ident, $prim:ty, $type_name:literal, $oid:expr, $array_oid:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
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
                    value: 0.0,
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
                let value = self.value;
                if value.is_nan() {
                    out.push_str("NaN");
                } else if value.is_infinite() {
                    out.push_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
                } else {
                    let mut buffer = ryu::Buffer::new();
                    out.push_str(buffer.format_finite(value));
                }
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

        impl FromNative<$prim> for $name {
            fn from_native(value: &$prim) -> Result<Self> {
                Ok(Self::new(*value))
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

        impl AssignTo<$prim> for $name {
            fn assign_to(&self, dst: &mut $prim) -> Result<()> {
                ensure_assignable(self.status, Self::TYPE_NAME)?;
                *dst = self.value;
                Ok(())
            }
        }
    };
}

float_element!(Float4, f32, "float4", 700, 1021);
float_element!(Float8, f64, "float8", 701, 1022);

impl FromNative<f32> for Float8 {
    fn from_native(value: &f32) -> Result<Self> {
        Ok(Self::new(*value as f64))
    }
}

impl FromNative<f64> for Float4 {
    fn from_native(value: &f64) -> Result<Self> {
        let narrowed = *value as f32;
        if value.is_finite() && narrowed as f64 != *value {
            return Err(Error::conversion(
                Self::TYPE_NAME,
                format!("f64 {value} (not representable as f32)"),
            ));
        }
        Ok(Self::new(narrowed))
    }
}

impl AssignTo<f64> for Float4 {
    fn assign_to(&self, dst: &mut f64) -> Result<()> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        *dst = self.value as f64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[rstest::rstest]
    #[case(1.5, "1.5")]
    #[case(f64::INFINITY, "Infinity")]
    #[case(f64::NEG_INFINITY, "-Infinity")]
    fn test_text_format(#[case] value: f64, #[case] expected: &str) {
        let mut out = String::new();
        Float8::new(value).encode_text(&mut out).unwrap();
        assert_eq!(out, expected);
        assert_eq!(Float8::decode_text(Some(expected)).unwrap(), Float8::new(value));
    }

    #[rstest::rstest]
    fn test_nan_round_trips() {
        let mut out = String::new();
        Float8::new(f64::NAN).encode_text(&mut out).unwrap();
        assert_eq!(out, "NaN");
        assert!(Float8::decode_text(Some("NaN")).unwrap().value.is_nan());
    }

    #[rstest::rstest]
    fn test_binary_round_trip() {
        let mut out = BytesMut::new();
        Float4::new(-2.25).encode_binary(&mut out).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(Float4::decode_binary(Some(&out)).unwrap(), Float4::new(-2.25));
    }

    #[rstest::rstest]
    fn test_lossy_narrowing_rejected() {
        assert_eq!(Float4::from_native(&0.5f64).unwrap(), Float4::new(0.5));
        let err = Float4::from_native(&0.1f64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }
}
