use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};

use super::{encodes_payload, ensure_assignable, expect_len, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

/// Microseconds between the Unix epoch and 2000-01-01 00:00:00, the origin
/// of PostgreSQL's binary timestamps.
const PG_EPOCH_OFFSET_MICROS: i64 = 946_684_800_000_000;

const TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const ISO_TEXT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InfinityModifier {
    #[default]
    Finite,
    Infinity,
    NegativeInfinity,
}

/// `timestamp without time zone`, at microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    pub value: NaiveDateTime,
    pub infinity: InfinityModifier,
    pub status: Status,
}

impl Timestamp {
    pub fn new(value: NaiveDateTime) -> Self {
        Self {
            value,
            infinity: InfinityModifier::Finite,
            status: Status::Present,
        }
    }

    pub fn infinity(modifier: InfinityModifier) -> Self {
        Self {
            value: NaiveDateTime::default(),
            infinity: modifier,
            status: Status::Present,
        }
    }

    fn finite_value(&self) -> Result<NaiveDateTime> {
        ensure_assignable(self.status, Self::TYPE_NAME)?;
        match self.infinity {
            InfinityModifier::Finite => Ok(self.value),
            _ => Err(Error::assignment(
                Self::TYPE_NAME,
                "infinite timestamp into a finite destination",
            )),
        }
    }
}

impl Element for Timestamp {
    const TYPE_NAME: &'static str = "timestamp";
    const TYPE_OID: u32 = 1114;
    const ARRAY_TYPE_OID: u32 = 1115;

    fn null() -> Self {
        Self {
            status: Status::Null,
            ..Self::default()
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn encode_binary(&self, out: &mut BytesMut) -> Result<IsNull> {
        if !encodes_payload(self.status, Self::TYPE_NAME)? {
            return Ok(IsNull::Yes);
        }
        let micros = match self.infinity {
            InfinityModifier::Infinity => i64::MAX,
            InfinityModifier::NegativeInfinity => i64::MIN,
            InfinityModifier::Finite => self
                .value
                .and_utc()
                .timestamp_micros()
                .checked_sub(PG_EPOCH_OFFSET_MICROS)
                .ok_or_else(|| Error::invalid_element(Self::TYPE_NAME, "out of range"))?,
        };
        out.extend_from_slice(&micros.to_be_bytes());
        Ok(IsNull::No)
    }

    fn decode_binary(raw: Option<&[u8]>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::null());
        };
        expect_len(raw, 8, Self::TYPE_NAME)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(raw);
        match i64::from_be_bytes(bytes) {
            i64::MAX => Ok(Self::infinity(InfinityModifier::Infinity)),
            i64::MIN => Ok(Self::infinity(InfinityModifier::NegativeInfinity)),
            micros => micros
                .checked_add(PG_EPOCH_OFFSET_MICROS)
                .and_then(DateTime::from_timestamp_micros)
                .map(|value| Self::new(value.naive_utc()))
                .ok_or_else(|| {
                    Error::invalid_element(Self::TYPE_NAME, format!("{micros} out of range"))
                }),
        }
    }

    fn encode_text(&self, out: &mut String) -> Result<IsNull> {
        use std::fmt::Write;

        if !encodes_payload(self.status, Self::TYPE_NAME)? {
            return Ok(IsNull::Yes);
        }
        match self.infinity {
            InfinityModifier::Infinity => out.push_str("infinity"),
            InfinityModifier::NegativeInfinity => out.push_str("-infinity"),
            InfinityModifier::Finite => {
                let _ = write!(out, "{}", self.value.format(TEXT_FORMAT));
            }
        }
        Ok(IsNull::No)
    }

    fn decode_text(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::null());
        };
        let trimmed = raw.trim();
        match trimmed {
            "infinity" => return Ok(Self::infinity(InfinityModifier::Infinity)),
            "-infinity" => return Ok(Self::infinity(InfinityModifier::NegativeInfinity)),
            _ => {}
        }
        NaiveDateTime::parse_from_str(trimmed, TEXT_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_TEXT_FORMAT))
            .map(Self::new)
            .map_err(|err| Error::invalid_element(Self::TYPE_NAME, format!("{raw:?}: {err}")))
    }
}

impl FromNative<NaiveDateTime> for Timestamp {
    fn from_native(value: &NaiveDateTime) -> Result<Self> {
        Ok(Self::new(*value))
    }
}

impl FromNative<DateTime<Utc>> for Timestamp {
    fn from_native(value: &DateTime<Utc>) -> Result<Self> {
        Ok(Self::new(value.naive_utc()))
    }
}

impl FromNative<InfinityModifier> for Timestamp {
    fn from_native(value: &InfinityModifier) -> Result<Self> {
        match value {
            InfinityModifier::Finite => Err(Error::conversion(
                Self::TYPE_NAME,
                "a finite modifier without a time",
            )),
            modifier => Ok(Self::infinity(*modifier)),
        }
    }
}

impl AssignTo<NaiveDateTime> for Timestamp {
    fn assign_to(&self, dst: &mut NaiveDateTime) -> Result<()> {
        *dst = self.finite_value()?;
        Ok(())
    }
}

impl AssignTo<DateTime<Utc>> for Timestamp {
    fn assign_to(&self, dst: &mut DateTime<Utc>) -> Result<()> {
        *dst = self.finite_value()?.and_utc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ErrorKind;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[rstest::rstest]
    fn test_binary_epoch_is_2000() {
        let mut out = BytesMut::new();
        Timestamp::new(at(2000, 1, 1))
            .encode_binary(&mut out)
            .unwrap();
        assert_eq!(&out[..], &[0; 8]);

        let decoded = Timestamp::decode_binary(Some(&(-1i64).to_be_bytes())).unwrap();
        assert_eq!(
            decoded.value,
            NaiveDate::from_ymd_opt(1999, 12, 31)
                .unwrap()
                .and_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap()
        );
    }

    #[rstest::rstest]
    fn test_infinity_round_trips() {
        for modifier in [InfinityModifier::Infinity, InfinityModifier::NegativeInfinity] {
            let src = Timestamp::infinity(modifier);
            let mut out = BytesMut::new();
            src.encode_binary(&mut out).unwrap();
            assert_eq!(Timestamp::decode_binary(Some(&out)).unwrap(), src);

            let mut text = String::new();
            src.encode_text(&mut text).unwrap();
            assert_eq!(Timestamp::decode_text(Some(&text)).unwrap(), src);
        }
    }

    #[rstest::rstest]
    fn test_text_format() {
        let mut out = String::new();
        Timestamp::new(at(2015, 2, 1)).encode_text(&mut out).unwrap();
        assert_eq!(out, "2015-02-01 00:00:00");

        let parsed = Timestamp::decode_text(Some("2015-02-01 12:30:00.25")).unwrap();
        assert_eq!(
            parsed.value,
            NaiveDate::from_ymd_opt(2015, 2, 1)
                .unwrap()
                .and_hms_milli_opt(12, 30, 0, 250)
                .unwrap()
        );
    }

    #[rstest::rstest]
    fn test_infinite_into_finite_destination_fails() {
        let mut dst = at(2000, 1, 1);
        let err = Timestamp::infinity(InfinityModifier::Infinity)
            .assign_to(&mut dst)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Assignment);
    }
}
