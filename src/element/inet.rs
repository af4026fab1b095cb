use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::BytesMut;

use super::{encodes_payload, ensure_assignable, AssignTo, Element, FromNative, IsNull};
use crate::types::Status;
use crate::{Error, Result};

// PostgreSQL's own address family numbering, not the platform's.
const PGSQL_AF_INET: u8 = 2;
const PGSQL_AF_INET6: u8 = 3;

fn max_prefix(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask_host_bits(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let mask = u32::MAX.checked_shl(32 - prefix as u32).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
        }
        IpAddr::V6(v6) => {
            let mask = u128::MAX.checked_shl(128 - prefix as u32).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
        }
    }
}

fn parse_network(raw: &str) -> Option<(IpAddr, u8)> {
    let raw = raw.trim();
    let (addr, prefix) = match raw.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (raw, None),
    };
    let addr: IpAddr = addr.parse().ok()?;
    let prefix = match prefix {
        Some(prefix) => prefix.parse::<u8>().ok()?,
        None => max_prefix(&addr),
    };
    if prefix > max_prefix(&addr) {
        return None;
    }
    Some((addr, prefix))
}

fn decode_network(raw: &[u8], type_name: &'static str) -> Result<(IpAddr, u8)> {
    if raw.len() < 4 {
        return Err(Error::invalid_element(
            type_name,
            format!("expected at least 4 bytes, got {}", raw.len()),
        ));
    }
    let (family, bits, length) = (raw[0], raw[1], raw[3] as usize);
    let body = &raw[4..];
    if body.len() != length {
        return Err(Error::invalid_element(
            type_name,
            format!("address length {length} but {} bytes follow", body.len()),
        ));
    }
    let addr = match (family, length) {
        (PGSQL_AF_INET, 4) => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(body);
            IpAddr::from(octets)
        }
        (PGSQL_AF_INET6, 16) => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(body);
            IpAddr::from(octets)
        }
        _ => {
            return Err(Error::invalid_element(
                type_name,
                format!("unknown address family {family} with length {length}"),
            ))
        }
    };
    if bits > max_prefix(&addr) {
        return Err(Error::invalid_element(
            type_name,
            format!("prefix length {bits} too large"),
        ));
    }
    Ok((addr, bits))
}

fn encode_network(addr: &IpAddr, prefix: u8, is_cidr: bool, out: &mut BytesMut) {
    match addr {
        IpAddr::V4(v4) => {
            out.extend_from_slice(&[PGSQL_AF_INET, prefix, is_cidr as u8, 4]);
            out.extend_from_slice(&v4.octets());
        }
        IpAddr::V6(v6) => {
            out.extend_from_slice(&[PGSQL_AF_INET6, prefix, is_cidr as u8, 16]);
            out.extend_from_slice(&v6.octets());
        }
    }
}

macro_rules! network_element {
    ($name:ident, $type_name:literal, $oid:expr, $array_oid:expr, $is_cidr:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub addr: IpAddr,
            pub prefix: u8,
            pub status: Status,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    prefix: 0,
                    status: Status::Undefined,
                }
            }
        }

        impl $name {
            pub fn host(addr: IpAddr) -> Self {
                let prefix = max_prefix(&addr);
                Self::with_prefix(addr, prefix)
            }

            /// Builds a value from an address and prefix length, rejecting
            /// prefixes wider than the address.
            pub fn try_with_prefix(addr: IpAddr, prefix: u8) -> Result<Self> {
                if prefix > max_prefix(&addr) {
                    return Err(Error::conversion(
                        Self::TYPE_NAME,
                        format!("{addr}/{prefix} (prefix too large)"),
                    ));
                }
                Ok(Self::with_prefix(addr, prefix))
            }

            /// Callers must have checked `prefix` against the address width.
            pub(crate) fn with_prefix(addr: IpAddr, prefix: u8) -> Self {
                assert!(prefix <= max_prefix(&addr), "prefix {prefix} too large");
                let addr = if $is_cidr {
                    mask_host_bits(addr, prefix)
                } else {
                    addr
                };
                Self {
                    addr,
                    prefix,
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
                encode_network(&self.addr, self.prefix, $is_cidr, out);
                Ok(IsNull::No)
            }

            fn decode_binary(raw: Option<&[u8]>) -> Result<Self> {
                let Some(raw) = raw else {
                    return Ok(Self::null());
                };
                let (addr, prefix) = decode_network(raw, Self::TYPE_NAME)?;
                Ok(Self::with_prefix(addr, prefix))
            }

            fn encode_text(&self, out: &mut String) -> Result<IsNull> {
                use std::fmt::Write;

                if !encodes_payload(self.status, Self::TYPE_NAME)? {
                    return Ok(IsNull::Yes);
                }
                let _ = write!(out, "{}", self.addr);
                if $is_cidr || self.prefix != max_prefix(&self.addr) {
                    let mut buffer = itoa::Buffer::new();
                    out.push('/');
                    out.push_str(buffer.format(self.prefix));
                }
                Ok(IsNull::No)
            }

            fn decode_text(raw: Option<&str>) -> Result<Self> {
                let Some(raw) = raw else {
                    return Ok(Self::null());
                };
                let (addr, prefix) = parse_network(raw)
                    .ok_or_else(|| Error::invalid_element(Self::TYPE_NAME, format!("{raw:?}")))?;
                Ok(Self::with_prefix(addr, prefix))
            }
        }

        impl FromNative<IpAddr> for $name {
            fn from_native(value: &IpAddr) -> Result<Self> {
                Ok(Self::host(*value))
            }
        }

        impl FromNative<(IpAddr, u8)> for $name {
            fn from_native(value: &(IpAddr, u8)) -> Result<Self> {
                let (addr, prefix) = *value;
                Self::try_with_prefix(addr, prefix)
            }
        }

        impl FromNative<str> for $name {
            fn from_native(value: &str) -> Result<Self> {
                let (addr, prefix) = parse_network(value)
                    .ok_or_else(|| Error::conversion(Self::TYPE_NAME, format!("string {value:?}")))?;
                Ok(Self::with_prefix(addr, prefix))
            }
        }

        impl AssignTo<IpAddr> for $name {
            fn assign_to(&self, dst: &mut IpAddr) -> Result<()> {
                ensure_assignable(self.status, Self::TYPE_NAME)?;
                if self.prefix != max_prefix(&self.addr) {
                    return Err(Error::assignment(
                        Self::TYPE_NAME,
                        format!(
                            "{}/{} has a network prefix an address cannot carry",
                            self.addr, self.prefix
                        ),
                    ));
                }
                *dst = self.addr;
                Ok(())
            }
        }

        impl AssignTo<(IpAddr, u8)> for $name {
            fn assign_to(&self, dst: &mut (IpAddr, u8)) -> Result<()> {
                ensure_assignable(self.status, Self::TYPE_NAME)?;
                *dst = (self.addr, self.prefix);
                Ok(())
            }
        }

        impl AssignTo<String> for $name {
            fn assign_to(&self, dst: &mut String) -> Result<()> {
                ensure_assignable(self.status, Self::TYPE_NAME)?;
                dst.clear();
                self.encode_text(dst)?;
                Ok(())
            }
        }
    };
}

network_element!(Inet, "inet", 869, 1041, false);
network_element!(Cidr, "cidr", 650, 651, true);
