//! # IP Address Model
//!
//! Value types for IPv4 and IPv6 addresses plus the [`IpAddress`] sum type over both.
//!
//! Parsing never fails. Malformed input produces an *invalid* value that can be
//! passed around, compared and printed without panicking, but never matches a
//! network and never equals a valid address.
//!
//! Ordering across families follows one fixed rule: every IPv4 address sorts before
//! every IPv6 address, whatever their numeric values.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::network::cidr::Ipv4Network;
use crate::network::error::{AddressError, Family};
use crate::warn;

const INVALID_TEXT: &str = "invalid";

/// An IPv4 address, or the invalid sentinel.
///
/// Stored as four octets in network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Address(Option<Ipv4Addr>);

impl Ipv4Address {
    pub const INVALID: Self = Self(None);
    pub const UNSPECIFIED: Self = Self(Some(Ipv4Addr::UNSPECIFIED));
    pub const BROADCAST: Self = Self(Some(Ipv4Addr::BROADCAST));

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(Some(Ipv4Addr::new(a, b, c, d)))
    }

    /// Parses dotted-decimal text. Anything else yields [`Ipv4Address::INVALID`].
    pub fn parse(s: &str) -> Self {
        Self(s.parse::<Ipv4Addr>().ok())
    }

    /// Builds an address from a raw buffer in network byte order.
    ///
    /// Buffers that are not exactly 4 bytes long give an invalid address.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match <[u8; 4]>::try_from(bytes) {
            Ok(octets) => Self(Some(Ipv4Addr::from(octets))),
            Err(_) => Self::INVALID,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Octets in network byte order. An invalid address reads as `0.0.0.0`.
    pub fn octets(&self) -> [u8; 4] {
        self.0.map(|addr| addr.octets()).unwrap_or_default()
    }

    /// Numeric value, most significant octet first (`10.0.0.4` is `0x0A00_0004`).
    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes(self.octets())
    }

    /// The raw 32-bit word as it sits in memory, i.e. in network byte order.
    pub fn to_network_u32(&self) -> u32 {
        u32::from_ne_bytes(self.octets())
    }

    pub fn copy_to(&self, buffer: &mut [u8; 4]) {
        *buffer = self.octets();
    }

    pub fn as_std(&self) -> Option<Ipv4Addr> {
        self.0
    }

    /// Checks the address against a textual network, `"addr/prefix"` or `"addr/netmask"`.
    ///
    /// Unlike [`Ipv4Network`] construction this never fails: a malformed network
    /// logs a warning and simply does not match.
    pub fn match_network(&self, network: &str) -> bool {
        match network.parse::<Ipv4Network>() {
            Ok(network) => self.match_ipv4_network(&network),
            Err(e) => {
                warn!("Cannot match {self} against '{network}': {e}");
                false
            }
        }
    }

    pub fn match_ipv4_network(&self, network: &Ipv4Network) -> bool {
        network.includes(self)
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self(Some(addr))
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Self(Some(Ipv4Addr::from(octets)))
    }
}

/// Interprets the integer as a numeric address (`0x0A00_0004` is `10.0.0.4`).
impl From<u32> for Ipv4Address {
    fn from(value: u32) -> Self {
        Self(Some(Ipv4Addr::from(value)))
    }
}

impl From<&str> for Ipv4Address {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(addr) => write!(f, "{addr}"),
            None => f.write_str(INVALID_TEXT),
        }
    }
}

/// An IPv6 address, or the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv6Address(Option<Ipv6Addr>);

impl Ipv6Address {
    pub const INVALID: Self = Self(None);
    pub const UNSPECIFIED: Self = Self(Some(Ipv6Addr::UNSPECIFIED));

    /// Parses colon-hex text with at most one `::`.
    pub fn parse(s: &str) -> Self {
        Self(s.parse::<Ipv6Addr>().ok())
    }

    /// Buffers that are not exactly 16 bytes long give an invalid address.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match <[u8; 16]>::try_from(bytes) {
            Ok(octets) => Self(Some(Ipv6Addr::from(octets))),
            Err(_) => Self::INVALID,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// An invalid address reads as `::`.
    pub fn octets(&self) -> [u8; 16] {
        self.0.map(|addr| addr.octets()).unwrap_or_default()
    }

    pub fn copy_to(&self, buffer: &mut [u8; 16]) {
        *buffer = self.octets();
    }

    pub fn as_std(&self) -> Option<Ipv6Addr> {
        self.0
    }

    /// Compares the leading `prefix_len` bits with those of `subnet`.
    ///
    /// A zero-length prefix never matches. Lengths above 128 never match either.
    pub fn match_subnet(&self, subnet: &Ipv6Address, prefix_len: u8) -> bool {
        let (Some(addr), Some(net)) = (self.0, subnet.0) else {
            return false;
        };
        if prefix_len == 0 || prefix_len > 128 {
            warn!("Subnet prefix length must be between 1 and 128, got {prefix_len}");
            return false;
        }
        let mask: u128 = u128::MAX << (128 - u32::from(prefix_len));
        u128::from(addr) & mask == u128::from(net) & mask
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(addr: Ipv6Addr) -> Self {
        Self(Some(addr))
    }
}

impl From<[u8; 16]> for Ipv6Address {
    fn from(octets: [u8; 16]) -> Self {
        Self(Some(Ipv6Addr::from(octets)))
    }
}

impl From<&str> for Ipv6Address {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(addr) => write_compressed(f, &addr.segments()),
            None => f.write_str(INVALID_TEXT),
        }
    }
}

/// IPv4-mapped addresses (`::ffff:0:0/96`) keep a dotted-quad tail.
///
/// Everything else is written in lowercase hex, collapsing the longest run of two or more
/// zero groups (leftmost on ties) into `::`.
fn write_compressed(f: &mut fmt::Formatter<'_>, groups: &[u16; 8]) -> fmt::Result {
    if let [0, 0, 0, 0, 0, 0xffff, high, low] = *groups {
        let [a, b] = high.to_be_bytes();
        let [c, d] = low.to_be_bytes();
        return write!(f, "::ffff:{a}.{b}.{c}.{d}");
    }

    let (mut run_start, mut run_len) = (0, 0);
    let mut i = 0;
    while i < groups.len() {
        if groups[i] != 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < groups.len() && groups[i] == 0 {
            i += 1;
        }
        if i - start > run_len {
            run_start = start;
            run_len = i - start;
        }
    }

    if run_len < 2 {
        return write_groups(f, groups);
    }
    write_groups(f, &groups[..run_start])?;
    f.write_str("::")?;
    write_groups(f, &groups[run_start + run_len..])
}

fn write_groups(f: &mut fmt::Formatter<'_>, groups: &[u16]) -> fmt::Result {
    for (idx, group) in groups.iter().enumerate() {
        if idx > 0 {
            f.write_str(":")?;
        }
        write!(f, "{group:x}")?;
    }
    Ok(())
}

/// Either family of address, or neither.
///
/// The family variants hold plain std addresses, so [`IpAddress::Invalid`] is the only
/// way to be invalid. Variant order drives the derived ordering: all of `V4` before
/// all of `V6`, and `Invalid` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpAddress {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
    Invalid,
}

impl IpAddress {
    /// Tries IPv4 first, then IPv6.
    pub fn parse(s: &str) -> Self {
        let v4 = Ipv4Address::parse(s);
        if v4.is_valid() {
            return v4.into();
        }
        Ipv6Address::parse(s).into()
    }

    pub fn family(&self) -> Family {
        match self {
            Self::V4(_) => Family::V4,
            Self::V6(_) => Family::V6,
            Self::Invalid => Family::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6(_))
    }

    pub fn ipv4(&self) -> Result<Ipv4Address, AddressError> {
        match self {
            Self::V4(addr) => Ok((*addr).into()),
            _ => Err(AddressError::FamilyMismatch {
                expected: Family::V4,
                found: self.family(),
            }),
        }
    }

    pub fn ipv6(&self) -> Result<Ipv6Address, AddressError> {
        match self {
            Self::V6(addr) => Ok((*addr).into()),
            _ => Err(AddressError::FamilyMismatch {
                expected: Family::V6,
                found: self.family(),
            }),
        }
    }

    pub fn as_std(&self) -> Option<IpAddr> {
        match self {
            Self::V4(addr) => Some(IpAddr::V4(*addr)),
            Self::V6(addr) => Some(IpAddr::V6(*addr)),
            Self::Invalid => None,
        }
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(addr: Ipv4Address) -> Self {
        addr.as_std().map_or(Self::Invalid, Self::V4)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(addr: Ipv6Address) -> Self {
        addr.as_std().map_or(Self::Invalid, Self::V6)
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Self::V4(v4),
            IpAddr::V6(v6) => Self::V6(v6),
        }
    }
}

impl From<&str> for IpAddress {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(addr) => fmt::Display::fmt(addr, f),
            Self::V6(addr) => write_compressed(f, &addr.segments()),
            Self::Invalid => f.write_str(INVALID_TEXT),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
