//! # IPv4 Network Model
//!
//! A CIDR block: an address normalised to its network prefix plus a prefix length.
//!
//! Construction is strict and reports exactly what was wrong with the input
//! ([`NetworkError`]). Matching an address against a network is lenient, see
//! [`Ipv4Address::match_network`].

use std::fmt;
use std::str::FromStr;

use crate::network::error::NetworkError;
use crate::network::ip::{IpAddress, Ipv4Address};

pub const MAX_PREFIX_LEN: u8 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Network {
    network_prefix: u32,
    prefix_len: u8,
}

impl Ipv4Network {
    /// Builds the network containing `address` with the given prefix length.
    ///
    /// Host bits of `address` are dropped.
    pub fn new(address: Ipv4Address, prefix_len: u8) -> Result<Self, NetworkError> {
        if !address.is_valid() {
            return Err(NetworkError::InvalidAddress);
        }
        if prefix_len > MAX_PREFIX_LEN {
            return Err(NetworkError::PrefixOutOfRange(prefix_len.to_string()));
        }
        Ok(Self {
            network_prefix: address.to_u32() & mask_for(prefix_len),
            prefix_len,
        })
    }

    /// Builds the network from a dotted netmask such as `255.255.0.0`.
    ///
    /// The netmask must be a left-aligned run of one-bits.
    pub fn with_netmask(address: Ipv4Address, netmask: &str) -> Result<Self, NetworkError> {
        if !address.is_valid() {
            return Err(NetworkError::InvalidAddress);
        }
        let prefix_len = prefix_len_from_netmask(netmask)
            .ok_or_else(|| NetworkError::InvalidNetmask(netmask.to_string()))?;
        Self::new(address, prefix_len)
    }

    /// A single-address (`/32`) network.
    pub fn host(address: Ipv4Address) -> Result<Self, NetworkError> {
        Self::new(address, MAX_PREFIX_LEN)
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn netmask(&self) -> Ipv4Address {
        Ipv4Address::from(mask_for(self.prefix_len))
    }

    /// The network address, all host bits zero.
    pub fn network_prefix(&self) -> Ipv4Address {
        Ipv4Address::from(self.network_prefix)
    }

    /// First usable host address.
    ///
    /// `/31` and `/32` have no network/broadcast split, so this is the prefix itself.
    pub fn lowest_address(&self) -> Ipv4Address {
        if self.prefix_len >= 31 {
            return self.network_prefix();
        }
        Ipv4Address::from(self.network_prefix + 1)
    }

    /// Last usable host address, one below broadcast unless the prefix is `/31` or `/32`.
    pub fn highest_address(&self) -> Ipv4Address {
        let last = self.last_u32();
        if self.prefix_len >= 31 {
            return Ipv4Address::from(last);
        }
        Ipv4Address::from(last - 1)
    }

    pub fn total_address_count(&self) -> u64 {
        1u64 << (MAX_PREFIX_LEN - self.prefix_len)
    }

    pub fn includes(&self, address: &Ipv4Address) -> bool {
        address.is_valid() && address.to_u32() & self.mask() == self.network_prefix
    }

    /// Only IPv4 addresses can fall inside an IPv4 network.
    pub fn includes_ip(&self, address: &IpAddress) -> bool {
        match address {
            IpAddress::V4(v4) => self.includes(&Ipv4Address::from(*v4)),
            IpAddress::V6(_) | IpAddress::Invalid => false,
        }
    }

    /// True when `other` is this network or one of its subnets.
    ///
    /// A shorter prefix is never included, even when the ranges overlap.
    pub fn includes_network(&self, other: &Ipv4Network) -> bool {
        other.prefix_len >= self.prefix_len && other.network_prefix & self.mask() == self.network_prefix
    }

    fn mask(&self) -> u32 {
        mask_for(self.prefix_len)
    }

    fn last_u32(&self) -> u32 {
        self.network_prefix | !self.mask()
    }
}

impl FromStr for Ipv4Network {
    type Err = NetworkError;

    /// Parses `"<address>/<prefixLength>"` or `"<address>/<netmask>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(address_str), Some(mask_str)) = (parts.next(), parts.next()) else {
            return Err(NetworkError::Malformed(s.to_string()));
        };
        if parts.next().is_some() {
            return Err(NetworkError::MultipleSeparators(s.to_string()));
        }

        let address = Ipv4Address::parse(address_str);
        if !address.is_valid() {
            return Err(NetworkError::InvalidNetworkPrefix(address_str.to_string()));
        }

        if !mask_str.is_empty() && mask_str.bytes().all(|b| b.is_ascii_digit()) {
            let prefix_len = mask_str
                .parse::<u8>()
                .ok()
                .filter(|len| *len <= MAX_PREFIX_LEN)
                .ok_or_else(|| NetworkError::PrefixOutOfRange(mask_str.to_string()))?;
            return Self::new(address, prefix_len);
        }

        Self::with_netmask(address, mask_str)
    }
}

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_prefix(), self.prefix_len)
    }
}

fn mask_for(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        len => u32::MAX << (MAX_PREFIX_LEN - len),
    }
}

fn prefix_len_from_netmask(netmask: &str) -> Option<u8> {
    let mask = Ipv4Address::parse(netmask);
    if !mask.is_valid() {
        return None;
    }
    let bits = mask.to_u32();
    let ones = bits.leading_ones();
    // everything after the leading run must be zero
    if bits.checked_shl(ones).unwrap_or(0) != 0 {
        return None;
    }
    u8::try_from(ones).ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
