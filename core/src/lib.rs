//! ARP resolution for `linkaddr`.
//!
//! [`resolver::AddressResolver`] turns an IPv4 address into a hardware address by
//! exchanging [`arp`] frames through any [`device::RawDevice`].

pub mod arp;
pub mod device;
pub mod resolver;
