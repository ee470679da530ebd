//! # linkaddr common
//!
//! Address and network value types shared by the resolver and the CLI:
//!
//! * **[`network`]**: IPv4/IPv6 addresses, CIDR networks and MAC addresses.
//! * **[`lru`]**: bounded recency ordering used to cap cache growth.
//! * **[`logging`]**: log macros plus the suppress/enable gate.
//! * **[`utils`]**: small helpers such as hex decoding.

pub mod config;
pub mod logging;
pub mod lru;
pub mod network;
pub mod utils;
