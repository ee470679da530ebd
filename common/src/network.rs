pub mod cidr;
pub mod error;
pub mod ip;
pub mod mac;

pub use cidr::Ipv4Network;
pub use error::{AddressError, Family, NetworkError};
pub use ip::{IpAddress, Ipv4Address, Ipv6Address};
pub use mac::MacAddress;
