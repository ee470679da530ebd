use thiserror::Error;

/// Address family of an [`IpAddress`](crate::network::ip::IpAddress), used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
    Invalid,
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::V4 => f.write_str("IPv4"),
            Family::V6 => f.write_str("IPv6"),
            Family::Invalid => f.write_str("invalid"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("expected an {expected} address, found {found}")]
    FamilyMismatch { expected: Family, found: Family },
}

/// Construction errors for [`Ipv4Network`](crate::network::cidr::Ipv4Network).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("address is not a valid IPv4 address")]
    InvalidAddress,

    #[error("prefix length must be an integer between 0 and 32, got {0}")]
    PrefixOutOfRange(String),

    #[error("netmask is not valid: '{0}'")]
    InvalidNetmask(String),

    #[error("the input should be in the format of <address>/<netmask> or <address>/<prefixLength>: '{0}'")]
    Malformed(String),

    #[error("the input contains more than one '/' separator: '{0}'")]
    MultipleSeparators(String),

    #[error("the input doesn't contain a valid IPv4 network prefix: '{0}'")]
    InvalidNetworkPrefix(String),
}
