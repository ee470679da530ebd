//! # MAC Address Model
//!
//! 48-bit hardware addresses. Parsing is lenient like the IP types: malformed text
//! produces [`MacAddress::INVALID`] instead of an error.

use std::fmt;
use std::sync::OnceLock;

use mac_oui::Oui;
use pnet::util::MacAddr;

use crate::warn;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// Retrieves or initializes the **Organizationally unique identifier** database.
///
/// Used for linking a vendor to a MAC address (LAN)
fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("Failed to load OUI database: {e}");
                None
            }
        })
        .as_ref()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(Option<[u8; 6]>);

impl MacAddress {
    pub const INVALID: Self = Self(None);
    /// All-zero address, returned by the resolver when nobody answered.
    pub const ZERO: Self = Self(Some([0; 6]));
    pub const BROADCAST: Self = Self(Some([0xff; 6]));

    pub const fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self(Some([a, b, c, d, e, f]))
    }

    /// Parses six two-digit hex groups separated by `:` or `-`.
    ///
    /// Both separators are accepted but must not be mixed.
    pub fn parse(s: &str) -> Self {
        Self(parse_groups(s))
    }

    /// Slices that are not exactly six bytes long give an invalid address.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(<[u8; 6]>::try_from(bytes).ok())
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// An invalid address reads as all zeros.
    pub fn octets(&self) -> [u8; 6] {
        self.0.unwrap_or_default()
    }

    /// Writes the address into caller-owned storage.
    pub fn copy_to(&self, buffer: &mut [u8; 6]) {
        *buffer = self.octets();
    }

    /// Returns the address in a freshly allocated buffer owned by the caller.
    pub fn to_boxed(&self) -> Box<[u8; 6]> {
        Box::new(self.octets())
    }

    /// Identify the vendor of a MAC address.
    pub fn vendor(&self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        match get_oui_db()?.lookup_by_mac(&self.to_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            _ => None,
        }
    }
}

fn parse_groups(s: &str) -> Option<[u8; 6]> {
    // "aa:bb:cc:dd:ee:ff"
    if s.len() != 17 || !s.is_ascii() {
        return None;
    }
    let separator = match s.as_bytes()[2] {
        b':' => ':',
        b'-' => '-',
        _ => return None,
    };

    let mut octets = [0u8; 6];
    let mut groups = s.split(separator);
    for octet in octets.iter_mut() {
        let group = groups.next()?;
        if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        *octet = u8::from_str_radix(group, 16).ok()?;
    }
    if groups.next().is_some() {
        return None;
    }
    Some(octets)
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(Some(octets))
    }
}

impl From<MacAddr> for MacAddress {
    fn from(mac: MacAddr) -> Self {
        let MacAddr(a, b, c, d, e, f) = mac;
        Self(Some([a, b, c, d, e, f]))
    }
}

impl From<MacAddress> for MacAddr {
    fn from(mac: MacAddress) -> Self {
        let [a, b, c, d, e, f] = mac.octets();
        MacAddr::new(a, b, c, d, e, f)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some([a, b, c, d, e, g]) = self.0 else {
            return f.write_str("invalid");
        };
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
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
