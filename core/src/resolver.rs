//! # Address Resolver
//!
//! Maps IPv4 addresses to hardware addresses with one ARP request/reply exchange,
//! remembering answers in a bounded LRU cache.
//!
//! A resolver is an ordinary value: create one, share it by reference (or `Arc`)
//! with whoever needs lookups, drop it when done. The cache sits behind a mutex that
//! is held only for lookups and inserts, never while waiting on the wire.
//!
//! Each call performs at most one exchange. Retrying an unanswered request is up
//! to the caller.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use linkaddr_common::config::{Config, DEFAULT_CACHE_CAPACITY};
use linkaddr_common::lru::LruList;
use linkaddr_common::network::{Ipv4Address, MacAddress};
use linkaddr_common::debug;
use thiserror::Error;

use crate::arp::{self, FrameError};
use crate::device::{DeviceError, RawDevice};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("device {0} is not open")]
    DeviceNotOpen(String),

    #[error("target is not a valid IPv4 address")]
    InvalidTarget,

    #[error("no usable source {0} address")]
    NoSourceAddress(&'static str),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub cache_capacity: NonZeroUsize,
    /// Sender hardware address for requests. Defaults to the device's own.
    pub source_mac: Option<MacAddress>,
    /// Sender protocol address for requests. Defaults to the device's own.
    pub source_addr: Option<Ipv4Address>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            source_mac: None,
            source_addr: None,
        }
    }
}

impl From<&Config> for ResolverConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            cache_capacity: cfg.cache_capacity,
            ..Self::default()
        }
    }
}

/// A fresh answer from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub mac: MacAddress,
    /// Time between sending the request and receiving the reply.
    pub rtt: Duration,
}

struct ArpCache {
    order: LruList<Ipv4Address>,
    entries: HashMap<Ipv4Address, MacAddress>,
}

impl ArpCache {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            order: LruList::new(capacity),
            entries: HashMap::with_capacity(capacity.get()),
        }
    }

    fn get(&mut self, addr: &Ipv4Address) -> Option<MacAddress> {
        let mac = *self.entries.get(addr)?;
        self.order.touch(addr);
        Some(mac)
    }

    fn peek(&self, addr: &Ipv4Address) -> Option<MacAddress> {
        self.entries.get(addr).copied()
    }

    /// Returns the address pushed out to make room, if any.
    fn insert(&mut self, addr: Ipv4Address, mac: MacAddress) -> Option<Ipv4Address> {
        let evicted = self.order.insert(addr);
        if let Some(old) = evicted {
            self.entries.remove(&old);
        }
        self.entries.insert(addr, mac);
        evicted
    }

    fn remove(&mut self, addr: &Ipv4Address) -> bool {
        self.order.remove(addr);
        self.entries.remove(addr).is_some()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}

pub struct AddressResolver {
    config: ResolverConfig,
    cache: Mutex<ArpCache>,
}

impl AddressResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let cache = Mutex::new(ArpCache::new(config.cache_capacity));
        Self { config, cache }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `target` to its hardware address.
    ///
    /// Cached answers are returned without touching the device. Otherwise one ARP
    /// request is broadcast and the device is polled for a matching reply for up to
    /// `timeout`. An unanswered request yields [`MacAddress::ZERO`], which is a normal
    /// outcome for offline or unreachable hosts rather than an error.
    pub fn resolve(
        &self,
        target: Ipv4Address,
        device: &mut dyn RawDevice,
        timeout: Duration,
    ) -> Result<MacAddress, ResolveError> {
        let (src_mac, src_addr) = self.source_addresses(target, device)?;

        if let Some(mac) = self.lock_cache().get(&target) {
            debug!("ARP cache hit for {target}: {mac}");
            return Ok(mac);
        }

        match self.exchange(target, src_mac, src_addr, device, timeout)? {
            Some(reply) => Ok(reply.mac),
            None => Ok(MacAddress::ZERO),
        }
    }

    /// Always goes to the wire, bypassing cached answers.
    ///
    /// A reply still refreshes the cache. `Ok(None)` means nobody answered in time.
    pub fn probe(
        &self,
        target: Ipv4Address,
        device: &mut dyn RawDevice,
        timeout: Duration,
    ) -> Result<Option<Reply>, ResolveError> {
        let (src_mac, src_addr) = self.source_addresses(target, device)?;
        self.exchange(target, src_mac, src_addr, device, timeout)
    }

    /// Looks at the cache without changing recency.
    pub fn cached(&self, target: &Ipv4Address) -> Option<MacAddress> {
        self.lock_cache().peek(target)
    }

    pub fn forget(&self, target: &Ipv4Address) -> bool {
        self.lock_cache().remove(target)
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().entries.len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn exchange(
        &self,
        target: Ipv4Address,
        src_mac: MacAddress,
        src_addr: Ipv4Address,
        device: &mut dyn RawDevice,
        timeout: Duration,
    ) -> Result<Option<Reply>, ResolveError> {
        let request = arp::create_request(src_mac, src_addr, target)?;

        let started = Instant::now();
        device.send_frame(&request)?;
        debug!("Sent ARP request for {target} on {}", device.name());

        let mut is_answer = |frame: &[u8]| arp::is_reply_from(frame, target);
        let frame = device.receive_frame_matching(&mut is_answer, timeout)?;
        let rtt = started.elapsed();

        let Some(answer) = frame.as_deref().and_then(arp::parse_reply) else {
            debug!("No ARP reply from {target} within {timeout:?}");
            return Ok(None);
        };
        if answer.sender_addr != target {
            return Ok(None);
        }

        if let Some(evicted) = self.lock_cache().insert(target, answer.sender_mac) {
            debug!("Evicted {evicted} from the ARP cache");
        }
        debug!("{target} is at {} ({rtt:?})", answer.sender_mac);

        Ok(Some(Reply { mac: answer.sender_mac, rtt }))
    }

    /// Checks everything needed before a request can go out and picks the sender addresses.
    fn source_addresses(
        &self,
        target: Ipv4Address,
        device: &dyn RawDevice,
    ) -> Result<(MacAddress, Ipv4Address), ResolveError> {
        if !device.is_open() {
            return Err(ResolveError::DeviceNotOpen(device.name().to_string()));
        }
        if !target.is_valid() {
            return Err(ResolveError::InvalidTarget);
        }

        let src_addr = self
            .config
            .source_addr
            .filter(is_usable_addr)
            .unwrap_or_else(|| device.ipv4_address());
        if !is_usable_addr(&src_addr) {
            return Err(ResolveError::NoSourceAddress("IPv4"));
        }

        let src_mac = self
            .config
            .source_mac
            .filter(is_usable_mac)
            .unwrap_or_else(|| device.mac_address());
        if !is_usable_mac(&src_mac) {
            return Err(ResolveError::NoSourceAddress("MAC"));
        }

        Ok((src_mac, src_addr))
    }

    fn lock_cache(&self) -> MutexGuard<'_, ArpCache> {
        // every mutation completes under the lock, so a poisoned cache is still consistent
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

fn is_usable_addr(addr: &Ipv4Address) -> bool {
    addr.is_valid() && *addr != Ipv4Address::UNSPECIFIED
}

fn is_usable_mac(mac: &MacAddress) -> bool {
    mac.is_valid() && *mac != MacAddress::ZERO
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
