//! The link-layer device the resolver talks through.
//!
//! Opening capture handles, selecting interfaces and the actual socket work stay
//! outside this crate. Anything that can push raw Ethernet frames out and hand
//! matching frames back within a deadline can drive an
//! [`AddressResolver`](crate::resolver::AddressResolver).

use std::io;
use std::time::Duration;

use linkaddr_common::network::{Ipv4Address, MacAddress};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device {0} is not open")]
    NotOpen(String),

    #[error("failed to open {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to send frame: {0}")]
    Send(#[source] io::Error),

    #[error("failed to receive frame: {0}")]
    Receive(#[source] io::Error),

    #[error("non-ethernet channel for {0}")]
    Unsupported(String),
}

pub trait RawDevice {
    /// Interface name, used in log and error messages.
    fn name(&self) -> &str;

    fn open(&mut self) -> Result<(), DeviceError>;

    fn is_open(&self) -> bool;

    /// The IPv4 address configured on the device, or [`Ipv4Address::INVALID`].
    fn ipv4_address(&self) -> Ipv4Address;

    /// The hardware address of the device, or [`MacAddress::INVALID`].
    fn mac_address(&self) -> MacAddress;

    /// Transmits one complete Ethernet frame.
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), DeviceError>;

    /// Blocks until a frame accepted by `predicate` arrives or `timeout` elapses.
    ///
    /// Frames rejected by the predicate are dropped. `Ok(None)` means the deadline
    /// passed without a match.
    fn receive_frame_matching(
        &mut self,
        predicate: &mut dyn FnMut(&[u8]) -> bool,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, DeviceError>;
}
