use std::io;
use std::time::{Duration, Instant};

use anyhow::bail;
use linkaddr_common::network::{Ipv4Address, Ipv4Network, MacAddress};
use linkaddr_common::debug;
use linkaddr_core::device::{DeviceError, RawDevice};
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

/// How long a single `rx.next()` may block before the deadline is checked again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type ChannelOpener = fn(&NetworkInterface, Config) -> io::Result<Channel>;

/// [`RawDevice`] over a pnet datalink channel.
pub struct PnetDevice {
    interface: NetworkInterface,
    opener: ChannelOpener,
    channel: Option<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>)>,
}

impl PnetDevice {
    pub fn new(interface: NetworkInterface) -> Self {
        Self::with_opener(interface, datalink::channel)
    }

    fn with_opener(interface: NetworkInterface, opener: ChannelOpener) -> Self {
        Self {
            interface,
            opener,
            channel: None,
        }
    }

    fn channel_config() -> Config {
        Config {
            read_timeout: Some(POLL_INTERVAL),
            ..Default::default()
        }
    }
}

impl RawDevice for PnetDevice {
    fn name(&self) -> &str {
        &self.interface.name
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.channel.is_some() {
            return Ok(());
        }
        let channel = (self.opener)(&self.interface, Self::channel_config()).map_err(|source| {
            DeviceError::Open {
                name: self.interface.name.clone(),
                source,
            }
        })?;
        match channel {
            Channel::Ethernet(tx, rx) => {
                debug!("Opened datalink channel on {}", self.interface.name);
                self.channel = Some((tx, rx));
                Ok(())
            }
            _ => Err(DeviceError::Unsupported(self.interface.name.clone())),
        }
    }

    fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    fn ipv4_address(&self) -> Ipv4Address {
        first_ipv4_net(&self.interface)
            .map(|net| Ipv4Address::from(net.ip()))
            .unwrap_or(Ipv4Address::INVALID)
    }

    fn mac_address(&self) -> MacAddress {
        self.interface.mac.map(MacAddress::from).unwrap_or(MacAddress::INVALID)
    }

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), DeviceError> {
        let Some((tx, _)) = self.channel.as_mut() else {
            return Err(DeviceError::NotOpen(self.interface.name.clone()));
        };
        match tx.send_to(frame, None) {
            Some(result) => result.map_err(DeviceError::Send),
            None => Err(DeviceError::Send(io::Error::other("no write buffer available"))),
        }
    }

    fn receive_frame_matching(
        &mut self,
        predicate: &mut dyn FnMut(&[u8]) -> bool,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, DeviceError> {
        let Some((_, rx)) = self.channel.as_mut() else {
            return Err(DeviceError::NotOpen(self.interface.name.clone()));
        };

        let deadline = Instant::now() + timeout;
        while deadline > Instant::now() {
            match rx.next() {
                Ok(frame) if predicate(frame) => return Ok(Some(frame.to_vec())),
                Ok(_) => {}
                Err(e) if is_poll_timeout(&e) => {}
                Err(e) => return Err(DeviceError::Receive(e)),
            }
        }
        Ok(None)
    }
}

fn is_poll_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

fn first_ipv4_net(interface: &NetworkInterface) -> Option<pnet::ipnetwork::Ipv4Network> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) => Some(*v4),
        IpNetwork::V6(_) => None,
    })
}

/// Whether ARP can run on this interface at all.
fn is_viable(interface: &NetworkInterface) -> bool {
    interface.is_up()
        && !interface.is_loopback()
        && !interface.is_point_to_point()
        && interface.mac.is_some_and(|mac| mac != pnet::util::MacAddr::zero())
        && first_ipv4_net(interface).is_some()
}

/// Whether `target` sits in one of the interface's IPv4 subnets.
fn is_on_link(interface: &NetworkInterface, target: Ipv4Address) -> bool {
    interface.ips.iter().any(|net| match net {
        IpNetwork::V4(v4) => Ipv4Network::new(Ipv4Address::from(v4.ip()), v4.prefix())
            .is_ok_and(|local| local.includes(&target)),
        IpNetwork::V6(_) => false,
    })
}

/// Picks the interface to resolve `target` on.
///
/// An explicit name wins. Otherwise the first viable interface whose subnet holds
/// the target, falling back to the first viable interface.
pub fn select_interface(
    interfaces: Vec<NetworkInterface>,
    name: Option<&str>,
    target: Ipv4Address,
) -> anyhow::Result<NetworkInterface> {
    if let Some(name) = name {
        return match interfaces.into_iter().find(|intf| intf.name == name) {
            Some(intf) => Ok(intf),
            None => bail!("no interface named '{name}'"),
        };
    }

    let mut viable: Vec<NetworkInterface> = interfaces.into_iter().filter(is_viable).collect();
    if viable.is_empty() {
        bail!("no interface available for ARP");
    }
    let idx = viable.iter().position(|intf| is_on_link(intf, target)).unwrap_or(0);
    Ok(viable.swap_remove(idx))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
