use anyhow::{Context, bail};
use colored::*;
use is_root::is_root;
use linkaddr_common::config::Config;
use linkaddr_common::network::Ipv4Address;
use linkaddr_common::{debug, success, warn};
use linkaddr_core::device::RawDevice;
use linkaddr_core::resolver::{AddressResolver, Reply, ResolverConfig};

use crate::device::{self, PnetDevice};
use crate::terminal::print;

pub fn resolve(target: Ipv4Address, iface: Option<&str>, cfg: &Config) -> anyhow::Result<()> {
    if !is_root() {
        warn!("Not running as root, opening a raw channel will probably fail");
    }

    let interface = device::select_interface(pnet::datalink::interfaces(), iface, target)?;
    let mut device = PnetDevice::new(interface);
    device
        .open()
        .with_context(|| format!("opening datalink channel on {}", device.name()))?;

    let resolver = AddressResolver::new(ResolverConfig::from(cfg));
    match resolve_with_retries(&resolver, target, &mut device, cfg)? {
        Some(reply) => {
            report(target, device.name(), &reply, cfg);
            Ok(())
        }
        None => bail!("no reply from {target} after {} attempt(s)", attempts(cfg)),
    }
}

/// Sends up to `cfg.retries` requests, stopping at the first answer.
pub fn resolve_with_retries(
    resolver: &AddressResolver,
    target: Ipv4Address,
    device: &mut dyn RawDevice,
    cfg: &Config,
) -> anyhow::Result<Option<Reply>> {
    let total = attempts(cfg);
    for attempt in 1..=total {
        debug!("ARP request {attempt}/{total} for {target}");
        let reply = resolver
            .probe(target, device, cfg.reply_timeout)
            .with_context(|| format!("resolving {target} on {}", device.name()))?;
        if let Some(reply) = reply {
            return Ok(Some(reply));
        }
        warn!("No reply from {target} ({attempt}/{total})");
    }
    Ok(None)
}

fn attempts(cfg: &Config) -> u8 {
    cfg.retries.max(1)
}

fn report(target: Ipv4Address, iface: &str, reply: &Reply, cfg: &Config) {
    success!("{target} is at {}", reply.mac.to_string().bold());

    print::header("resolution", cfg.quiet);
    print::aligned_line("Address", target);
    print::aligned_line("MAC", reply.mac);
    if let Some(vendor) = reply.mac.vendor() {
        print::aligned_line("Vendor", vendor);
    }
    print::aligned_line("Interface", iface);
    print::aligned_line("RTT", format!("{:.2}ms", reply.rtt.as_secs_f64() * 1000.0).yellow());
    print::separator(cfg.quiet);
}
