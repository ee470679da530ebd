#![cfg(test)]
use std::num::NonZeroUsize;
use std::time::Duration;

use linkaddr_common::config::Config;
use linkaddr_common::logging::{self, Suppressed};
use linkaddr_common::network::{Ipv4Address, Ipv4Network, MacAddress};
use linkaddr_core::arp;
use linkaddr_core::device::RawDevice;
use linkaddr_core::resolver::{AddressResolver, ResolveError, ResolverConfig};

use crate::util::{LOCAL_ADDR, LOCAL_MAC, ScriptedDevice};

const TIMEOUT: Duration = Duration::from_millis(100);

fn host(last: u8) -> Ipv4Address {
    Ipv4Address::new(192, 168, 50, last)
}

fn mac(last: u8) -> MacAddress {
    MacAddress::new(0x3c, 0x22, 0xfb, 0x00, 0x00, last)
}

fn opened(device: ScriptedDevice) -> ScriptedDevice {
    let mut device = device;
    device.open().expect("scripted device opens");
    device
}

#[test]
fn resolve_through_scripted_segment() {
    let mut device = opened(ScriptedDevice::new().with_neighbour(host(10), mac(10)));
    let resolver = AddressResolver::default();

    assert_eq!(resolver.resolve(host(10), &mut device, TIMEOUT).unwrap(), mac(10));
    assert_eq!(resolver.resolve(host(10), &mut device, TIMEOUT).unwrap(), mac(10));
    assert_eq!(device.requests_for(host(10)), 1, "second lookup should be a cache hit");
}

#[test]
fn resolve_requires_open_device() {
    let mut device = ScriptedDevice::new().with_neighbour(host(10), mac(10));
    let resolver = AddressResolver::default();

    let result = resolver.resolve(host(10), &mut device, TIMEOUT);
    assert!(matches!(result, Err(ResolveError::DeviceNotOpen(_))));
    assert!(device.sent.is_empty());
}

#[test]
fn noise_on_the_wire_is_skipped() {
    let mut device = ScriptedDevice::new().with_neighbour(host(10), mac(10));
    device.noise = vec![
        // someone else asking for the same host
        arp::create_request(mac(99), host(99), host(10)).unwrap(),
        // a reply from an unrelated host
        arp::create_reply(mac(11), host(11), LOCAL_MAC, LOCAL_ADDR).unwrap(),
        vec![0u8; 12],
    ];
    let mut device = opened(device);

    let resolver = AddressResolver::default();
    assert_eq!(resolver.resolve(host(10), &mut device, TIMEOUT).unwrap(), mac(10));
    assert_eq!(resolver.cached(&host(11)), None);
}

#[test]
fn slow_reply_times_out_to_zero_mac() {
    let mut device = opened(ScriptedDevice::new().with_slow_neighbour(
        host(20),
        mac(20),
        Duration::from_millis(500),
    ));
    let resolver = AddressResolver::default();

    let resolved = resolver.resolve(host(20), &mut device, TIMEOUT).unwrap();
    assert_eq!(resolved, MacAddress::ZERO);
    assert_eq!(resolver.cache_len(), 0);

    // a patient caller gets the answer
    let resolved = resolver.resolve(host(20), &mut device, Duration::from_secs(1)).unwrap();
    assert_eq!(resolved, mac(20));
}

#[test]
fn probe_reports_round_trip_time() {
    let latency = Duration::from_millis(20);
    let mut device = opened(ScriptedDevice::new().with_slow_neighbour(host(30), mac(30), latency));
    let resolver = AddressResolver::default();

    let reply = resolver.probe(host(30), &mut device, TIMEOUT).unwrap().expect("reply");
    assert_eq!(reply.mac, mac(30));
    assert!(reply.rtt >= latency, "rtt {:?} shorter than latency", reply.rtt);
    assert_eq!(resolver.cached(&host(30)), Some(mac(30)));
}

#[test]
fn caller_retries_until_answered() {
    let mut device = opened(ScriptedDevice::new().with_deaf_neighbour(host(40), mac(40), 2));
    let resolver = AddressResolver::default();
    let cfg = Config::default();

    let mut answer = MacAddress::ZERO;
    for _ in 0..cfg.retries {
        answer = resolver.resolve(host(40), &mut device, TIMEOUT).unwrap();
        if answer != MacAddress::ZERO {
            break;
        }
    }
    assert_eq!(answer, mac(40));
    assert_eq!(device.requests_for(host(40)), 3);
}

#[test]
fn sweep_of_a_subnet_respects_cache_capacity() {
    let subnet: Ipv4Network = "192.168.50.0/28".parse().unwrap();
    let mut device = ScriptedDevice::new();
    for last in 1..=14u8 {
        if last % 2 == 0 {
            device = device.with_neighbour(host(last), mac(last));
        }
    }
    let mut device = opened(device);

    let resolver = AddressResolver::new(ResolverConfig {
        cache_capacity: NonZeroUsize::new(4).unwrap(),
        ..ResolverConfig::default()
    });

    // unreachable hosts are expected here, keep the log quiet
    let guard = Suppressed::new();
    assert!(!logging::logs_enabled());
    let lowest = subnet.lowest_address().to_u32();
    let highest = subnet.highest_address().to_u32();
    let mut found = Vec::new();
    for raw in lowest..=highest {
        let target = Ipv4Address::from(raw);
        if target == LOCAL_ADDR {
            continue;
        }
        let resolved = resolver.resolve(target, &mut device, Duration::from_millis(5)).unwrap();
        if resolved != MacAddress::ZERO {
            found.push(target);
        }
    }
    drop(guard);
    assert!(logging::logs_enabled());

    assert_eq!(found.len(), 7);
    assert_eq!(resolver.cache_len(), 4);
    // the last four answers survive
    for last in [8u8, 10, 12, 14] {
        assert_eq!(resolver.cached(&host(last)), Some(mac(last)));
    }
    assert_eq!(resolver.cached(&host(2)), None);
}

#[test]
fn config_drives_resolver_capacity() {
    let cfg = Config {
        cache_capacity: NonZeroUsize::new(1).unwrap(),
        ..Config::default()
    };
    let resolver = AddressResolver::new(ResolverConfig::from(&cfg));
    let mut device = opened(
        ScriptedDevice::new()
            .with_neighbour(host(2), mac(2))
            .with_neighbour(host(3), mac(3)),
    );

    resolver.resolve(host(2), &mut device, TIMEOUT).unwrap();
    resolver.resolve(host(3), &mut device, TIMEOUT).unwrap();
    assert_eq!(resolver.cache_len(), 1);
    assert_eq!(resolver.cached(&host(3)), Some(mac(3)));
}
