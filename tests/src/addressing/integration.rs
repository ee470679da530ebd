#![cfg(test)]
use std::num::NonZeroUsize;

use linkaddr_common::lru::LruList;
use linkaddr_common::network::{
    AddressError, Family, IpAddress, Ipv4Address, Ipv4Network, Ipv6Address, MacAddress, NetworkError,
};
use linkaddr_common::utils::hex;

#[test]
fn text_round_trips() {
    for text in ["0.0.0.0", "10.20.30.40", "255.255.255.255"] {
        assert_eq!(Ipv4Address::parse(text).to_string(), text);
    }
    for text in ["::", "::1", "fe80::1:2", "2001:db8:0:1:1:1:1:1", "2607:f0d0:1002:51::4"] {
        let addr = Ipv6Address::parse(text);
        assert!(addr.is_valid(), "{text}");
        assert_eq!(Ipv6Address::parse(&addr.to_string()), addr);
        assert_eq!(addr.to_string(), text);
    }
    for text in ["00:1b:21:3a:4f:9c", "ff:ff:ff:ff:ff:ff"] {
        assert_eq!(MacAddress::parse(text).to_string(), text);
    }
}

#[test]
fn mixed_family_sorting() {
    let mut addrs: Vec<IpAddress> = ["fe80::1", "10.0.0.2", "::1", "10.0.0.1", "192.168.0.1"]
        .into_iter()
        .map(IpAddress::parse)
        .collect();
    addrs.sort();

    let families: Vec<Family> = addrs.iter().map(IpAddress::family).collect();
    assert_eq!(families, [Family::V4, Family::V4, Family::V4, Family::V6, Family::V6]);
    assert_eq!(addrs[0], IpAddress::parse("10.0.0.1"));
    assert_eq!(addrs[4], IpAddress::parse("fe80::1"));
}

#[test]
fn family_extraction_is_checked() {
    let v6 = IpAddress::parse("2001:db8::1");
    assert_eq!(
        v6.ipv4(),
        Err(AddressError::FamilyMismatch { expected: Family::V4, found: Family::V6 })
    );
    assert!(v6.ipv6().is_ok());
}

#[test]
fn nested_networks() {
    let host = Ipv4Address::parse("172.16.1.1");
    let mut previous: Option<Ipv4Network> = None;
    for prefix in (0..=32u8).rev() {
        let network = Ipv4Network::new(host, prefix).unwrap();
        assert!(network.includes(&host));
        assert!(network.includes_ip(&IpAddress::from(host)));
        if let Some(narrower) = previous {
            assert!(network.includes_network(&narrower));
            assert!(!narrower.includes_network(&network));
        }
        previous = Some(network);
    }
}

#[test]
fn lenient_and_strict_paths_agree() {
    let addr = Ipv4Address::parse("192.168.10.100");
    assert!(addr.match_network("192.168.10.0/24"));
    assert!(addr.match_network("192.168.0.0/255.255.0.0"));
    assert!(!addr.match_network("192.168.11.0/24"));

    // the lenient check swallows what the strict parser reports
    assert!(!addr.match_network("192.168.10.0/33"));
    assert!(matches!(
        "192.168.10.0/33".parse::<Ipv4Network>(),
        Err(NetworkError::PrefixOutOfRange(_))
    ));
}

#[test]
fn mac_from_hex_dump() {
    let mut raw = [0u8; 6];
    assert_eq!(hex::decode_into("001B213A4F9C", &mut raw), 6);
    let mac = MacAddress::from(raw);
    assert_eq!(mac, MacAddress::parse("00-1b-21-3a-4f-9c"));
    assert_eq!(mac.to_string(), "00:1b:21:3a:4f:9c");
}

#[test]
fn lru_tracks_addresses() {
    let mut order = LruList::new(NonZeroUsize::new(2).unwrap());
    let a = Ipv4Address::new(10, 0, 0, 1);
    let b = Ipv4Address::new(10, 0, 0, 2);
    let c = Ipv4Address::new(10, 0, 0, 3);

    assert_eq!(order.insert(a), None);
    assert_eq!(order.insert(b), None);
    assert!(order.touch(&a));
    assert_eq!(order.insert(c), Some(b));
    assert_eq!(order.iter().copied().collect::<Vec<_>>(), vec![c, a]);
}
