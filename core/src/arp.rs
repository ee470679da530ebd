//! ARP request/reply frames (RFC 826) over Ethernet II.

use std::net::Ipv4Addr;

use linkaddr_common::network::{Ipv4Address, MacAddress};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::util::MacAddr;
use thiserror::Error;

pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;

const HW_ADDR_LEN: u8 = 6;
const PROTO_ADDR_LEN: u8 = 4;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to create mutable {0} packet")]
    Buffer(&'static str),
}

/// The interesting half of an ARP reply: who answered, and from which hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_mac: MacAddress,
    pub sender_addr: Ipv4Address,
}

/// Builds a broadcast "who-has `target_addr`" request.
pub fn create_request(
    src_mac: MacAddress,
    src_addr: Ipv4Address,
    target_addr: Ipv4Address,
) -> Result<Vec<u8>, FrameError> {
    create_packet(
        ArpOperations::Request,
        (src_mac, src_addr),
        (MacAddress::ZERO, target_addr),
        MacAddress::BROADCAST,
    )
}

/// Builds the unicast answer `sender_addr is-at sender_mac`, addressed to the requester.
pub fn create_reply(
    sender_mac: MacAddress,
    sender_addr: Ipv4Address,
    requester_mac: MacAddress,
    requester_addr: Ipv4Address,
) -> Result<Vec<u8>, FrameError> {
    create_packet(
        ArpOperations::Reply,
        (sender_mac, sender_addr),
        (requester_mac, requester_addr),
        requester_mac,
    )
}

fn create_packet(
    operation: ArpOperation,
    (sender_mac, sender_addr): (MacAddress, Ipv4Address),
    (target_mac, target_addr): (MacAddress, Ipv4Address),
    eth_dst: MacAddress,
) -> Result<Vec<u8>, FrameError> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];

    {
        let mut eth_packet =
            MutableEthernetPacket::new(&mut buffer).ok_or(FrameError::Buffer("Ethernet"))?;
        eth_packet.set_destination(eth_dst.into());
        eth_packet.set_source(sender_mac.into());
        eth_packet.set_ethertype(EtherTypes::Arp);
    }

    {
        let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
            .ok_or(FrameError::Buffer("ARP"))?;
        arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
        arp_packet.set_protocol_type(EtherTypes::Ipv4);
        arp_packet.set_hw_addr_len(HW_ADDR_LEN);
        arp_packet.set_proto_addr_len(PROTO_ADDR_LEN);
        arp_packet.set_operation(operation);
        arp_packet.set_sender_hw_addr(sender_mac.into());
        arp_packet.set_target_hw_addr(target_mac.into());
        arp_packet.set_sender_proto_addr(Ipv4Addr::from(sender_addr.octets()));
        arp_packet.set_target_proto_addr(Ipv4Addr::from(target_addr.octets()));
    }

    Ok(Vec::from(buffer))
}

/// Extracts the sender of an Ethernet/IPv4 ARP reply. Any other frame yields `None`.
pub fn parse_reply(frame: &[u8]) -> Option<ArpReply> {
    let eth_packet = EthernetPacket::new(frame)?;
    if eth_packet.get_ethertype() != EtherTypes::Arp {
        return None;
    }
    let arp_packet = ArpPacket::new(eth_packet.payload())?;
    let is_ethernet_ipv4 = arp_packet.get_hardware_type() == ArpHardwareTypes::Ethernet
        && arp_packet.get_protocol_type() == EtherTypes::Ipv4
        && arp_packet.get_hw_addr_len() == HW_ADDR_LEN
        && arp_packet.get_proto_addr_len() == PROTO_ADDR_LEN;
    if !is_ethernet_ipv4 || arp_packet.get_operation() != ArpOperations::Reply {
        return None;
    }

    let sender_hw: MacAddr = arp_packet.get_sender_hw_addr();
    Some(ArpReply {
        sender_mac: sender_hw.into(),
        sender_addr: arp_packet.get_sender_proto_addr().into(),
    })
}

/// True for an ARP reply sent on behalf of `target`.
pub fn is_reply_from(frame: &[u8], target: Ipv4Address) -> bool {
    parse_reply(frame).is_some_and(|reply| reply.sender_addr == target)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
