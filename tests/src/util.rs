use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use linkaddr_common::network::{Ipv4Address, MacAddress};
use linkaddr_core::arp;
use linkaddr_core::device::{DeviceError, RawDevice};
use pnet::packet::arp::ArpPacket;

pub const LOCAL_MAC: MacAddress = MacAddress::new(0x02, 0x00, 0x00, 0x00, 0x00, 0x01);
pub const LOCAL_ADDR: Ipv4Address = Ipv4Address::new(192, 168, 50, 1);

pub struct Neighbour {
    pub mac: MacAddress,
    pub latency: Duration,
    /// Requests to ignore before answering.
    pub deaf_for: usize,
}

/// Plays the rest of the segment: answers ARP requests for known neighbours.
pub struct ScriptedDevice {
    pub open: bool,
    pub neighbours: HashMap<Ipv4Address, Neighbour>,
    /// Frames delivered ahead of any reply.
    pub noise: Vec<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
    inbox: VecDeque<(Vec<u8>, Duration)>,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self {
            open: false,
            neighbours: HashMap::new(),
            noise: Vec::new(),
            sent: Vec::new(),
            inbox: VecDeque::new(),
        }
    }

    pub fn with_neighbour(mut self, addr: Ipv4Address, mac: MacAddress) -> Self {
        self.neighbours.insert(addr, Neighbour { mac, latency: Duration::ZERO, deaf_for: 0 });
        self
    }

    pub fn with_slow_neighbour(mut self, addr: Ipv4Address, mac: MacAddress, latency: Duration) -> Self {
        self.neighbours.insert(addr, Neighbour { mac, latency, deaf_for: 0 });
        self
    }

    pub fn with_deaf_neighbour(mut self, addr: Ipv4Address, mac: MacAddress, deaf_for: usize) -> Self {
        self.neighbours.insert(addr, Neighbour { mac, latency: Duration::ZERO, deaf_for });
        self
    }

    pub fn requests_for(&self, target: Ipv4Address) -> usize {
        self.sent
            .iter()
            .filter_map(|frame| ArpPacket::new(&frame[arp::ETH_HDR_LEN..]).map(|p| p.get_target_proto_addr()))
            .filter(|addr| Ipv4Address::from(*addr) == target)
            .count()
    }
}

impl RawDevice for ScriptedDevice {
    fn name(&self) -> &str {
        "scripted0"
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn ipv4_address(&self) -> Ipv4Address {
        LOCAL_ADDR
    }

    fn mac_address(&self) -> MacAddress {
        LOCAL_MAC
    }

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), DeviceError> {
        self.sent.push(frame.to_vec());
        for noise in &self.noise {
            self.inbox.push_back((noise.clone(), Duration::ZERO));
        }

        let Some(request) = ArpPacket::new(&frame[arp::ETH_HDR_LEN..]) else {
            return Ok(());
        };
        let target = Ipv4Address::from(request.get_target_proto_addr());
        let requester_mac = MacAddress::from(request.get_sender_hw_addr());
        let requester_addr = Ipv4Address::from(request.get_sender_proto_addr());

        if let Some(neighbour) = self.neighbours.get_mut(&target) {
            if neighbour.deaf_for > 0 {
                neighbour.deaf_for -= 1;
                return Ok(());
            }
            let reply = arp::create_reply(neighbour.mac, target, requester_mac, requester_addr)
                .expect("reply frame");
            self.inbox.push_back((reply, neighbour.latency));
        }
        Ok(())
    }

    fn receive_frame_matching(
        &mut self,
        predicate: &mut dyn FnMut(&[u8]) -> bool,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, DeviceError> {
        while let Some((frame, latency)) = self.inbox.pop_front() {
            if latency > timeout {
                continue;
            }
            if predicate(&frame) {
                std::thread::sleep(latency);
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
