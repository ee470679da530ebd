pub mod mac;
pub mod membership;
pub mod network;
pub mod resolve;

use clap::{ArgAction, Parser, Subcommand};
use linkaddr_common::config::{DEFAULT_REPLY_TIMEOUT, DEFAULT_RETRIES};
use linkaddr_common::network::{Ipv4Address, Ipv4Network};

#[derive(Parser)]
#[command(name = "linkaddr")]
#[command(about = "Resolve, inspect and match link-layer and IP addresses.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output (-q hides headers and library logs)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an IPv4 address to its hardware address over ARP
    #[command(alias = "r")]
    Resolve {
        #[arg(value_parser = parse_ipv4)]
        target: Ipv4Address,

        /// Interface to send on (defaults to the one whose subnet holds the target)
        #[arg(short, long)]
        iface: Option<String>,

        /// Milliseconds to wait for each reply
        #[arg(short, long, default_value_t = DEFAULT_REPLY_TIMEOUT.as_millis() as u64)]
        timeout: u64,

        /// Requests to send before giving up
        #[arg(short, long, default_value_t = DEFAULT_RETRIES)]
        retries: u8,
    },
    /// Show the address range of a CIDR network
    #[command(alias = "n")]
    Network { cidr: Ipv4Network },
    /// Check whether an IPv4 address belongs to a network
    #[command(alias = "m")]
    Match { address: String, network: String },
    /// Normalise a MAC address and look up its vendor
    Mac { mac: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_ipv4(s: &str) -> Result<Ipv4Address, String> {
    let addr = Ipv4Address::parse(s);
    if addr.is_valid() {
        Ok(addr)
    } else {
        Err(format!("'{s}' is not a valid IPv4 address"))
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
