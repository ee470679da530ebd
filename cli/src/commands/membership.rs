use colored::*;
use linkaddr_common::config::Config;
use linkaddr_common::network::Ipv4Address;

use crate::terminal::print;

/// Lenient membership check: a malformed network is logged and reported as no match.
pub fn membership(address: &str, network: &str, cfg: &Config) -> bool {
    let addr = Ipv4Address::parse(address);
    let matched = addr.match_network(network);

    print::header("match", cfg.quiet);
    let verdict = if matched { "yes".green().bold() } else { "no".red().bold() };
    print::aligned_line("Address", addr);
    print::aligned_line("Network", network);
    print::aligned_line("Member", verdict);
    matched
}
