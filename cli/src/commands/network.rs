use linkaddr_common::config::Config;
use linkaddr_common::network::Ipv4Network;

use crate::terminal::print;

pub fn network(cidr: Ipv4Network, cfg: &Config) {
    print::header("network", cfg.quiet);
    print::aligned_line("Network", cidr);
    print::aligned_line("Prefix", cidr.prefix_len());
    print::aligned_line("Netmask", cidr.netmask());
    print::aligned_line("Lowest", cidr.lowest_address());
    print::aligned_line("Highest", cidr.highest_address());
    print::aligned_line("Addresses", cidr.total_address_count());
    print::separator(cfg.quiet);
}
