use anyhow::bail;
use linkaddr_common::config::Config;
use linkaddr_common::network::MacAddress;

use crate::terminal::print;

pub fn mac(input: &str, cfg: &Config) -> anyhow::Result<()> {
    let mac = MacAddress::parse(input);
    if !mac.is_valid() {
        bail!("'{input}' is not a valid MAC address");
    }

    print::header("hardware address", cfg.quiet);
    print::aligned_line("MAC", mac);
    print::aligned_line("Vendor", mac.vendor().unwrap_or_else(|| "unknown".to_string()));
    Ok(())
}
