mod commands;
mod device;
mod terminal;

use std::time::Duration;

use commands::{CommandLine, Commands, mac, membership, network, resolve};
use linkaddr_common::config::Config;
use linkaddr_common::logging;

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init(commands.verbose);
    if commands.quiet > 0 {
        logging::suppress_logs();
    }

    let mut cfg = Config {
        quiet: commands.quiet,
        ..Config::default()
    };

    match commands.command {
        Commands::Resolve { target, iface, timeout, retries } => {
            cfg.reply_timeout = Duration::from_millis(timeout);
            cfg.retries = retries;
            resolve::resolve(target, iface.as_deref(), &cfg)
        }
        Commands::Network { cidr } => {
            network::network(cidr, &cfg);
            Ok(())
        }
        Commands::Match { address, network: cidr } => {
            membership::membership(&address, &cidr, &cfg);
            Ok(())
        }
        Commands::Mac { mac: input } => mac::mac(&input, &cfg),
    }
}
