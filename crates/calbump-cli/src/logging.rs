//! Tracing subscriber initialisation.
//!
//! Only the binary installs a subscriber. `calbump-core` and
//! `calbump-adapters` emit spans and events and leave routing to us.
//!
//! | Flag(s)   | Level |
//! |-----------|-------|
//! | (none)    | warn  |
//! | `-v`      | info  |
//! | `-vv`     | debug |
//! | `-vvv`    | trace |
//! | `--quiet` | error |
//!
//! A set `RUST_LOG` replaces the table entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

const CRATES: [&str; 3] = ["calbump", "calbump_core", "calbump_adapters"];

/// Install the global subscriber, writing to stderr.
///
/// Fails if a subscriber is already registered in this process.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(args.log_level())));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// `calbump=info,calbump_core=info,...`; dependencies stay silent.
fn default_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_workspace_crate_gets_the_level() {
        assert_eq!(
            default_directives("debug"),
            "calbump=debug,calbump_core=debug,calbump_adapters=debug"
        );
    }

    #[test]
    fn directives_parse() {
        assert!(EnvFilter::try_new(default_directives("trace")).is_ok());
    }
}
