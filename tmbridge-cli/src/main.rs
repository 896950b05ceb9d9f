//! # tmbridge CLI Entry Point
//!
//! Command-line front end for the tmbridge Jira client: checks a connection
//! profile and runs individual Jira operations, printing results as JSON.

use std::env;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod output;
mod profile;

const VERBOSITY_ENV: &str = "TMBRIDGE_VERBOSITY";

fn level_for(verbose: u8) -> Level {
  match verbose {
    0 => Level::WARN,  // Default: warnings and errors
    1 => Level::INFO,  // -v: info, warnings, and errors
    2 => Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => Level::TRACE, // -vvv or more: trace and everything else
  }
}

fn init_tracing(verbose: u8) -> Level {
  // Flags win; the environment only fills in when no -v was given.
  let verbosity = if verbose > 0 {
    verbose
  } else {
    env::var(VERBOSITY_ENV)
      .ok()
      .and_then(|v| v.parse::<u8>().ok())
      .filter(|level| *level <= 3)
      .unwrap_or(0)
  };
  let level = level_for(verbosity);

  let fmt_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .with_level(true);
  let filter = EnvFilter::default().add_directive(level.into());

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt_layer)
    .try_init()
    .ok();
  level
}

fn main() -> Result<()> {
  let cmd = cli::Cli::parse();

  let level = init_tracing(cmd.verbose);
  debug!("Tracing initialized with level: {}", level);

  cli::handle_cli(cmd)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_level_for() {
    assert_eq!(level_for(0), Level::WARN);
    assert_eq!(level_for(1), Level::INFO);
    assert_eq!(level_for(2), Level::DEBUG);
    assert_eq!(level_for(3), Level::TRACE);
    assert_eq!(level_for(9), Level::TRACE);
  }
}
