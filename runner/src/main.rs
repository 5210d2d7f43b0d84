//! propnet - command-line driver for the propagation-network engine
//!
//! Subcommands:
//! 1. `rollouts`: depth-charge benchmark (random playouts to terminal)
//! 2. `match`: one game between local players (mcts, random, legal)
//! 3. `games`: list the registered games

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod arena;
mod config;
mod rollouts;

use crate::config::{Cli, Command};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse and validate configuration
    let cli = Cli::parse();
    cli.validate()?;

    // Initialize tracing
    init_tracing(&cli.log_level)?;
    info!(log_level = %cli.log_level, "Tracing initialized");

    propnet_games::register_all_games();

    let result = match &cli.command {
        Command::Rollouts(args) => rollouts::run(args),
        Command::Match(args) => arena::run(args),
        Command::Games => {
            for name in propnet_core::list_registered_networks() {
                println!("{name}");
            }
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
