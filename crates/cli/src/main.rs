// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `wa` - the workload agent command line.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::configure::ConfigureArgs;

#[derive(Parser)]
#[command(name = "wa", version, about = "Database workload metrics agent")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the agent as a long-lived daemon
    Startdaemon {
        /// Path to the configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Modify the on-disk configuration for one workload
    Configure(ConfigureArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Startdaemon { config } => commands::startdaemon::run(config).await,
        Command::Configure(args) => commands::configure::run(args),
    };

    if let Err(e) = result {
        eprintln!("wa: {e:#}");
        std::process::exit(1);
    }
}

/// Default on-disk configuration location.
pub(crate) fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/workload-agent/configuration.toml")
}
