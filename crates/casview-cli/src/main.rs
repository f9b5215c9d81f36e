//! casview CLI: the `casview` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assemble {
            assertion,
            protocol,
            config,
            release_credential,
            json,
        } => commands::assemble::run(commands::assemble::Args {
            assertion,
            protocol,
            config,
            release_credential,
            json,
        }),

        Commands::ConfigCheck { config, json } => commands::config_check::run(config, json),

        Commands::CallbackCheck {
            url,
            pgt_id,
            pgt_iou,
            config,
            json,
        } => commands::callback_check::run(commands::callback_check::Args {
            url,
            pgt_id,
            pgt_iou,
            config,
            json,
        }),
    }
}
