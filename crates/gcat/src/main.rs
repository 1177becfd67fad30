//! Command-line interface for `gcat`, the Galaxy tool catalog.

mod cli;
mod galaxy;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // `init` must work even when an existing config file is broken.
    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the `-v` level.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}
