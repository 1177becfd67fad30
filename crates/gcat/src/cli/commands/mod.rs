//! Command implementations and dispatch.

pub mod add_instance;
pub mod init;
pub mod instances;
pub mod search;
mod shared;
pub mod show;
pub mod status;
pub mod update;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::AddInstance(cmd) => add_instance::run(ctx, &cmd),
        Commands::Update => update::run(ctx),
        Commands::Instances(cmd) => instances::run(ctx, &cmd),
        Commands::Show(cmd) => show::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Status => status::run(ctx),
    }
}
