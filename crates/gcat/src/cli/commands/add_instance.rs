//! Implementation of `gcat add-instance`.

use std::process::ExitCode;

use super::shared::{describe_report, poll_instance};
use crate::{
    cli::{args::AddInstanceCommand, context::CommandContext},
    galaxy::normalize_url,
};

/// Registers a server, ingests its tools, and saves the catalog.
pub fn run(ctx: &CommandContext, cmd: &AddInstanceCommand) -> ExitCode {
    let url = match normalize_url(&cmd.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match ctx.galaxy_client() {
        Ok(client) => client,
        Err(code) => return code,
    };
    let mut catalog = match ctx.load_catalog() {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let existed = catalog.instance_by_url(&url).is_some();
    let (id, report) = match poll_instance(&client, &mut catalog, &url) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(code) = ctx.save_catalog(&catalog) {
        return code;
    }

    let label = catalog
        .instance(id)
        .map_or(url.as_str(), |instance| instance.label());
    let verb = if existed { "Updated" } else { "Added" };
    println!("{verb} {label}: {}", describe_report(&report));
    ExitCode::SUCCESS
}
