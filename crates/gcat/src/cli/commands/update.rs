//! Implementation of `gcat update`.

use std::process::ExitCode;

use super::shared::{describe_report, poll_instance};
use crate::cli::{
    context::CommandContext,
    output::{dim, warning},
};

/// Re-polls every registered server. Exits with failure if any server failed.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let mut catalog = match ctx.load_catalog() {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let urls: Vec<String> = catalog.instances().map(|i| i.url.clone()).collect();
    if urls.is_empty() {
        println!("{}", dim("No instances registered."));
        println!("Run 'gcat add-instance <url>' to add one.");
        return ExitCode::SUCCESS;
    }

    let client = match ctx.galaxy_client() {
        Ok(client) => client,
        Err(code) => return code,
    };

    let mut failed = 0;
    for url in &urls {
        match poll_instance(&client, &mut catalog, url) {
            Ok((_, report)) => println!("{url}: {}", describe_report(&report)),
            Err(e) => {
                eprintln!("{}", warning(&format!("{url}: {e}")));
                failed += 1;
            }
        }
    }

    if failed < urls.len()
        && let Err(code) = ctx.save_catalog(&catalog)
    {
        return code;
    }

    if failed > 0 {
        eprintln!("error: {failed} of {} instances failed to update", urls.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
