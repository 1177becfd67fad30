//! Implementation of `gcat show`.

use std::process::ExitCode;

use comfy_table::Cell;
use gcat_catalog::{Catalog, Tool, ToolVersion};
use serde::Serialize;

use crate::cli::{
    args::ShowCommand,
    context::CommandContext,
    output::{JsonTool, dim, header, print_json, subheader, table},
};

/// JSON output for `gcat show --json`.
#[derive(Serialize)]
struct JsonShowOutput<'a> {
    /// Tool summary.
    #[serde(flatten)]
    tool: JsonTool,
    /// Versions with hosting instance labels.
    versions: Vec<JsonVersion<'a>>,
}

/// A version with its hosts resolved.
#[derive(Serialize)]
struct JsonVersion<'a> {
    /// Version record.
    #[serde(flatten)]
    version: &'a ToolVersion,
    /// Labels of the hosting instances.
    hosted_on: Vec<&'a str>,
}

/// Prints a tool's details, versions, and hosting servers.
pub fn run(ctx: &CommandContext, cmd: &ShowCommand) -> ExitCode {
    let catalog = match ctx.load_catalog() {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let Some(tool) = catalog.tool_by_name(&cmd.tool) else {
        eprintln!("error: no tool named {:?} in the catalog", cmd.tool);
        return ExitCode::FAILURE;
    };

    if cmd.json {
        return print_json(&JsonShowOutput {
            tool: JsonTool::new(tool, &catalog),
            versions: catalog
                .tool_versions(tool)
                .into_iter()
                .map(|version| JsonVersion {
                    version,
                    hosted_on: hosts(&catalog, version),
                })
                .collect(),
        });
    }

    print_tool(&catalog, tool);
    ExitCode::SUCCESS
}

/// Labels of the instances hosting `version`.
fn hosts<'a>(catalog: &'a Catalog, version: &ToolVersion) -> Vec<&'a str> {
    version
        .instances
        .iter()
        .filter_map(|id| catalog.instance(*id))
        .map(|i| i.label())
        .collect()
}

/// Renders the human-readable view.
fn print_tool(catalog: &Catalog, tool: &Tool) {
    println!("{}", header(&tool.name));
    if !tool.display_name.is_empty() {
        println!("   {}", tool.display_name);
    }
    if !tool.description.is_empty() {
        println!("   {}", dim(&tool.description));
    }
    println!();

    println!("{}", subheader("Topics:"));
    let topics = catalog.tool_topics(tool);
    if topics.is_empty() {
        println!("   {}", dim("(none)"));
    }
    for topic in topics {
        println!("   {}", topic.label);
    }
    println!();

    println!("{}", subheader("Versions:"));
    let mut versions = table(["Version", "Owner", "Tool shed", "Changeset", "Hosted on"]);
    for version in catalog.tool_versions(tool) {
        versions.add_row(vec![
            Cell::new(&version.version),
            Cell::new(version.owner.as_deref().unwrap_or("-")),
            Cell::new(version.tool_shed.as_deref().unwrap_or("local")),
            Cell::new(version.changeset.as_deref().unwrap_or("-")),
            Cell::new(hosts(catalog, version).join(", ")),
        ]);
    }
    println!("{versions}");
}
