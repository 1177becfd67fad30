//! Implementation of `gcat instances`.

use std::{process::ExitCode, time::SystemTime};

use comfy_table::Cell;

use crate::cli::{
    args::InstancesCommand,
    context::CommandContext,
    output::{JsonInstance, dim, format_age, print_json, table},
};

/// Lists registered servers with their tool counts.
pub fn run(ctx: &CommandContext, cmd: &InstancesCommand) -> ExitCode {
    let catalog = match ctx.load_catalog() {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    if cmd.json {
        let instances: Vec<_> = catalog
            .instances()
            .map(|instance| JsonInstance {
                instance,
                tool_count: catalog.instance_tool_count(instance.id),
            })
            .collect();
        return print_json(&instances);
    }

    if catalog.instances().next().is_none() {
        println!("{}", dim("No instances registered."));
        return ExitCode::SUCCESS;
    }

    let now = SystemTime::now();
    let mut listing = table(["ID", "Brand", "URL", "Galaxy", "Tools", "Updated"]);
    for instance in catalog.instances() {
        listing.add_row(vec![
            Cell::new(instance.id),
            Cell::new(instance.brand.as_deref().unwrap_or("-")),
            Cell::new(&instance.url),
            Cell::new(instance.version.as_deref().unwrap_or("-")),
            Cell::new(catalog.instance_tool_count(instance.id)),
            Cell::new(
                instance
                    .update_date
                    .map_or_else(|| "never".to_string(), |t| format_age(t, now)),
            ),
        ]);
    }
    println!("{listing}");
    ExitCode::SUCCESS
}
