//! Implementation of `gcat status`.

use std::process::ExitCode;

use gcat_catalog::Catalog;

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows config files, effective settings, and catalog statistics.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    println!("{}", subheader("Config files:"));
    if config.files.is_empty() {
        println!("   {}", dim("(none, using defaults; run 'gcat init' to create one)"));
    }
    for path in &config.files {
        println!("   {}", path.display());
    }
    println!();

    println!("{}", subheader("Settings:"));
    match config.settings_to_toml() {
        Ok(toml) => {
            for line in toml.lines() {
                println!("   {line}");
            }
        }
        Err(e) => {
            eprintln!("error: failed to render settings: {e}");
            return ExitCode::FAILURE;
        }
    }
    println!();

    let path = match ctx.catalog_path() {
        Ok(path) => path,
        Err(code) => return code,
    };
    println!("{}", subheader("Catalog:"));
    if !path.exists() {
        println!("   {} {}", path.display(), warning("[missing]"));
        println!("   {}", dim("Run 'gcat add-instance <url>' to build it."));
        return ExitCode::SUCCESS;
    }
    println!("   {}", path.display());

    let catalog = match Catalog::load(&path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let stats = catalog.stats();
    println!("   instances: {}", stats.instances);
    println!("   tools:     {}", stats.tools);
    println!("   versions:  {}", stats.versions);
    println!("   topics:    {}", stats.topics);

    ExitCode::SUCCESS
}
