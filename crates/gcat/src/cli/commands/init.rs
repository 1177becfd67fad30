//! Implementation of `gcat init`.

use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use gcat_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};

use crate::cli::{args::InitCommand, context::CommandContext, output::subheader};

/// Catalog directory added to `.gitignore`.
const CATALOG_DIR_PATTERN: &str = ".gcat/";

/// Writes a commented `.gcat.toml` template.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let is_home_dir = global_config_path()
        .and_then(|p| p.parent().map(|h| h == cwd))
        .unwrap_or(false);
    let use_global = cmd.global || is_home_dir;

    let config_path = if use_global {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: could not determine home directory");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    for line in template.lines() {
        println!("   {line}");
    }

    if !use_global && let Err(e) = update_gitignore(&config_path) {
        eprintln!("warning: could not update .gitignore: {e}");
    }

    ExitCode::SUCCESS
}

/// Adds `.gcat/` to an existing `.gitignore` next to the config file.
fn update_gitignore(config_path: &Path) -> io::Result<()> {
    let Some(parent) = config_path.parent() else {
        return Ok(());
    };
    let gitignore_path = parent.join(".gitignore");
    if !gitignore_path.exists() {
        return Ok(());
    }

    let contents = fs::read_to_string(&gitignore_path)?;
    if contents
        .lines()
        .map(str::trim)
        .any(|line| line == CATALOG_DIR_PATTERN || line == ".gcat")
    {
        return Ok(());
    }

    let mut file = fs::OpenOptions::new().append(true).open(&gitignore_path)?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{CATALOG_DIR_PATTERN}")?;
    println!("Added {CATALOG_DIR_PATTERN} to .gitignore");

    Ok(())
}
