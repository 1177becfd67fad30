//! Rendering and JSON serialization for CLI output.

use std::{
    process::ExitCode,
    time::{Duration, SystemTime},
};

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use gcat_catalog::{Catalog, Instance, Tool};
use serde::Serialize;

/// ANSI escape codes for terminal output.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Creates a table with the shared preset.
pub fn table<I, S>(headers: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

/// Describes how long ago `time` was, e.g. `3d ago`.
pub fn format_age(time: SystemTime, now: SystemTime) -> String {
    let secs = now
        .duration_since(time)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    match secs {
        0..60 => "just now".to_string(),
        60..3_600 => format!("{}m ago", secs / 60),
        3_600..86_400 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Serializes `value` as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// A tool with its related labels resolved, for JSON output.
#[derive(Serialize)]
pub struct JsonTool {
    /// Short tool name.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: String,
    /// Topic labels.
    pub topics: Vec<String>,
    /// Labels of the instances hosting any version.
    pub instances: Vec<String>,
}

impl JsonTool {
    /// Resolves a tool's topics and instances against `catalog`.
    pub fn new(tool: &Tool, catalog: &Catalog) -> Self {
        Self {
            name: tool.name.clone(),
            display_name: tool.display_name.clone(),
            description: tool.description.clone(),
            topics: catalog
                .tool_topics(tool)
                .into_iter()
                .map(|t| t.label.clone())
                .collect(),
            instances: catalog
                .tool_instances(tool)
                .into_iter()
                .map(|i| i.label().to_string())
                .collect(),
        }
    }
}

/// An instance with its tool count, for JSON output.
#[derive(Serialize)]
pub struct JsonInstance<'a> {
    /// Instance record.
    #[serde(flatten)]
    pub instance: &'a Instance,
    /// Distinct tools hosted.
    pub tool_count: usize,
}
