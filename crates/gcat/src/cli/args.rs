//! Clap argument definitions for the `gcat` CLI.

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "gcat", version)]
#[command(about = "Galaxy tool catalog - find which servers host which tools")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `gcat search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query words, joined with spaces
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Maximum tools to print [default: from config, 50]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show the parsed query and resolved filters without searching
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `gcat add-instance`.
#[derive(Args, Debug, Clone)]
pub struct AddInstanceCommand {
    /// Base URL of the Galaxy server, e.g. https://usegalaxy.eu
    pub url: String,
}

/// Arguments for `gcat instances`.
#[derive(Args, Debug, Clone)]
pub struct InstancesCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `gcat show`.
#[derive(Args, Debug, Clone)]
pub struct ShowCommand {
    /// Tool name, e.g. bwa_mem
    pub tool: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `gcat init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.gcat.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `gcat` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog for tools
    #[command(after_help = "\
QUERY SYNTAX:
  word              Name, description, or display name contains the word
  \"phrase\"          Quoted text matched as-is; \\\" escapes a quote
  topic:LABEL       Tool is annotated with the topic
  instance:BRAND    One version of the tool is hosted on the instance
  field:\"a b\"       Quoted filter values may contain spaces

All parts must match.

EXAMPLES:
  gcat search bwa
  gcat search 'topic:operation_3198 instance:Europe'
  gcat search '\"samtools view\" instance:\"Galaxy Australia\"'")]
    Search(SearchCommand),

    /// Register a Galaxy server and ingest its tools
    AddInstance(AddInstanceCommand),

    /// Re-poll every registered server
    Update,

    /// List registered servers
    Instances(InstancesCommand),

    /// Show a tool's versions, servers, and topics
    Show(ShowCommand),

    /// Initialize gcat configuration in current directory
    Init(InitCommand),

    /// Show configuration and catalog statistics
    Status,
}
