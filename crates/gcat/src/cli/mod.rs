//! CLI support for the `gcat` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;

pub use context::CommandContext;
