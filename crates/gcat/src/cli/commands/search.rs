//! Implementation of `gcat search`.

use std::process::ExitCode;

use comfy_table::Cell;
use gcat_catalog::{Catalog, Evaluator, Predicate, QueryPlan, search};
use gcat_query::parse;
use serde::Serialize;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{JsonTool, dim, print_json, subheader, table},
};

/// JSON output for `gcat search --json`.
#[derive(Serialize)]
struct JsonSearchOutput {
    /// The query as entered.
    query: String,
    /// Matches before the limit was applied.
    total_matches: usize,
    /// Matching tools, up to the limit.
    results: Vec<JsonTool>,
}

/// Searches the catalog and prints matching tools.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let query = cmd.query.join(" ");
    let catalog = match ctx.load_catalog() {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    if cmd.explain {
        return explain(ctx, &catalog, &query);
    }

    let mut tools = match search(&query, &catalog, ctx.evaluate_options()) {
        Ok(tools) => tools,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let total_matches = tools.len();
    tools.truncate(cmd.limit.unwrap_or(ctx.config.settings.default_limit));

    if cmd.json {
        return print_json(&JsonSearchOutput {
            query,
            total_matches,
            results: tools.iter().map(|t| JsonTool::new(t, &catalog)).collect(),
        });
    }

    if tools.is_empty() {
        println!("{}", dim("No tools found."));
        return ExitCode::SUCCESS;
    }

    let mut results = table(["Tool", "Name", "Description", "Instances"]);
    for tool in &tools {
        results.add_row(vec![
            Cell::new(&tool.name),
            Cell::new(&tool.display_name),
            Cell::new(&tool.description),
            Cell::new(catalog.tool_instances(tool).len()),
        ]);
    }
    println!("{results}");

    if total_matches > tools.len() {
        println!(
            "{}",
            dim(&format!(
                "Showing {} of {total_matches} tools; use -n to see more.",
                tools.len()
            ))
        );
    }
    ExitCode::SUCCESS
}

/// Prints the parsed query and how each filter resolved, without running it.
fn explain(ctx: &CommandContext, catalog: &Catalog, query: &str) -> ExitCode {
    println!("{}", subheader("Query:"));
    println!("   {query}");
    println!();

    let parsed = match parse(query) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", subheader("Parsed:"));
    if parsed.is_empty() {
        println!("   {}", dim("(empty query)"));
    }
    for line in parsed.to_string().lines() {
        println!("   {line}");
    }
    println!();

    println!("{}", subheader("Plan:"));
    match Evaluator::new(catalog, ctx.evaluate_options()).plan(&parsed) {
        Ok(plan) => print_plan(catalog, &plan),
        Err(reason) => println!("   {}", dim(&format!("matches nothing: {reason}"))),
    }
    ExitCode::SUCCESS
}

/// Prints each condition of a resolved plan.
fn print_plan(catalog: &Catalog, plan: &QueryPlan) {
    for predicate in &plan.predicates {
        match predicate {
            Predicate::TextContains(text) => println!("   text contains {text:?}"),
            Predicate::HasTopic(id) => {
                let label = catalog.topic(*id).map_or("?", |t| t.label.as_str());
                println!("   has topic {label:?} (#{id})");
            }
        }
    }
    if !plan.required_instances.is_empty() {
        let labels: Vec<_> = plan
            .required_instances
            .iter()
            .filter_map(|id| catalog.instance(*id))
            .map(|i| i.label())
            .collect();
        println!("   one version hosted on all of: {}", labels.join(", "));
    }
    if plan.predicates.is_empty() && plan.required_instances.is_empty() {
        println!("   {}", dim("(matches every tool)"));
    }
}
