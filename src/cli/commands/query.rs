//! facetq query - Print the query document for a query string

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::{parse_params, unknown_parameter_warnings};
use crate::cli::output::{HumanLayout, emit_human, emit_json, json_ok};
use crate::error::Result;
use crate::search::{GroupKind, ProductSearch, QueryDocument};

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// URL query string, e.g. "jobFunctionId=3&includeLocationId=nl"
    pub query: String,

    /// Print only the document, on a single line
    #[arg(long)]
    pub compact: bool,
}

#[derive(Serialize)]
struct QueryReport {
    index: String,
    registry: String,
    active_groups: Vec<GroupKind>,
    empty: bool,
    document: QueryDocument,
}

pub fn run(ctx: &AppContext, args: &QueryArgs) -> Result<()> {
    let params = parse_params(&args.query)?;
    let lookup = ctx.lookup()?;
    let prepared = ProductSearch::new(&ctx.config.search, &lookup)
        .with_registry(ctx.registry)
        .prepare(&params)?;
    let document = prepared.collection.query();

    if args.compact {
        println!("{}", serde_json::to_string(&document)?);
        return Ok(());
    }

    let report = QueryReport {
        index: prepared.index,
        registry: ctx.registry.to_string(),
        active_groups: prepared.collection.active_group_kinds().into_iter().collect(),
        empty: prepared.collection.is_empty(),
        document,
    };

    if ctx.json {
        return emit_json(&json_ok(report).with_warnings(unknown_parameter_warnings(&params)));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Query document")
        .kv("index", &report.index)
        .kv("registry", &report.registry);
    if report.active_groups.is_empty() {
        layout.kv("groups", &"none".dimmed().to_string());
    } else {
        let groups: Vec<&str> = report.active_groups.iter().map(|g| g.as_str()).collect();
        layout.kv("groups", &groups.join(", "));
    }
    if report.empty {
        layout.kv("filters", &"(empty)".dimmed().to_string());
    }
    for warning in unknown_parameter_warnings(&params) {
        layout.push_line(format!("{} {warning}", "warning:".yellow()));
    }
    layout
        .blank()
        .push_line(serde_json::to_string_pretty(&report.document)?);
    emit_human(layout);
    Ok(())
}
