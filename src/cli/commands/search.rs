//! facetq search - Run a query string against the search index

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::{parse_params, unknown_parameter_warnings};
use crate::cli::output::{HumanLayout, emit_human, emit_json, json_ok};
use crate::error::Result;
use crate::search::{HttpQueryExecutor, ProductSearch};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// URL query string, e.g. "includeLocationId=nl&sortBy=recent"
    pub query: String,

    /// Also print facet counts
    #[arg(long)]
    pub facets: bool,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let params = parse_params(&args.query)?;
    let lookup = ctx.lookup()?;
    let executor = HttpQueryExecutor::from_config(&ctx.config.search)?;
    let outcome = ProductSearch::new(&ctx.config.search, &lookup)
        .with_registry(ctx.registry)
        .run(&params, &executor)?;

    if ctx.json {
        return emit_json(&json_ok(&outcome).with_warnings(unknown_parameter_warnings(&params)));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("{} of {} products", outcome.ids.len(), outcome.total_hits))
        .kv("index", &outcome.index);
    if outcome.ids.is_empty() {
        layout.push_line("No products found".dimmed().to_string());
    }
    for (rank, id) in outcome.ids.iter().enumerate() {
        layout.push_line(format!("{:>4}. {id}", rank + 1 + outcome.document.offset as usize));
    }

    if args.facets && !outcome.facets.is_empty() {
        layout.blank().section("Facets");
        for (parameter, counts) in &outcome.facets {
            let values: Vec<String> = counts
                .iter()
                .map(|(value, count)| format!("{value} ({count})"))
                .collect();
            layout.kv(parameter, &values.join(", "));
        }
    }
    emit_human(layout);
    Ok(())
}
