//! facetq validate - Check a query string without sending it

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::{parse_params, unknown_parameter_warnings};
use crate::cli::output::{emit_json, json_ok};
use crate::error::Result;
use crate::search::{Pagination, ProductSearch};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// URL query string, e.g. "industryId=4&priceTo=500"
    pub query: String,
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    present_keys: Vec<&'static str>,
    index: String,
    pagination: Pagination,
}

/// Invalid parameters surface as the command's error; unknown ones only warn.
pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let params = parse_params(&args.query)?;
    let lookup = ctx.lookup()?;
    let prepared = ProductSearch::new(&ctx.config.search, &lookup)
        .with_registry(ctx.registry)
        .prepare(&params)?;

    let report = ValidationReport {
        valid: true,
        present_keys: params.present_keys().into_iter().collect(),
        index: prepared.index,
        pagination: prepared.collection.pagination(),
    };
    let warnings = unknown_parameter_warnings(&params);

    if ctx.json {
        return emit_json(&json_ok(report).with_warnings(warnings));
    }

    println!("{} query string is valid", "✓".green());
    if report.present_keys.is_empty() {
        println!("  {}", "no filtering parameters".dimmed());
    } else {
        println!("  parameters: {}", report.present_keys.join(", "));
    }
    println!(
        "  index: {}  offset: {}  limit: {}",
        report.index, report.pagination.offset, report.pagination.length
    );
    for warning in warnings {
        println!("{} {warning}", "warning:".yellow());
    }
    Ok(())
}
