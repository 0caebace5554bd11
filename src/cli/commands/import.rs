//! facetq import - Load a JSON hierarchy file into the hierarchy store

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, json_ok};
use crate::error::{FacetError, Result};
use crate::hierarchy::HierarchyData;
use crate::storage::{HierarchyCounts, ImportRecord};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file with `locations`, `job_functions` and `job_titles` arrays
    pub file: PathBuf,

    /// Validate the file without writing to the store
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct ImportReport {
    dry_run: bool,
    database: String,
    counts: HierarchyCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    import: Option<ImportRecord>,
}

pub fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            FacetError::NotFound(format!("hierarchy file {}", args.file.display()))
        } else {
            FacetError::Io(err)
        }
    })?;
    let data: HierarchyData = serde_json::from_str(&raw)?;

    // Reject cycles and dangling parents before touching the store.
    data.clone()
        .into_hierarchies(ctx.config.hierarchy.only_associated_to_products)?;

    let counts = HierarchyCounts {
        locations: data.locations.len() as u64,
        job_functions: data.job_functions.len() as u64,
        job_titles: data.job_titles.len() as u64,
    };
    let database = ctx.database_path();

    let import = if args.dry_run {
        None
    } else {
        let mut db = ctx.open_database()?;
        Some(db.replace_hierarchy(&data, &args.file.display().to_string())?)
    };

    let report = ImportReport {
        dry_run: args.dry_run,
        database: database.display().to_string(),
        counts,
        import,
    };

    if ctx.json {
        return emit_json(&json_ok(report));
    }

    let verb = if args.dry_run { "Validated" } else { "Imported" };
    println!(
        "{} {} {} locations, {} job functions, {} job titles",
        "✓".green(),
        verb,
        report.counts.locations,
        report.counts.job_functions,
        report.counts.job_titles
    );
    if !args.dry_run {
        println!("  into {}", report.database.dimmed());
    }
    Ok(())
}
