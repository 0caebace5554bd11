//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// facetq - compile product search parameters into scored filter queries
#[derive(Parser, Debug)]
#[command(name = "facetq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit JSON on stdout (and JSON logs on stderr)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logs except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: <root>/config.toml layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project directory holding config.toml and the hierarchy store
    #[arg(long, global = true, env = "FACETQ_ROOT", default_value = ".facetq")]
    pub root: PathBuf,

    /// Filter registry: products, addons, not_my_own
    #[arg(long, global = true, default_value = "products")]
    pub registry: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the query document for a query string
    Query(commands::query::QueryArgs),

    /// Show how location or job-function ids expand
    Expand(commands::expand::ExpandArgs),

    /// Run a query string against the search index
    Search(commands::search::SearchArgs),

    /// Check a query string without sending it
    Validate(commands::validate::ValidateArgs),

    /// Load a JSON hierarchy file into the hierarchy store
    Import(commands::import::ImportArgs),
}
