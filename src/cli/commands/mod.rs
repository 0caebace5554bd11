//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;
use crate::search::RequestParams;

pub mod expand;
pub mod import;
pub mod query;
pub mod search;
pub mod validate;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Query(args) => query::run(ctx, args),
        Commands::Expand(args) => expand::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::Import(args) => import::run(ctx, args),
    }
}

/// Parse a query string and log parameters nothing understands.
pub(crate) fn parse_params(query: &str) -> Result<RequestParams> {
    let params = RequestParams::parse_query(query)?;
    for (key, suggestions) in params.unknown_key_suggestions() {
        tracing::warn!(parameter = %key, ?suggestions, "Ignoring unknown parameter");
    }
    Ok(params)
}

/// Human-readable "did you mean" lines for unknown parameters.
pub(crate) fn unknown_parameter_warnings(params: &RequestParams) -> Vec<String> {
    params
        .unknown_key_suggestions()
        .into_iter()
        .map(|(key, suggestions)| {
            if suggestions.is_empty() {
                format!("unknown parameter '{key}' is ignored")
            } else {
                format!(
                    "unknown parameter '{key}' is ignored; did you mean: {}?",
                    suggestions.join(", ")
                )
            }
        })
        .collect()
}
