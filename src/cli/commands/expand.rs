//! facetq expand - Show how hierarchy ids expand

use std::collections::BTreeSet;

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, json_ok};
use crate::error::{FacetError, Result};
use crate::hierarchy::Hierarchies;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Location ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub location: Vec<String>,

    /// Job function ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub job_function: Vec<i64>,

    /// Job title ids (comma-separated), mapped to their job functions first
    #[arg(long, value_delimiter = ',')]
    pub job_title: Vec<i64>,

    /// Keep descendants without products
    #[arg(long)]
    pub all_descendants: bool,
}

#[derive(Debug, Default, Serialize)]
struct LocationExpansion {
    requested: Vec<String>,
    context: BTreeSet<String>,
    children: BTreeSet<String>,
    inclusive: BTreeSet<String>,
    country_codes: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
struct JobFunctionExpansion {
    requested: Vec<i64>,
    from_titles: BTreeSet<i64>,
    inclusive: BTreeSet<i64>,
}

#[derive(Debug, Serialize)]
struct ExpandReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    locations: Option<LocationExpansion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_functions: Option<JobFunctionExpansion>,
}

pub fn run(ctx: &AppContext, args: &ExpandArgs) -> Result<()> {
    if args.location.is_empty() && args.job_function.is_empty() && args.job_title.is_empty() {
        return Err(FacetError::invalid_parameter(
            "expand",
            "",
            "pass at least one of --location, --job-function or --job-title",
        ));
    }

    let hierarchies = ctx.load_hierarchies()?;
    let only_associated = !args.all_descendants && hierarchies.only_associated_to_products();
    let report = expand(&hierarchies, args, only_associated);

    if ctx.json {
        return emit_json(&json_ok(report));
    }

    let mut layout = HumanLayout::new();
    if let Some(locations) = &report.locations {
        layout
            .section("Locations")
            .kv("requested", &locations.requested.join(", "))
            .kv("ancestors", &join(&locations.context))
            .kv("descendants", &join(&locations.children))
            .kv("inclusive", &join(&locations.inclusive))
            .kv("country codes", &locations.country_codes.join(", "))
            .blank();
    }
    if let Some(job_functions) = &report.job_functions {
        layout.section("Job functions");
        if !job_functions.requested.is_empty() {
            layout.kv(
                "requested",
                &job_functions.requested.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            );
        }
        if !args.job_title.is_empty() {
            layout.kv("from titles", &join(&job_functions.from_titles));
        }
        layout.kv("inclusive", &join(&job_functions.inclusive));
    }
    emit_human(layout);
    Ok(())
}

fn expand(hierarchies: &Hierarchies, args: &ExpandArgs, only_associated: bool) -> ExpandReport {
    let locations = (!args.location.is_empty()).then(|| {
        let ids = &args.location;
        LocationExpansion {
            requested: ids.clone(),
            context: hierarchies.locations.list_context_locations_ids(ids),
            children: hierarchies.locations.list_child_locations(ids, only_associated),
            inclusive: hierarchies.locations.inclusive_ids(ids, only_associated),
            country_codes: hierarchies.locations.country_codes(ids),
        }
    });

    let job_functions = (!args.job_function.is_empty() || !args.job_title.is_empty()).then(|| {
        let from_titles = hierarchies
            .job_functions
            .job_functions_for_titles(&args.job_title);
        let mut seeds = args.job_function.clone();
        seeds.extend(from_titles.iter().copied());
        JobFunctionExpansion {
            requested: args.job_function.clone(),
            inclusive: hierarchies.job_functions.inclusive_ids(&seeds),
            from_titles,
        }
    });

    ExpandReport {
        locations,
        job_functions,
    }
}

fn join<T: ToString>(values: &BTreeSet<T>) -> String {
    if values.is_empty() {
        return "(none)".dimmed().to_string();
    }
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::sample_hierarchies;

    fn args(location: &[&str], job_function: &[i64], job_title: &[i64]) -> ExpandArgs {
        ExpandArgs {
            location: location.iter().map(|id| (*id).to_string()).collect(),
            job_function: job_function.to_vec(),
            job_title: job_title.to_vec(),
            all_descendants: false,
        }
    }

    #[test]
    fn test_expand_locations() {
        let report = expand(&sample_hierarchies(), &args(&["nl"], &[], &[]), true);
        let locations = report.locations.unwrap();
        assert_eq!(locations.inclusive.len(), 3);
        assert!(locations.children.contains("amsterdam"));
        assert!(!locations.children.contains("utrecht"));
        assert_eq!(locations.country_codes, vec!["NL"]);
        assert!(report.job_functions.is_none());
    }

    #[test]
    fn test_expand_without_pruning() {
        let report = expand(&sample_hierarchies(), &args(&["nl"], &[], &[]), false);
        assert!(report.locations.unwrap().children.contains("utrecht"));
    }

    #[test]
    fn test_expand_job_titles() {
        let report = expand(&sample_hierarchies(), &args(&[], &[], &[100]), true);
        let job_functions = report.job_functions.unwrap();
        assert_eq!(job_functions.from_titles.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(
            job_functions.inclusive.iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
