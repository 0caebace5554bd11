//! Composite filters over combination fields.
//!
//! A group ANDs 1–3 single-field filters by matching on a synthetic index
//! field that stores every combination of their values. Activation needs
//! values for every member filter plus the group's inclusion predicate over
//! the present request keys.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::facet_filters::{FacetFilterInstance, FacetFilterKind};
use super::params::EXACT_MATCH_PARAMETERS;
use super::scores;

/// Joins the values of one tuple inside a combination field.
pub const GROUP_VALUE_SEPARATOR: &str = "_";

/// Inclusion rule over the set of present request keys.
pub type GroupPredicate = fn(&BTreeSet<&str>) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    JobFunctionIndustryAndLocation,
    JobFunctionAndLocation,
    GenericAndLocation,
    InternationalAndFunction,
    JobFunction,
    IndustryAndLocation,
    IndustryAndInternational,
    GenericAndInternational,
}

impl GroupKind {
    pub const ALL: [Self; 8] = [
        Self::JobFunctionIndustryAndLocation,
        Self::JobFunctionAndLocation,
        Self::GenericAndLocation,
        Self::InternationalAndFunction,
        Self::JobFunction,
        Self::IndustryAndLocation,
        Self::IndustryAndInternational,
        Self::GenericAndInternational,
    ];

    pub fn spec(self) -> &'static FacetFilterGroupSpec {
        &GROUP_SPECS[self as usize]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JobFunctionIndustryAndLocation => "job_function_industry_and_location",
            Self::JobFunctionAndLocation => "job_function_and_location",
            Self::GenericAndLocation => "generic_and_location",
            Self::InternationalAndFunction => "international_and_function",
            Self::JobFunction => "job_function",
            Self::IndustryAndLocation => "industry_and_location",
            Self::IndustryAndInternational => "industry_and_international",
            Self::GenericAndInternational => "generic_and_international",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FacetFilterGroupSpec {
    pub kind: GroupKind,
    /// Combination field the tuples are matched on.
    pub field_name: &'static str,
    /// Member filters, in tuple order.
    pub filters: &'static [FacetFilterKind],
    pub score: u32,
    pub predicate: GroupPredicate,
}

impl FacetFilterGroupSpec {
    /// No group applies to free-text searches; otherwise the group's own rule
    /// decides.
    pub fn can_be_included(&self, present_keys: &BTreeSet<&str>) -> bool {
        !present_keys.contains("name") && (self.predicate)(present_keys)
    }

    /// Try to activate this group against the filters built for a request.
    ///
    /// Returns `None` when a member filter is missing from `context`, resolved
    /// no values, or the inclusion predicate rejects the present keys.
    pub fn activate(
        &'static self,
        present_keys: &BTreeSet<&str>,
        context: &[FacetFilterInstance],
    ) -> Option<FacetFilterGroupInstance> {
        let mut value_sets: Vec<&[String]> = Vec::with_capacity(self.filters.len());
        for kind in self.filters {
            let values = context
                .iter()
                .find(|instance| instance.kind() == *kind)
                .map(FacetFilterInstance::values)
                .unwrap_or_default();
            if values.is_empty() {
                debug!(group = %self.kind, filter = %kind, "Group skipped: member filter has no values");
                return None;
            }
            value_sets.push(values);
        }

        if !self.can_be_included(present_keys) {
            debug!(group = %self.kind, ?present_keys, "Group skipped: excluded by parameters");
            return None;
        }

        let tuples: Vec<String> = value_sets
            .iter()
            .map(|values| values.iter())
            .multi_cartesian_product()
            .map(|tuple| tuple.into_iter().join(GROUP_VALUE_SEPARATOR))
            .collect();
        let fragment = tuples
            .iter()
            .map(|tuple| format!("{}:\"{tuple}\"<score={}>", self.field_name, self.score))
            .join(" OR ");

        debug!(group = %self.kind, tuples = tuples.len(), "Group activated");
        Some(FacetFilterGroupInstance {
            spec: self,
            tuples,
            fragment,
        })
    }
}

/// An activated group.
#[derive(Debug, Clone)]
pub struct FacetFilterGroupInstance {
    spec: &'static FacetFilterGroupSpec,
    tuples: Vec<String>,
    fragment: String,
}

impl FacetFilterGroupInstance {
    pub const fn spec(&self) -> &'static FacetFilterGroupSpec {
        self.spec
    }

    pub const fn kind(&self) -> GroupKind {
        self.spec.kind
    }

    /// Joined value tuples, one per scored term.
    pub fn tuples(&self) -> &[String] {
        &self.tuples
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

// =============================================================================
// Inclusion predicates
// =============================================================================

fn always(_: &BTreeSet<&str>) -> bool {
    true
}

fn without_exact_location(keys: &BTreeSet<&str>) -> bool {
    !keys.contains("exactLocationId")
}

fn only_job_function_keys(keys: &BTreeSet<&str>) -> bool {
    keys.iter()
        .all(|key| matches!(*key, "jobFunctionId" | "jobTitleId"))
}

fn has_exact_match_key(keys: &BTreeSet<&str>) -> bool {
    EXACT_MATCH_PARAMETERS.iter().any(|key| keys.contains(key))
}

fn job_function_with_exact_match(keys: &BTreeSet<&str>) -> bool {
    keys.contains("jobFunctionId") && has_exact_match_key(keys) && !only_job_function_keys(keys)
}

fn without_job_function(keys: &BTreeSet<&str>) -> bool {
    !keys.contains("jobFunctionId") && !keys.contains("jobTitleId")
}

fn generic_and_international(keys: &BTreeSet<&str>) -> bool {
    const EXCLUDED_SETS: [&[&str]; 3] = [
        &["exactLocationId"],
        &["exactLocationId", "name"],
        &["exactLocationId", "includeLocationId"],
    ];
    let is_excluded_set = EXCLUDED_SETS
        .iter()
        .any(|set| set.len() == keys.len() && set.iter().all(|key| keys.contains(key)));

    !is_excluded_set && !keys.contains("customerId") && !has_exact_match_key(keys)
}

// =============================================================================
// Registry table
// =============================================================================

/// Indexed by `GroupKind as usize`.
static GROUP_SPECS: [FacetFilterGroupSpec; 8] = [
    FacetFilterGroupSpec {
        kind: GroupKind::JobFunctionIndustryAndLocation,
        field_name: "searchable_jobfunctions_industries_locations_combinations",
        filters: &[
            FacetFilterKind::InclusiveJobFunctionChildren,
            FacetFilterKind::Industry,
            FacetFilterKind::InclusiveLocation,
        ],
        score: scores::JOBFUNCTION_INDUSTRY_AND_LOCATION,
        predicate: always,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::JobFunctionAndLocation,
        field_name: "searchable_jobfunctions_locations_combinations",
        filters: &[
            FacetFilterKind::InclusiveJobFunctionChildren,
            FacetFilterKind::InclusiveLocation,
        ],
        score: scores::JOBFUNCTION_AND_LOCATION,
        predicate: always,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::GenericAndLocation,
        field_name: "searchable_isgeneric_locations_combinations",
        filters: &[FacetFilterKind::IsGeneric, FacetFilterKind::InclusiveLocation],
        score: scores::GENERIC_AND_LOCATION,
        predicate: without_exact_location,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::InternationalAndFunction,
        field_name: "searchable_isinternational_jobfunctions_combinations",
        filters: &[
            FacetFilterKind::IsInternational,
            FacetFilterKind::InclusiveJobFunctionChildren,
        ],
        score: scores::JOBFUNCTION_AND_INTERNATIONAL,
        predicate: only_job_function_keys,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::JobFunction,
        field_name: "searchable_job_functions_ids",
        filters: &[FacetFilterKind::InclusiveJobFunctionChildren],
        score: scores::DESCENDANT_JOB_FUNCTIONS,
        predicate: job_function_with_exact_match,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::IndustryAndLocation,
        field_name: "searchable_industries_locations_combinations",
        filters: &[FacetFilterKind::Industry, FacetFilterKind::InclusiveLocation],
        score: scores::INDUSTRY_AND_LOCATION,
        predicate: always,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::IndustryAndInternational,
        field_name: "searchable_industries_isinternational_combinations",
        filters: &[FacetFilterKind::Industry, FacetFilterKind::IsInternational],
        score: scores::INDUSTRY_AND_INTERNATIONAL,
        predicate: without_job_function,
    },
    FacetFilterGroupSpec {
        kind: GroupKind::GenericAndInternational,
        field_name: "searchable_isgeneric_isinternational",
        filters: &[FacetFilterKind::IsGeneric, FacetFilterKind::IsInternational],
        score: scores::GENERIC_AND_INTERNATIONAL,
        predicate: generic_and_international,
    },
];
