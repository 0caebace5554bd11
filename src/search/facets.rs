//! Facet fields requested from the index and the re-keying of their counts.

use std::collections::BTreeMap;

use super::facet_filters::{FacetFilterKind, Render};

/// Counts per facet value, per facet.
pub type FacetCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// Facets requested with every query; counts come back sorted by frequency.
pub const FACET_FIELDS: [&str; 10] = [
    "searchable_industries_ids",
    "searchable_job_functions_ids",
    "searchable_job_titles_ids",
    "searchable_locations_ids",
    "searchable_locations_names",
    "searchable_locations_names_nl",
    "searchable_locations_names_de",
    "category_ids",
    "order_frequency",
    "channel_type",
];

/// Request parameter that filters on `field`, if any.
///
/// When several filters share a field, the first registered term filter
/// wins.
pub fn parameter_for_field(field: &str) -> Option<&'static str> {
    FacetFilterKind::ALL
        .iter()
        .map(|kind| kind.spec())
        .filter(|spec| spec.render == Render::Terms)
        .find(|spec| spec.field_name == field)
        .and_then(|spec| spec.parameter_name)
}

/// Re-key facet counts from index field names to request parameter names.
///
/// Fields no filter reads keep their index name.
pub fn convert_facet_payload(facets: FacetCounts) -> FacetCounts {
    facets
        .into_iter()
        .map(|(field, counts)| {
            let key = parameter_for_field(&field).map_or(field, str::to_string);
            (key, counts)
        })
        .collect()
}
