//! Property-based tests for the filter compiler and hierarchies.

use std::collections::BTreeSet;

use facetq::hierarchy::{LocationHierarchy, LocationNode};
use facetq::search::{
    FacetFilterCollection, FilterRegistry, Pagination, RequestParams, scores,
};
use facetq::test_utils::fixtures::sample_hierarchies;
use proptest::prelude::*;

const LOCATIONS: [&str; 7] = ["europe", "nl", "amsterdam", "utrecht", "de", "berlin", "atlantis"];

fn id_list(pool: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::subsequence(pool.to_vec(), 1..=3).prop_map(|ids| ids.join(",")))
}

fn int_list(max: u32) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(
        proptest::collection::vec(0..=max, 1..=3)
            .prop_map(|ids| ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")),
    )
}

/// Valid request parameters drawn from the sample hierarchy.
fn request() -> impl Strategy<Value = RequestParams> {
    (
        id_list(&LOCATIONS),
        id_list(&LOCATIONS),
        int_list(12),
        int_list(12),
        int_list(5),
        proptest::option::of(0u32..500),
        proptest::option::of(Just("monster".to_string())),
        proptest::option::of(proptest::sample::select(vec!["acme", "globex"])),
    )
        .prop_map(
            |(include, exact, industry, job_function, seniority, price_to, name, customer)| {
                let mut params = RequestParams::new();
                let pairs = [
                    ("includeLocationId", include),
                    ("exactLocationId", exact),
                    ("industryId", industry),
                    ("jobFunctionId", job_function),
                    ("seniorityId", seniority),
                    ("priceTo", price_to.map(|v| v.to_string())),
                    ("name", name),
                    ("customerId", customer.map(str::to_string)),
                ];
                for (key, value) in pairs {
                    if let Some(value) = value {
                        params.insert(key, value);
                    }
                }
                params
            },
        )
}

fn build(params: &RequestParams) -> FacetFilterCollection {
    FacetFilterCollection::build(
        params,
        FilterRegistry::Products,
        &sample_hierarchies(),
        Pagination::default(),
    )
    .unwrap()
}

/// Every `<score=N>` annotation in an expression.
fn rendered_scores(expression: &str) -> Vec<u32> {
    expression
        .split("<score=")
        .skip(1)
        .filter_map(|rest| rest.split('>').next()?.parse().ok())
        .collect()
}

proptest! {
    #[test]
    fn build_is_idempotent(params in request()) {
        let first = build(&params);
        let second = build(&params);
        prop_assert_eq!(first.expression(), second.expression());
        prop_assert_eq!(first.query(), second.query());
    }

    #[test]
    fn empty_exactly_when_no_filtering_parameter(params in request()) {
        let collection = build(&params);
        prop_assert_eq!(collection.is_empty(), params.present_keys().is_empty());
        if collection.is_empty() {
            prop_assert!(collection.active_groups().is_empty());
        }
    }

    #[test]
    fn name_disables_every_group(params in request()) {
        let collection = build(&params);
        if params.name().is_some() {
            prop_assert!(collection.active_groups().is_empty());
        }
    }

    #[test]
    fn scores_come_from_the_score_tables(params in request()) {
        let known: BTreeSet<u32> = [
            scores::EXACT_LOCATION,
            scores::INCLUSIVE_LOCATION,
            scores::JOB_FUNCTION,
            scores::PRIMARY_SIMILARWEB_LOCATION,
            scores::DESCENDANT_JOB_FUNCTIONS,
            scores::IS_GENERIC,
            scores::IS_INTERNATIONAL,
            scores::SECONDARY_SIMILARWEB_LOCATION,
            scores::INDUSTRY,
            scores::CATEGORICAL,
            scores::UNSCORED,
        ]
        .into_iter()
        .chain(scores::GROUP_TIERS.iter().map(|(_, score)| *score))
        .collect();

        let collection = build(&params);
        for score in rendered_scores(collection.expression()) {
            prop_assert!(known.contains(&score), "unexpected score {}", score);
        }
    }

    #[test]
    fn ancestor_closure_of_any_chain(depth in 1usize..40) {
        let mut nodes = vec![LocationNode::new("n0", None)];
        for i in 1..depth {
            let parent = format!("n{}", i - 1);
            nodes.push(LocationNode::new(format!("n{i}"), Some(parent.as_str())));
        }
        let hierarchy = LocationHierarchy::new(nodes).unwrap();

        let leaf = format!("n{}", depth - 1);
        let context = hierarchy.list_context_locations_ids(&[leaf]);
        let expected: BTreeSet<String> = (0..depth).map(|i| format!("n{i}")).collect();
        prop_assert_eq!(context, expected);
    }

    #[test]
    fn exact_location_always_outranks_industry(location in proptest::sample::select(LOCATIONS.to_vec()), industry in 0u32..50) {
        let params = RequestParams::new()
            .with("exactLocationId", location)
            .with("industryId", industry.to_string());
        let expression = build(&params).expression().to_string();
        let exact = format!("searchable_locations_ids:\"{location}\"<score={}>", scores::EXACT_LOCATION);
        let industry = format!("searchable_industries_ids:\"{industry}\"<score={}>", scores::INDUSTRY);
        prop_assert!(expression.contains(&exact));
        prop_assert!(expression.contains(&industry));
        prop_assert!(scores::EXACT_LOCATION > scores::INDUSTRY);
    }
}
