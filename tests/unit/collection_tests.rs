use std::collections::BTreeSet;

use facetq::hierarchy::Hierarchies;
use facetq::search::{
    FacetFilterCollection, FacetFilterKind, FilterRegistry, GroupKind, Pagination, RequestParams,
    scores,
};
use facetq::test_utils::fixtures::sample_hierarchies;

fn build_with(params: &RequestParams, lookup: &Hierarchies) -> FacetFilterCollection {
    FacetFilterCollection::build(params, FilterRegistry::Products, lookup, Pagination::default())
        .unwrap()
}

fn build(query: &str) -> FacetFilterCollection {
    build_with(&RequestParams::parse_query(query).unwrap(), &sample_hierarchies())
}

fn groups(collection: &FacetFilterCollection) -> BTreeSet<GroupKind> {
    collection.active_group_kinds()
}

#[test]
fn test_build_is_idempotent() {
    let lookup = sample_hierarchies();
    let params = RequestParams::parse_query(
        "jobFunctionId=2&includeLocationId=nl,berlin&industryId=7&priceTo=500&seniorityId=3",
    )
    .unwrap();

    let first = build_with(&params, &lookup);
    let second = build_with(&params, &lookup);
    assert_eq!(first.expression(), second.expression());
    assert_eq!(first.query(), second.query());
}

#[test]
fn test_job_function_alone_never_fires_location_group() {
    let collection = build("jobFunctionId=2");
    assert!(!groups(&collection).contains(&GroupKind::JobFunctionAndLocation));
    assert!(!groups(&collection).contains(&GroupKind::JobFunctionIndustryAndLocation));
}

#[test]
fn test_exact_location_only_excludes_generic_and_international() {
    let collection = build("exactLocationId=amsterdam");
    assert!(!groups(&collection).contains(&GroupKind::GenericAndInternational));
}

#[test]
fn test_job_function_and_location_groups() {
    let collection = build("jobFunctionId=2&includeLocationId=nl");
    let active = groups(&collection);
    assert!(!active.contains(&GroupKind::InternationalAndFunction));
    assert!(active.contains(&GroupKind::JobFunctionAndLocation));
}

#[test]
fn test_job_function_only_activates_international_group() {
    let collection = build("jobFunctionId=2");
    assert!(groups(&collection).contains(&GroupKind::InternationalAndFunction));
}

#[test]
fn test_name_excludes_every_group() {
    let collection = build("jobFunctionId=2&includeLocationId=nl&industryId=7&name=monster");
    assert!(collection.active_groups().is_empty());
    assert!(!collection.is_empty());
    assert_eq!(collection.query().query.as_deref(), Some("monster"));
}

#[test]
fn test_exact_location_outranks_industry() {
    assert!(scores::EXACT_LOCATION > scores::INDUSTRY);
    let collection = build("exactLocationId=amsterdam&industryId=7");
    let exact = collection.filter(FacetFilterKind::ExactLocation).unwrap();
    let industry = collection.filter(FacetFilterKind::Industry).unwrap();
    assert!(exact.spec().score > industry.spec().score);
}

#[test]
fn test_function_industry_location_request() {
    let collection = build("jobFunctionId=2&includeLocationId=nl&industryId=7");
    let expression = collection.expression();

    for kind in [
        FacetFilterKind::InclusiveJobFunctionChildren,
        FacetFilterKind::InclusiveLocation,
        FacetFilterKind::Industry,
    ] {
        let fragment = collection.filter(kind).unwrap().fragment();
        assert!(!fragment.is_empty(), "{kind} rendered nothing");
        assert!(expression.contains(fragment), "{kind} missing from expression");
    }

    let expected: BTreeSet<GroupKind> = [
        GroupKind::JobFunctionIndustryAndLocation,
        GroupKind::JobFunctionAndLocation,
        GroupKind::GenericAndLocation,
        GroupKind::IndustryAndLocation,
        GroupKind::GenericAndInternational,
    ]
    .into_iter()
    .collect();
    assert_eq!(groups(&collection), expected);

    let group_clause = format!(
        "({})",
        collection
            .active_groups()
            .iter()
            .map(|group| group.fragment())
            .collect::<Vec<_>>()
            .join(" OR ")
    );
    assert!(expression.ends_with(&group_clause));
    assert!(group_clause.contains(
        "searchable_jobfunctions_industries_locations_combinations:\"2_7_nl\"<score=1000>"
    ));
}

#[test]
fn test_empty_request() {
    let collection = build("");
    assert!(collection.is_empty());
    assert_eq!(collection.query().filters, "");
    assert!(collection.active_groups().is_empty());
}

#[test]
fn test_unknown_ids_expand_to_nothing() {
    let collection = build("includeLocationId=atlantis&jobFunctionId=999");
    let location = collection.filter(FacetFilterKind::InclusiveLocation).unwrap();
    assert!(location.is_empty());
    // the exact job function filter still matches the literal id
    assert!(
        collection
            .expression()
            .contains("searchable_job_functions_ids:\"999\"<score=250>")
    );
    assert!(!groups(&collection).contains(&GroupKind::JobFunctionAndLocation));
}

#[test]
fn test_job_title_resolves_through_function() {
    let collection = build("jobTitleId=100");
    let inclusive = collection
        .filter(FacetFilterKind::InclusiveJobFunctionChildren)
        .unwrap();
    assert_eq!(inclusive.values(), ["1", "2", "3"]);
    assert!(collection.filter(FacetFilterKind::JobFunction).unwrap().is_empty());
    assert!(groups(&collection).contains(&GroupKind::InternationalAndFunction));
}

#[test]
fn test_job_function_group_with_exact_match_parameter() {
    let collection = build("jobFunctionId=3&seniorityId=2");
    let active = groups(&collection);
    assert!(active.contains(&GroupKind::JobFunction));
    assert!(!active.contains(&GroupKind::InternationalAndFunction));
    assert!(!active.contains(&GroupKind::GenericAndInternational));
    assert!(collection.expression().contains("(seniority_level:\"2\"<score=1>)"));
}

#[test]
fn test_comma_only_name_is_not_free_text() {
    let collection = build("name=,&industryId=7");
    assert_eq!(collection.query().query, None);
    assert!(groups(&collection).contains(&GroupKind::IndustryAndInternational));
}
