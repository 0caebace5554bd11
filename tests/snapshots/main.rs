//! Snapshot tests for rendered expressions, documents and error messages.

use facetq::search::{
    FacetFilterCollection, FilterRegistry, GroupKind, Pagination, RequestParams,
};
use facetq::test_utils::fixtures::sample_hierarchies;
use insta::assert_snapshot;

fn build(query: &str) -> FacetFilterCollection {
    FacetFilterCollection::build(
        &RequestParams::parse_query(query).unwrap(),
        FilterRegistry::Products,
        &sample_hierarchies(),
        Pagination::default(),
    )
    .unwrap()
}

fn build_err(query: &str) -> String {
    FacetFilterCollection::build(
        &RequestParams::parse_query(query).unwrap(),
        FilterRegistry::Products,
        &sample_hierarchies(),
        Pagination::default(),
    )
    .unwrap_err()
    .to_string()
}

/// One clause per line so diffs stay readable.
fn clauses(expression: &str) -> String {
    expression.split(" AND ").collect::<Vec<_>>().join("\nAND ")
}

#[test]
fn test_exact_location_expression() {
    let collection = build("exactLocationId=amsterdam");
    assert_snapshot!(clauses(collection.expression()), @r#"
    (is_active:true)
    AND (filterable_status:"Active")
    AND (searchable_locations_ids:"amsterdam"<score=1000>)
    AND (is_product:true)
    AND (is_generic:"True"<score=83> OR is_international:"True"<score=80>)
    "#);
}

#[test]
fn test_range_and_channel_expression() {
    let collection = build("durationFrom=30&priceTo=900&channelType=job+board");
    assert_snapshot!(clauses(collection.expression()), @r#"
    (is_active:true)
    AND (filterable_status:"Active")
    AND (duration_days>=30)
    AND (list_price<=900)
    AND (channel_type:"job board"<score=0>)
    AND (is_product:true)
    AND (is_generic:"True"<score=83> OR is_international:"True"<score=80>)
    AND (searchable_isgeneric_isinternational:"True_True"<score=20>)
    "#);
}

#[test]
fn test_job_function_and_location_group_fragment() {
    let collection = build("jobFunctionId=3&includeLocationId=amsterdam");
    let group = collection
        .active_groups()
        .iter()
        .find(|group| group.kind() == GroupKind::JobFunctionAndLocation)
        .unwrap();
    assert_snapshot!(group.tuples().join("\n"), @r"
    1_amsterdam
    1_europe
    1_nl
    2_amsterdam
    2_europe
    2_nl
    3_amsterdam
    3_europe
    3_nl
    ");
}

#[test]
fn test_empty_query_document() {
    let document = serde_json::to_string_pretty(&build("").query()).unwrap();
    assert_snapshot!(document, @r#"
    {
      "getRankingInfo": true,
      "analytics": true,
      "enableABTest": false,
      "attributesToRetrieve": [
        "id"
      ],
      "attributesToSnippet": [
        "*:20"
      ],
      "snippetEllipsisText": "…",
      "responseFields": [
        "*"
      ],
      "facets": [
        "searchable_industries_ids",
        "searchable_job_functions_ids",
        "searchable_job_titles_ids",
        "searchable_locations_ids",
        "searchable_locations_names",
        "searchable_locations_names_nl",
        "searchable_locations_names_de",
        "category_ids",
        "order_frequency",
        "channel_type"
      ],
      "filters": "",
      "sumOrFiltersScores": false,
      "length": 50,
      "offset": 0
    }
    "#);
}

#[test]
fn test_invalid_integer_message() {
    assert_snapshot!(
        build_err("industryId=abc"),
        @r#"Invalid value "abc" for parameter 'industryId': expected a non-negative integer"#
    );
}

#[test]
fn test_conflict_message() {
    assert_snapshot!(
        build_err("jobTitleId=100&jobFunctionId=2"),
        @"Parameters 'jobTitleId' and 'jobFunctionId' cannot be used together"
    );
}

#[test]
fn test_range_multiple_values_message() {
    assert_snapshot!(
        build_err("priceTo=10,20"),
        @r#"Invalid value "10,20" for parameter 'priceTo': expected a single value"#
    );
}

#[test]
fn test_pagination_message() {
    let err = RequestParams::new()
        .with("limit", "0")
        .pagination(50, 1000)
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"Invalid pagination: limit must be between 1 and 1000, got 0");
}
