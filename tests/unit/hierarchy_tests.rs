use std::collections::BTreeSet;

use facetq::FacetError;
use facetq::hierarchy::{
    CachedLookup, HierarchyData, HierarchyLookup, JobFunctionHierarchy, JobFunctionNode,
    LocationHierarchy, LocationNode,
};
use facetq::test_utils::fixtures::{sample_hierarchies, synthetic_hierarchy_data};

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[test]
fn test_ancestor_closure_of_chain() {
    let hierarchy = LocationHierarchy::new(vec![
        LocationNode::new("root", None),
        LocationNode::new("c", Some("root")),
        LocationNode::new("b", Some("c")),
        LocationNode::new("a", Some("b")),
    ])
    .unwrap();

    assert_eq!(
        hierarchy.list_context_locations_ids(&["a".to_string()]),
        set(&["a", "b", "c", "root"])
    );
}

#[test]
fn test_descendant_pruning() {
    let hierarchy = LocationHierarchy::new(vec![
        LocationNode::new("country", None),
        LocationNode::new("empty-region", Some("country")),
        LocationNode::new("empty-city", Some("empty-region")),
        LocationNode::new("busy-region", Some("country")),
        LocationNode::new("busy-city", Some("busy-region")).with_products(3),
    ])
    .unwrap();
    let ids = ["country".to_string()];

    assert_eq!(
        hierarchy.list_child_locations(&ids, true),
        set(&["busy-city"])
    );
    assert_eq!(
        hierarchy.list_child_locations(&ids, false),
        set(&["empty-region", "empty-city", "busy-region", "busy-city"])
    );
}

#[test]
fn test_job_function_inclusive_set() {
    let hierarchy = JobFunctionHierarchy::new(
        vec![
            JobFunctionNode { id: 1, parent_id: None },
            JobFunctionNode { id: 2, parent_id: Some(1) },
            JobFunctionNode { id: 3, parent_id: Some(2) },
            JobFunctionNode { id: 4, parent_id: Some(1) },
        ],
        Vec::new(),
    )
    .unwrap();

    // siblings of the input are neither ancestors nor descendants
    assert_eq!(
        hierarchy.inclusive_ids(&[2]).into_iter().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_cycle_is_rejected() {
    let data = HierarchyData {
        locations: vec![
            LocationNode::new("a", Some("b")),
            LocationNode::new("b", Some("a")),
        ],
        ..HierarchyData::default()
    };
    let err = data.into_hierarchies(true).unwrap_err();
    assert!(matches!(err, FacetError::HierarchyCycle { .. }));
    assert!(!err.is_client_error());
}

#[test]
fn test_cached_lookup_matches_uncached() {
    let plain = sample_hierarchies();
    let cached = CachedLookup::new(sample_hierarchies(), 16);
    let ids = vec!["nl".to_string(), "berlin".to_string()];

    for _ in 0..3 {
        assert_eq!(cached.inclusive_location_ids(&ids), plain.inclusive_location_ids(&ids));
        assert_eq!(cached.inclusive_job_function_ids(&[2]), plain.inclusive_job_function_ids(&[2]));
    }
    let stats = cached.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 4);
}

#[test]
fn test_synthetic_hierarchy_expansion() {
    let hierarchies = synthetic_hierarchy_data(4, 3).into_hierarchies(true).unwrap();
    // only leaves carry products, so intermediate levels are pruned
    let expanded = hierarchies.inclusive_location_ids(&["root".to_string()]);
    assert_eq!(expanded.len(), 1 + 64);

    let leaf = hierarchies.inclusive_location_ids(&["root.0.0.0".to_string()]);
    assert_eq!(leaf, vec!["root", "root.0", "root.0.0", "root.0.0.0"]);
}
