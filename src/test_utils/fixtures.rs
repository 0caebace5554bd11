use crate::hierarchy::{Hierarchies, HierarchyData, JobFunctionNode, JobTitle, LocationNode};

/// Locations:
///
/// ```text
/// europe
/// ├── nl (NL)
/// │   ├── amsterdam (NL, 4 products)
/// │   └── utrecht (NL)
/// └── de (DE)
///     └── berlin (DE, 2 products)
/// ```
///
/// Job functions `1 > 2 > {3, 4}` and a lone `10`; titles `100 -> 3`,
/// `101 -> 10`.
pub fn sample_hierarchy_data() -> HierarchyData {
    HierarchyData {
        locations: vec![
            LocationNode::new("europe", None),
            LocationNode::new("nl", Some("europe")).with_country("NL"),
            LocationNode::new("amsterdam", Some("nl"))
                .with_country("NL")
                .with_products(4),
            LocationNode::new("utrecht", Some("nl")).with_country("NL"),
            LocationNode::new("de", Some("europe")).with_country("DE"),
            LocationNode::new("berlin", Some("de"))
                .with_country("DE")
                .with_products(2),
        ],
        job_functions: vec![
            JobFunctionNode { id: 1, parent_id: None },
            JobFunctionNode { id: 2, parent_id: Some(1) },
            JobFunctionNode { id: 3, parent_id: Some(2) },
            JobFunctionNode { id: 4, parent_id: Some(2) },
            JobFunctionNode { id: 10, parent_id: None },
        ],
        job_titles: vec![
            JobTitle { id: 100, job_function_id: 3 },
            JobTitle { id: 101, job_function_id: 10 },
        ],
    }
}

/// [`sample_hierarchy_data`] loaded with product pruning enabled.
pub fn sample_hierarchies() -> Hierarchies {
    sample_hierarchy_data()
        .into_hierarchies(true)
        .expect("sample hierarchy is a valid forest")
}

/// [`sample_hierarchy_data`] as an import file.
pub fn sample_hierarchy_json() -> String {
    serde_json::to_string_pretty(&sample_hierarchy_data()).expect("sample hierarchy serializes")
}

/// Balanced trees for benchmarks: `fanout` children per node, `depth`
/// levels below a single root, products on every leaf.
///
/// Location ids are dotted paths from `"root"`; job function ids are
/// assigned breadth-first from 1.
pub fn synthetic_hierarchy_data(fanout: usize, depth: usize) -> HierarchyData {
    let mut data = HierarchyData::default();

    let mut level = vec!["root".to_string()];
    data.locations.push(LocationNode::new("root", None));
    for current_depth in 1..=depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for parent in &level {
            for i in 0..fanout {
                let id = format!("{parent}.{i}");
                let mut node = LocationNode::new(id.clone(), Some(parent.as_str())).with_country("XX");
                if current_depth == depth {
                    node = node.with_products(1);
                }
                data.locations.push(node);
                next.push(id);
            }
        }
        level = next;
    }

    let mut next_id = 1_i64;
    let mut level = vec![next_id];
    data.job_functions.push(JobFunctionNode { id: next_id, parent_id: None });
    for _ in 0..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for _ in 0..fanout {
                next_id += 1;
                data.job_functions.push(JobFunctionNode {
                    id: next_id,
                    parent_id: Some(parent),
                });
                next.push(next_id);
            }
        }
        level = next;
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_round_trips_through_json() {
        let parsed: HierarchyData = serde_json::from_str(&sample_hierarchy_json()).unwrap();
        assert_eq!(parsed, sample_hierarchy_data());
    }

    #[test]
    fn test_synthetic_sizes() {
        let data = synthetic_hierarchy_data(3, 2);
        assert_eq!(data.locations.len(), 1 + 3 + 9);
        assert_eq!(data.job_functions.len(), 1 + 3 + 9);
        assert!(data.into_hierarchies(true).is_ok());
    }
}
