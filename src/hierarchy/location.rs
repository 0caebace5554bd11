//! Location hierarchy: countries, regions and cities linked by parent ids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::forest::Forest;
use crate::error::Result;

/// One row of the location table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    /// Number of products attached directly to this location.
    #[serde(default)]
    pub product_count: u64,
}

impl LocationNode {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            country_code: None,
            product_count: 0,
        }
    }

    #[must_use]
    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    #[must_use]
    pub const fn with_products(mut self, count: u64) -> Self {
        self.product_count = count;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LocationHierarchy {
    forest: Forest<String>,
    country_codes: Vec<Option<String>>,
    product_counts: Vec<u64>,
    /// Products attached anywhere in the subtree rooted at each node.
    subtree_counts: Vec<u64>,
}

impl LocationHierarchy {
    pub fn new(nodes: Vec<LocationNode>) -> Result<Self> {
        let forest = Forest::build(
            "location",
            nodes.iter().map(|n| (n.id.clone(), n.parent_id.clone())),
        )?;

        let mut country_codes = vec![None; forest.len()];
        let mut product_counts = vec![0; forest.len()];
        for node in nodes {
            if let Some(idx) = forest.index_of(&node.id) {
                country_codes[idx] = node.country_code.filter(|code| !code.is_empty());
                product_counts[idx] = node.product_count;
            }
        }

        let mut subtree_counts = product_counts.clone();
        for &idx in forest.topo_order().iter().rev() {
            if let Some(parent) = forest.parent_at(idx) {
                subtree_counts[parent] =
                    subtree_counts[parent].saturating_add(subtree_counts[idx]);
            }
        }

        Ok(Self {
            forest,
            country_codes,
            product_counts,
            subtree_counts,
        })
    }

    pub fn len(&self) -> usize {
        self.forest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.forest.contains(&id.to_string())
    }

    /// Every id on the path from each input to its root, inputs included.
    pub fn list_context_locations_ids(&self, ids: &[String]) -> BTreeSet<String> {
        ids.iter()
            .flat_map(|id| self.forest.path_to_root(id))
            .collect()
    }

    /// Every descendant of every input, inputs excluded.
    ///
    /// With `only_associated_to_products`, a descendant is reported only if
    /// products are attached to it, and a branch whose subtree carries no
    /// products is not walked.
    pub fn list_child_locations(
        &self,
        ids: &[String],
        only_associated_to_products: bool,
    ) -> BTreeSet<String> {
        ids.iter()
            .flat_map(|id| {
                if only_associated_to_products {
                    self.forest.descendants_where(
                        id,
                        |idx| self.subtree_counts[idx] > 0,
                        |idx| self.product_counts[idx] > 0,
                    )
                } else {
                    self.forest.descendants(id)
                }
            })
            .collect()
    }

    /// Ancestors and (optionally pruned) descendants of the inputs.
    pub fn inclusive_ids(
        &self,
        ids: &[String],
        only_associated_to_products: bool,
    ) -> BTreeSet<String> {
        let mut all = self.list_context_locations_ids(ids);
        let children = self.list_child_locations(ids, only_associated_to_products);
        debug!(
            inputs = ids.len(),
            context = all.len(),
            children = children.len(),
            "Expanded location ids"
        );
        all.extend(children);
        all
    }

    pub fn country_code(&self, id: &str) -> Option<&str> {
        let idx = self.forest.index_of(&id.to_string())?;
        self.country_codes[idx].as_deref()
    }

    /// Country codes of the inputs in input order, unknown or unannotated
    /// locations skipped, duplicates dropped.
    pub fn country_codes(&self, ids: &[String]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        ids.iter()
            .filter_map(|id| self.country_code(id))
            .filter(|code| seen.insert(*code))
            .map(str::to_string)
            .collect()
    }

    pub fn product_count(&self, id: &str) -> Option<u64> {
        self.forest
            .index_of(&id.to_string())
            .map(|idx| self.product_counts[idx])
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.forest.parent(&id.to_string()).map(String::as_str)
    }

    /// Direct children, sorted.
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.forest
            .index_of(&id.to_string())
            .map(|idx| {
                self.forest
                    .children_at(idx)
                    .iter()
                    .map(|&child| self.forest.id_at(child).as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    /// europe > nl > (noord-holland > amsterdam, utrecht), de > berlin
    fn europe() -> LocationHierarchy {
        LocationHierarchy::new(vec![
            LocationNode::new("europe", None),
            LocationNode::new("nl", Some("europe")).with_country("NL").with_products(3),
            LocationNode::new("noord-holland", Some("nl")).with_country("NL"),
            LocationNode::new("amsterdam", Some("noord-holland"))
                .with_country("NL")
                .with_products(2),
            LocationNode::new("utrecht", Some("nl")).with_country("NL"),
            LocationNode::new("de", Some("europe")).with_country("DE").with_products(1),
            LocationNode::new("berlin", Some("de")).with_country("DE"),
        ])
        .unwrap()
    }

    #[test]
    fn test_context_ids_walk_to_root() {
        let hierarchy = europe();
        assert_eq!(
            hierarchy.list_context_locations_ids(&ids(&["amsterdam"])),
            set(&["amsterdam", "noord-holland", "nl", "europe"])
        );
    }

    #[test]
    fn test_context_ids_union_across_inputs() {
        let hierarchy = europe();
        assert_eq!(
            hierarchy.list_context_locations_ids(&ids(&["utrecht", "berlin"])),
            set(&["utrecht", "nl", "europe", "berlin", "de"])
        );
    }

    #[test]
    fn test_unknown_location_contributes_nothing() {
        let hierarchy = europe();
        assert!(hierarchy.list_context_locations_ids(&ids(&["mars"])).is_empty());
        assert!(hierarchy.list_child_locations(&ids(&["mars"]), false).is_empty());
        assert!(hierarchy.inclusive_ids(&ids(&["mars"]), true).is_empty());
    }

    #[test]
    fn test_child_locations_unfiltered() {
        let hierarchy = europe();
        assert_eq!(
            hierarchy.list_child_locations(&ids(&["nl"]), false),
            set(&["noord-holland", "amsterdam", "utrecht"])
        );
    }

    #[test]
    fn test_child_locations_pruned_to_products() {
        let hierarchy = europe();
        // noord-holland has no products of its own but its subtree does
        assert_eq!(
            hierarchy.list_child_locations(&ids(&["nl"]), true),
            set(&["amsterdam"])
        );
        assert!(hierarchy.list_child_locations(&ids(&["de"]), true).is_empty());
    }

    #[test]
    fn test_huge_product_counts_saturate() {
        let hierarchy = LocationHierarchy::new(vec![
            LocationNode::new("world", None),
            LocationNode::new("big", Some("world")).with_products(u64::MAX),
            LocationNode::new("small", Some("world")).with_products(1),
            LocationNode::new("empty", Some("world")),
        ])
        .unwrap();
        assert_eq!(
            hierarchy.list_child_locations(&ids(&["world"]), true),
            set(&["big", "small"])
        );
    }

    #[test]
    fn test_inclusive_ids_union() {
        let hierarchy = europe();
        assert_eq!(
            hierarchy.inclusive_ids(&ids(&["nl"]), true),
            set(&["europe", "nl", "amsterdam"])
        );
    }

    #[test]
    fn test_country_codes_dedup_and_skip_missing() {
        let hierarchy = europe();
        assert_eq!(
            hierarchy.country_codes(&ids(&["amsterdam", "europe", "utrecht", "berlin"])),
            vec!["NL".to_string(), "DE".to_string()]
        );
        assert_eq!(hierarchy.country_code("europe"), None);
    }

    #[test]
    fn test_empty_country_code_treated_as_missing() {
        let hierarchy = LocationHierarchy::new(vec![
            LocationNode::new("x", None).with_country(""),
        ])
        .unwrap();
        assert!(hierarchy.country_codes(&ids(&["x"])).is_empty());
    }

    #[test]
    fn test_children_and_parent() {
        let hierarchy = europe();
        assert_eq!(hierarchy.children("nl"), vec!["noord-holland", "utrecht"]);
        assert_eq!(hierarchy.parent("nl"), Some("europe"));
        assert_eq!(hierarchy.product_count("amsterdam"), Some(2));
        assert!(hierarchy.contains("berlin"));
    }
}
