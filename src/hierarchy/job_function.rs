//! Job-function tree plus the job-title -> job-function mapping.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::forest::Forest;
use crate::error::{FacetError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFunctionNode {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// A job title belongs to exactly one job function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: i64,
    pub job_function_id: i64,
}

#[derive(Debug, Clone)]
pub struct JobFunctionHierarchy {
    forest: Forest<i64>,
    titles: HashMap<i64, i64>,
}

impl JobFunctionHierarchy {
    pub fn new(functions: Vec<JobFunctionNode>, titles: Vec<JobTitle>) -> Result<Self> {
        let forest = Forest::build(
            "job function",
            functions.iter().map(|f| (f.id, f.parent_id)),
        )?;

        let mut title_map = HashMap::with_capacity(titles.len());
        for title in titles {
            if !forest.contains(&title.job_function_id) {
                return Err(FacetError::DanglingParent {
                    kind: "job title".to_string(),
                    node: title.id.to_string(),
                    parent: title.job_function_id.to_string(),
                });
            }
            if title_map.insert(title.id, title.job_function_id).is_some() {
                return Err(FacetError::DuplicateNode {
                    kind: "job title".to_string(),
                    node: title.id.to_string(),
                });
            }
        }

        Ok(Self {
            forest,
            titles: title_map,
        })
    }

    pub fn len(&self) -> usize {
        self.forest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.forest.contains(&id)
    }

    /// Ancestors nearest first, `id` excluded.
    pub fn ancestors(&self, id: i64) -> Vec<i64> {
        self.forest.ancestors(&id)
    }

    pub fn descendants(&self, id: i64, include_self: bool) -> Vec<i64> {
        let mut out = Vec::new();
        if include_self && self.forest.contains(&id) {
            out.push(id);
        }
        out.extend(self.forest.descendants(&id));
        out
    }

    /// Each known input with all of its descendants and all of its ancestors.
    ///
    /// Unknown ids contribute nothing.
    pub fn inclusive_ids(&self, ids: &[i64]) -> BTreeSet<i64> {
        let expanded: BTreeSet<i64> = ids
            .iter()
            .flat_map(|&id| {
                let mut family = self.descendants(id, true);
                family.extend(self.ancestors(id));
                family
            })
            .collect();
        debug!(inputs = ids.len(), expanded = expanded.len(), "Expanded job function ids");
        expanded
    }

    /// Job functions the given titles belong to. Unknown titles are skipped.
    pub fn job_functions_for_titles(&self, title_ids: &[i64]) -> BTreeSet<i64> {
        title_ids
            .iter()
            .filter_map(|id| self.titles.get(id).copied())
            .collect()
    }

    pub fn parent(&self, id: i64) -> Option<i64> {
        self.forest.parent(&id).copied()
    }
}
