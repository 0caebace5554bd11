//! Arena-backed forest shared by the location and job-function hierarchies.
//!
//! Nodes live in a `Vec` and refer to each other by index. The forest
//! invariant (unique ids, known parents, no cycles) is checked once in
//! [`Forest::build`]; every walk afterwards is iterative and terminates.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{FacetError, Result};

#[derive(Debug, Clone)]
struct Node<K> {
    id: K,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A validated set of trees keyed by `K`.
#[derive(Debug, Clone)]
pub struct Forest<K> {
    nodes: Vec<Node<K>>,
    index: HashMap<K, usize>,
    /// Parents before children.
    topo_order: Vec<usize>,
}

impl<K> Forest<K>
where
    K: Clone + Eq + Hash + Ord + Display,
{
    /// Build a forest from `(id, parent)` pairs.
    ///
    /// `kind` names the hierarchy in error messages ("location",
    /// "job function").
    pub fn build<I>(kind: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<K>)>,
    {
        let entries: Vec<(K, Option<K>)> = entries.into_iter().collect();
        let mut index = HashMap::with_capacity(entries.len());
        let mut nodes = Vec::with_capacity(entries.len());

        for (id, _) in &entries {
            if index.insert(id.clone(), nodes.len()).is_some() {
                return Err(FacetError::DuplicateNode {
                    kind: kind.to_string(),
                    node: id.to_string(),
                });
            }
            nodes.push(Node {
                id: id.clone(),
                parent: None,
                children: Vec::new(),
            });
        }

        for (position, (id, parent)) in entries.iter().enumerate() {
            let Some(parent) = parent else { continue };
            let Some(&parent_idx) = index.get(parent) else {
                return Err(FacetError::DanglingParent {
                    kind: kind.to_string(),
                    node: id.to_string(),
                    parent: parent.to_string(),
                });
            };
            nodes[position].parent = Some(parent_idx);
            nodes[parent_idx].children.push(position);
        }

        for node_idx in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[node_idx].children);
            children.sort_by(|a, b| nodes[*a].id.cmp(&nodes[*b].id));
            nodes[node_idx].children = children;
        }

        let mut forest = Self {
            nodes,
            index,
            topo_order: Vec::new(),
        };
        forest.check_acyclic(kind)?;
        forest.topo_order = forest.compute_topo_order();
        Ok(forest)
    }

    /// Walk each node's parent chain once, colouring nodes so every chain
    /// is visited at most one time overall.
    fn check_acyclic(&self, kind: &str) -> Result<()> {
        const UNSEEN: u8 = 0;
        const ON_PATH: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNSEEN; self.nodes.len()];
        let mut path: Vec<usize> = Vec::new();

        for start in 0..self.nodes.len() {
            if state[start] != UNSEEN {
                continue;
            }
            path.clear();
            let mut current = Some(start);

            while let Some(idx) = current {
                match state[idx] {
                    DONE => break,
                    ON_PATH => {
                        let cycle_start = path.iter().position(|&p| p == idx).unwrap_or(0);
                        let mut cycle: Vec<String> = path[cycle_start..]
                            .iter()
                            .map(|&p| self.nodes[p].id.to_string())
                            .collect();
                        cycle.push(self.nodes[idx].id.to_string());
                        return Err(FacetError::HierarchyCycle {
                            kind: kind.to_string(),
                            node: self.nodes[idx].id.to_string(),
                            cycle,
                        });
                    }
                    _ => {
                        state[idx] = ON_PATH;
                        path.push(idx);
                        current = self.nodes[idx].parent;
                    }
                }
            }

            for &idx in &path {
                state[idx] = DONE;
            }
        }

        Ok(())
    }

    fn compute_topo_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| idx)
            .collect();

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            queue.extend(self.nodes[idx].children.iter().copied());
        }
        order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn index_of(&self, id: &K) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> &K {
        &self.nodes[idx].id
    }

    pub(crate) fn children_at(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].children
    }

    /// Node indices ordered parents-first.
    pub(crate) fn topo_order(&self) -> &[usize] {
        &self.topo_order
    }

    pub(crate) fn parent_at(&self, idx: usize) -> Option<usize> {
        self.nodes[idx].parent
    }

    pub fn parent(&self, id: &K) -> Option<&K> {
        let idx = self.index_of(id)?;
        self.nodes[idx].parent.map(|p| &self.nodes[p].id)
    }

    /// Root ids in ascending order.
    pub fn roots(&self) -> Vec<&K> {
        let mut roots: Vec<&K> = self
            .nodes
            .iter()
            .filter(|node| node.parent.is_none())
            .map(|node| &node.id)
            .collect();
        roots.sort();
        roots
    }

    /// The id itself followed by every ancestor up to its root.
    ///
    /// Empty for unknown ids.
    pub fn path_to_root(&self, id: &K) -> Vec<K> {
        let mut path = Vec::new();
        let mut current = self.index_of(id);
        while let Some(idx) = current {
            path.push(self.nodes[idx].id.clone());
            current = self.nodes[idx].parent;
        }
        path
    }

    /// Ancestors of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: &K) -> Vec<K> {
        let mut path = self.path_to_root(id);
        if !path.is_empty() {
            path.remove(0);
        }
        path
    }

    /// Every descendant of `id` in breadth-first order, excluding `id`.
    pub fn descendants(&self, id: &K) -> Vec<K> {
        self.descendants_where(id, |_| true, |_| true)
    }

    /// Breadth-first descendant walk.
    ///
    /// `enter(idx)` decides whether the subtree rooted at `idx` is visited at
    /// all; `keep(idx)` decides whether a visited node is reported.
    pub(crate) fn descendants_where<E, F>(&self, id: &K, enter: E, keep: F) -> Vec<K>
    where
        E: Fn(usize) -> bool,
        F: Fn(usize) -> bool,
    {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut queue: VecDeque<usize> = self.nodes[start].children.iter().copied().collect();
        while let Some(idx) = queue.pop_front() {
            if !enter(idx) {
                continue;
            }
            if keep(idx) {
                out.push(self.nodes[idx].id.clone());
            }
            queue.extend(self.nodes[idx].children.iter().copied());
        }
        out
    }
}
