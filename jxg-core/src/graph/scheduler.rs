//! Update Scheduler
//!
//! The scheduler owns every node of a board and decides the order in which
//! they are visited during a propagation pass.
//!
//! # Ordering
//!
//! Two orders are available:
//!
//! 1. Registration order: nodes are visited in the order they were added.
//!    This is only correct if every element is added after its parents.
//! 2. Topological order: Kahn's algorithm over the parent/child sets. When
//!    several nodes are ready at once, the one registered first wins, so the
//!    topological order coincides with registration order whenever the
//!    latter is already valid.
//!
//! The topological order is cached and dropped whenever a node or an edge
//! changes. Cycles are refused when the offending edge is added, so the
//! cached order always covers every node.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use indexmap::IndexMap;
use tracing::{trace, warn};

use super::node::{Node, NodeId};
use crate::error::{Error, Result};

/// Owns the dependency graph of one board.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    /// All nodes in registration order.
    nodes: IndexMap<NodeId, Node>,

    /// Cached topological order, rebuilt lazily.
    order: Option<Vec<NodeId>>,
}

impl UpdateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the end of the registry.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        self.order = None;
        id
    }

    /// Remove a node and every edge touching it.
    ///
    /// Children keep existing; they simply lose this parent.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;
        for parent in node.parents() {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.remove_child(node_id);
            }
        }
        for child in node.children() {
            if let Some(c) = self.nodes.get_mut(child) {
                c.remove_parent(node_id);
            }
        }
        self.order = None;
        Some(node)
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    pub fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn get_node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Node ids in registration order.
    pub fn registration_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add the edge `parent -> child`.
    ///
    /// Adding an edge that already exists is a no-op. An edge that would
    /// close a cycle is refused with [`Error::Cycle`] and the graph is left
    /// untouched.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(&parent) {
            return Err(Error::UnknownNode(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(Error::UnknownNode(child));
        }
        if parent == child || self.reaches(child, parent) {
            warn!(?parent, ?child, "refusing edge that closes a dependency cycle");
            return Err(Error::Cycle(child));
        }

        let mut added = false;
        if let Some(p) = self.nodes.get_mut(&parent) {
            added |= p.add_child(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            added |= c.add_parent(parent);
        }
        if added {
            trace!(?parent, ?child, "edge added");
            self.order = None;
        }
        Ok(())
    }

    /// Remove the edge `parent -> child`. Returns whether it existed.
    pub fn remove_edge(&mut self, parent: NodeId, child: NodeId) -> bool {
        let mut removed = false;
        if let Some(p) = self.nodes.get_mut(&parent) {
            removed |= p.remove_child(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            removed |= c.remove_parent(parent);
        }
        if removed {
            self.order = None;
        }
        removed
    }

    /// True if `to` can be reached from `from` along child edges.
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = std::collections::HashSet::new();
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children().iter().copied());
            }
        }
        false
    }

    /// Every node reachable from `root` along child edges, `root` excluded,
    /// in registration order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut found = std::collections::HashSet::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(&root)
            .map(|n| n.children().iter().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            if found.insert(id) {
                if let Some(node) = self.nodes.get(&id) {
                    stack.extend(node.children().iter().copied());
                }
            }
        }
        self.nodes.keys().copied().filter(|id| found.contains(id)).collect()
    }

    /// Set the update flag on a node.
    pub fn mark_changed(&mut self, node_id: NodeId) -> Result<()> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(Error::UnknownNode(node_id))?
            .mark();
        Ok(())
    }

    /// Set the update flag on every node.
    pub fn mark_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.mark();
        }
    }

    /// Set the update flag on every child of `node_id`.
    pub fn mark_children(&mut self, node_id: NodeId) {
        let children: Vec<NodeId> = match self.nodes.get(&node_id) {
            Some(node) => node.children().iter().copied().collect(),
            None => return,
        };
        for child in children {
            if let Some(c) = self.nodes.get_mut(&child) {
                c.mark();
            }
        }
    }

    /// All nodes ordered so that parents come before children.
    pub fn topological_order(&mut self) -> &[NodeId] {
        if self.order.is_none() {
            self.order = Some(self.topological_sort());
        }
        self.order.as_deref().unwrap_or_default()
    }

    /// Kahn's algorithm with ties broken by registration position.
    fn topological_sort(&self) -> Vec<NodeId> {
        let mut in_degree: Vec<usize> = self
            .nodes
            .values()
            .map(|n| n.parents().iter().filter(|p| self.nodes.contains_key(*p)).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut result = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(index)) = ready.pop() {
            let Some((&id, node)) = self.nodes.get_index(index) else {
                continue;
            };
            result.push(id);
            for child in node.children() {
                if let Some(ci) = self.nodes.get_index_of(child) {
                    in_degree[ci] -= 1;
                    if in_degree[ci] == 0 {
                        ready.push(Reverse(ci));
                    }
                }
            }
        }

        if result.len() < self.nodes.len() {
            // Unreachable while add_edge refuses cycles; keep every node
            // visitable anyway.
            for id in self.nodes.keys() {
                if !result.contains(id) {
                    result.push(*id);
                }
            }
        }
        result
    }
}
