//! Graph Nodes
//!
//! This module defines the node records stored in the dependency graph.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Unique identifier for an element on a board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of node in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A free element. Its value is set from outside (dragging, sliders) and
    /// never computed from parents, although bound transformations may still
    /// give it parents.
    Free,

    /// A derived element, recomputed from its parents.
    Derived,
}

/// A node in the dependency graph.
///
/// Parents and children are stored as ids only; the owning
/// [`UpdateScheduler`](super::UpdateScheduler) is responsible for keeping
/// both directions consistent.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,

    /// Set when an ancestor changed; cleared once the node has recomputed.
    needs_update: bool,

    /// Nodes this node is computed from, in the order they were attached.
    parents: IndexSet<NodeId>,

    /// Nodes to notify when this node changes.
    children: IndexSet<NodeId>,
}

impl Node {
    /// Create a new node with the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self::with_id(NodeId::new(), kind)
    }

    /// Create a node for an id allocated elsewhere.
    pub fn with_id(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            needs_update: false,
            parents: IndexSet::new(),
            children: IndexSet::new(),
        }
    }

    pub fn free() -> Self {
        Self::new(NodeKind::Free)
    }

    pub fn derived() -> Self {
        Self::new(NodeKind::Derived)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_free(&self) -> bool {
        self.kind == NodeKind::Free
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn mark(&mut self) {
        self.needs_update = true;
    }

    pub fn clear(&mut self) {
        self.needs_update = false;
    }

    pub(crate) fn add_parent(&mut self, id: NodeId) -> bool {
        self.parents.insert(id)
    }

    pub(crate) fn remove_parent(&mut self, id: NodeId) -> bool {
        self.parents.shift_remove(&id)
    }

    pub(crate) fn add_child(&mut self, id: NodeId) -> bool {
        self.children.insert(id)
    }

    pub(crate) fn remove_child(&mut self, id: NodeId) -> bool {
        self.children.shift_remove(&id)
    }

    pub fn parents(&self) -> &IndexSet<NodeId> {
        &self.parents
    }

    pub fn children(&self) -> &IndexSet<NodeId> {
        &self.children
    }
}
