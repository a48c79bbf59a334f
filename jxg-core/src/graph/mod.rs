//! Dependency Graph
//!
//! Every element on a board is a node in a directed acyclic graph. An edge
//! `parent -> child` means the child's value is computed (at least partly)
//! from the parent's.
//!
//! # Overview
//!
//! - Nodes record their parents (ordered, as attached) and children.
//! - Edges are stored in both directions so a change can be pushed down to
//!   children and a child can look up what it reads from.
//! - The graph is owned centrally by an [`UpdateScheduler`]; nodes only hold
//!   ids, never references to each other.
//!
//! The scheduler keeps nodes in registration order and derives a cached
//! topological order from the edges for propagation passes.

mod node;
mod scheduler;

pub use node::{Node, NodeId, NodeKind};
pub use scheduler::UpdateScheduler;
