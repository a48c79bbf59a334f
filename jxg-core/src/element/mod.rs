//! Elements
//!
//! An element is a node of the dependency graph plus a [`Behavior`] that
//! computes its [`Value`] from the values of its parents.
//!
//! # Update contract
//!
//! - [`Behavior::compute`] is a pure recomputation. It reads parents through
//!   the [`UpdateContext`] and returns the new value; it never touches other
//!   elements.
//! - Pushing the value to a renderer is a separate step run by the board,
//!   which is what lets updates be suspended without going stale.
//! - Numeric degeneracy (parallel lines, a zero-length normal) is not an
//!   error. It shows up as NaN or infinite coordinates, and elements holding
//!   NaN are hidden.
//! - A mistyped parent is an error; the board refuses to create the element.

mod context;
mod geometry;
mod solid;
mod value;

pub use context::{UpdateContext, ValueLookup};
pub use geometry::{Circle, Computed, Free, Join, Meet, Midpoint, Radius, Text, TransformedPoint};
pub use solid::{Face3D, PolyhedronMesh};
pub use value::Value;

use crate::error::Result;

/// How an element computes its value.
pub trait Behavior: Send + Sync {
    /// Short name used in error messages, e.g. `"midpoint"`.
    fn type_name(&self) -> &'static str;

    /// Recomputes the element's value from its parents.
    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value>;
}
