use nalgebra::{DVector, Point3};

use super::Value;
use crate::error::{Error, Result};
use crate::graph::NodeId;
use crate::transform::NodeValues;

/// Lookup of the current value of any element.
pub trait ValueLookup {
    fn value(&self, id: NodeId) -> Option<&Value>;
}

/// What an element sees while it recomputes: its parents' current values
/// and its own base value.
pub struct UpdateContext<'a> {
    element: &'static str,
    id: NodeId,
    parents: &'a [NodeId],
    base: &'a Value,
    lookup: &'a dyn ValueLookup,
}

impl<'a> UpdateContext<'a> {
    pub fn new(
        element: &'static str,
        id: NodeId,
        parents: &'a [NodeId],
        base: &'a Value,
        lookup: &'a dyn ValueLookup,
    ) -> Self {
        Self {
            element,
            id,
            parents,
            base,
            lookup,
        }
    }

    /// Id of the element being updated.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    pub fn parent_id(&self, index: usize) -> Result<NodeId> {
        self.parents.get(index).copied().ok_or_else(|| Error::InvalidParam {
            kind: self.element,
            reason: format!("missing parent {index}"),
        })
    }

    /// The value of an element, parent or not.
    pub fn value_of(&self, id: NodeId) -> Result<&'a Value> {
        self.lookup.value(id).ok_or(Error::UnknownNode(id))
    }

    pub fn parent(&self, index: usize) -> Result<&'a Value> {
        self.value_of(self.parent_id(index)?)
    }

    /// The value the element had before transformations; for free elements
    /// this is the position set from outside.
    pub fn base(&self) -> &'a Value {
        self.base
    }

    fn wrong_type(&self, index: usize, expected: &'static str, found: &Value) -> Error {
        Error::ParentType {
            element: self.element,
            index,
            expected,
            found: found.type_name(),
        }
    }

    /// Homogeneous coordinates of parent `index`.
    pub fn point(&self, index: usize) -> Result<&'a DVector<f64>> {
        match self.parent(index)? {
            Value::Point(c) => Ok(c),
            other => Err(self.wrong_type(index, "point", other)),
        }
    }

    pub fn line(&self, index: usize) -> Result<&'a DVector<f64>> {
        match self.parent(index)? {
            Value::Line(c) => Ok(c),
            other => Err(self.wrong_type(index, "line", other)),
        }
    }

    pub fn scalar(&self, index: usize) -> Result<f64> {
        match self.parent(index)? {
            Value::Scalar(v) => Ok(*v),
            other => Err(self.wrong_type(index, "number", other)),
        }
    }

    pub fn circle(&self, index: usize) -> Result<(&'a DVector<f64>, f64)> {
        match self.parent(index)? {
            Value::Circle { center, radius } => Ok((center, *radius)),
            other => Err(self.wrong_type(index, "circle", other)),
        }
    }

    pub fn mesh(&self, index: usize) -> Result<&'a [Point3<f64>]> {
        match self.parent(index)? {
            Value::Mesh(vertices) => Ok(vertices),
            other => Err(self.wrong_type(index, "mesh", other)),
        }
    }
}

impl NodeValues for UpdateContext<'_> {
    fn coords(&self, id: NodeId) -> Option<&[f64]> {
        self.lookup.value(id).map(Value::numeric)
    }
}
