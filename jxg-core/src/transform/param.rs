//! Transformation parameters and how they are read.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Dim;
use crate::error::{Error, Result};
use crate::graph::NodeId;

/// Read access to the current numeric state of elements.
///
/// Points answer with homogeneous coordinates, lines with their standard
/// form `[c, a, b]`, numbers (sliders) with a single value.
pub trait NodeValues {
    fn coords(&self, id: NodeId) -> Option<&[f64]>;
}

impl NodeValues for () {
    fn coords(&self, _id: NodeId) -> Option<&[f64]> {
        None
    }
}

impl NodeValues for HashMap<NodeId, Vec<f64>> {
    fn coords(&self, id: NodeId) -> Option<&[f64]> {
        self.get(&id).map(Vec::as_slice)
    }
}

/// Evaluator for a parameter that is recomputed on every update.
pub type ParamFn = Arc<dyn Fn() -> f64 + Send + Sync>;

/// One parameter of a transformation.
#[derive(Clone)]
pub enum Param {
    /// A fixed number.
    Num(f64),
    /// A number read from a closure at every update.
    Fn(ParamFn),
    /// The live value of another element.
    Node(NodeId),
    /// A point, direction or line given component by component.
    Vector(Vec<Param>),
    /// A full homogeneous matrix, one parameter per entry.
    Matrix(Vec<Vec<Param>>),
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(v) => write!(f, "{v}"),
            Self::Fn(_) => write!(f, "<fn>"),
            Self::Node(id) => write!(f, "{id:?}"),
            Self::Vector(items) => f.debug_list().entries(items).finish(),
            Self::Matrix(rows) => f.debug_list().entries(rows).finish(),
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<NodeId> for Param {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Vec<f64>> for Param {
    fn from(v: Vec<f64>) -> Self {
        Self::Vector(v.into_iter().map(Self::Num).collect())
    }
}

impl From<Vec<Vec<f64>>> for Param {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::Matrix(
            rows.into_iter()
                .map(|row| row.into_iter().map(Self::Num).collect())
                .collect(),
        )
    }
}

impl Param {
    pub fn func(f: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self::Fn(Arc::new(f))
    }

    /// True if the parameter is made of plain numbers only.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Num(_) => true,
            Self::Fn(_) | Self::Node(_) => false,
            Self::Vector(items) => items.iter().all(Self::is_numeric),
            Self::Matrix(rows) => rows.iter().flatten().all(Self::is_numeric),
        }
    }

    pub(crate) fn collect_nodes(&self, out: &mut Vec<NodeId>) {
        match self {
            Self::Node(id) => {
                if !out.contains(id) {
                    out.push(*id);
                }
            }
            Self::Vector(items) => items.iter().for_each(|p| p.collect_nodes(out)),
            Self::Matrix(rows) => rows.iter().flatten().for_each(|p| p.collect_nodes(out)),
            Self::Num(_) | Self::Fn(_) => {}
        }
    }

    fn node_coords<'a>(id: NodeId, values: &'a dyn NodeValues) -> Result<&'a [f64]> {
        values.coords(id).ok_or(Error::UnknownNode(id))
    }

    /// Reads the parameter as a single number.
    pub fn scalar(&self, kind: &'static str, values: &dyn NodeValues) -> Result<f64> {
        match self {
            Self::Num(v) => Ok(*v),
            Self::Fn(f) => Ok(f()),
            Self::Node(id) => match Self::node_coords(*id, values)? {
                [v] => Ok(*v),
                _ => Err(Error::InvalidParam {
                    kind,
                    reason: format!("element {id:?} is not a number"),
                }),
            },
            Self::Vector(_) | Self::Matrix(_) => Err(Error::InvalidParam {
                kind,
                reason: "expected a number".into(),
            }),
        }
    }

    /// Reads the parameter as the Euclidean coordinates of a point in `dim`.
    ///
    /// Homogeneous input is divided by its first component.
    pub fn euclidean(&self, kind: &'static str, dim: Dim, values: &dyn NodeValues) -> Result<Vec<f64>> {
        let raw = match self {
            Self::Node(id) => Self::node_coords(*id, values)?.to_vec(),
            Self::Vector(items) => items
                .iter()
                .map(|p| p.scalar(kind, values))
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(Error::InvalidParam {
                    kind,
                    reason: "expected a point".into(),
                })
            }
        };
        let n = dim.size();
        if raw.len() == n {
            let w = raw[0];
            Ok(raw[1..].iter().map(|c| c / w).collect())
        } else if raw.len() == n - 1 {
            Ok(raw)
        } else {
            Err(Error::InvalidParam {
                kind,
                reason: format!("expected a point with {} coordinates, got {}", n - 1, raw.len()),
            })
        }
    }

    /// Reads the parameter as a raw vector of exactly `len` numbers.
    pub fn vector(&self, kind: &'static str, len: usize, values: &dyn NodeValues) -> Result<Vec<f64>> {
        let raw = match self {
            Self::Node(id) => Self::node_coords(*id, values)?.to_vec(),
            Self::Vector(items) => items
                .iter()
                .map(|p| p.scalar(kind, values))
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(Error::InvalidParam {
                    kind,
                    reason: format!("expected a vector of length {len}"),
                })
            }
        };
        if raw.len() != len {
            return Err(Error::InvalidParam {
                kind,
                reason: format!("expected a vector of length {len}, got {}", raw.len()),
            });
        }
        Ok(raw)
    }
}
