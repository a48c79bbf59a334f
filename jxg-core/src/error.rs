//! Error Types
//!
//! Construction-time mistakes (wrong transform arity, unknown parents,
//! mistyped parents, dependency cycles) are reported through [`Error`].
//! Degenerate numeric states reached while dragging are not errors: they
//! travel through the graph as `NaN`/infinite coordinates instead.

use thiserror::Error;

use crate::graph::NodeId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in the geometry kernel.
#[derive(Debug, Error)]
pub enum Error {
    /// A transformation was given the wrong number of parameters.
    #[error("{kind} transformation in {dim} needs {expected} parameters, got {got}")]
    Arity {
        kind: &'static str,
        dim: &'static str,
        expected: &'static str,
        got: usize,
    },

    /// The transformation kind exists but not in the requested dimension.
    #[error("{kind} transformation is not available in {dim}")]
    UnsupportedTransform { kind: &'static str, dim: &'static str },

    /// A transformation type tag outside the closed set.
    #[error("unknown transformation type `{0}`")]
    UnknownTransformType(String),

    /// A parameter had the wrong shape (e.g. a scalar where a vector was needed).
    #[error("{kind} transformation: {reason}")]
    InvalidParam { kind: &'static str, reason: String },

    /// A matrix that is not 3x3 (2D) or 4x4 (3D).
    #[error("matrix must be {expected}x{expected}, got {rows}x{cols}")]
    MatrixShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// Coordinates and matrix disagree on the dimension.
    #[error("dimension mismatch: matrix is {matrix}x{matrix}, coordinates have length {coords}")]
    DimensionMismatch { matrix: usize, coords: usize },

    /// A node id that is not registered on the board.
    #[error("unknown element {0:?}")]
    UnknownNode(NodeId),

    /// A parent exists but is not of the kind the element needs.
    #[error("{element} expects parent {index} to be a {expected}, got a {found}")]
    ParentType {
        element: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Positions can only be set on free elements.
    #[error("element {0:?} is not free")]
    NotFree(NodeId),

    /// Adding an edge would make an element depend on itself.
    #[error("dependency cycle through element {0:?}")]
    Cycle(NodeId),

    /// `union` of two intervals that do not overlap.
    #[error("union of non-overlapping intervals [{0}, {1}] and [{2}, {3}]")]
    DisjointUnion(f64, f64, f64, f64),

    /// `difference` whose result would be two disjoint pieces.
    #[error("interval difference creates multiple intervals")]
    SplitDifference,

    /// Malformed expression IR.
    #[error("IR parse error: {0}")]
    Ir(#[from] serde_json::Error),

    /// An IR program that references unknown values or inputs.
    #[error("evaluation error: {0}")]
    Eval(String),

    /// Native code generation failed.
    #[error("JIT error: {0}")]
    Jit(String),

    /// Snapshot encoding or decoding failed.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// A board configuration that does not parse.
    #[error("invalid board configuration: {0}")]
    Config(String),
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Snapshot(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Self::Snapshot(e.to_string())
    }
}
