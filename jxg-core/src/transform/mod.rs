//! Transformation Algebra
//!
//! Projective transformations of the plane (3x3) and of space (4x4) acting on
//! homogeneous coordinates `(w, x, y)` / `(w, x, y, z)`.
//!
//! # Lifecycle
//!
//! A [`Transformation`] is built from a [`TransformType`] and a list of
//! [`Param`]s. Parameter counts are checked at construction; the matrix is
//! (re)computed by [`Transformation::update`] from the live parameter values.
//!
//! A transformation is in one of two states:
//!
//! - parametric: the matrix follows its parameters on every update;
//! - fused: the result of [`Transformation::melt`], a constant matrix that no
//!   update changes anymore.
//!
//! Elements share transformations through [`TransformHandle`]s.

mod kinds;
mod param;

pub use param::{NodeValues, Param, ParamFn};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// A transformation shared between the elements it is bound to.
pub type TransformHandle = Arc<RwLock<Transformation>>;

/// The closed set of transformation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformType {
    Translate,
    Scale,
    Reflect,
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
    Shear,
    Generic,
    Matrix,
}

impl TransformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Scale => "scale",
            Self::Reflect => "reflect",
            Self::Rotate => "rotate",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Shear => "shear",
            Self::Generic => "generic",
            Self::Matrix => "matrix",
        }
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "translate" => Self::Translate,
            "scale" => Self::Scale,
            "reflect" => Self::Reflect,
            "rotate" => Self::Rotate,
            "rotateX" => Self::RotateX,
            "rotateY" => Self::RotateY,
            "rotateZ" => Self::RotateZ,
            "shear" => Self::Shear,
            "generic" => Self::Generic,
            "matrix" => Self::Matrix,
            other => return Err(Error::UnknownTransformType(other.to_string())),
        })
    }
}

/// Plane or space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    D2,
    D3,
}

impl Dim {
    /// Side length of the homogeneous matrix.
    pub fn size(self) -> usize {
        match self {
            Self::D2 => 3,
            Self::D3 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::D2 => "2D",
            Self::D3 => "3D",
        }
    }

    /// The dimension whose homogeneous vectors have `len` entries.
    pub fn from_coords_len(len: usize) -> Option<Self> {
        match len {
            3 => Some(Self::D2),
            4 => Some(Self::D3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    /// `kind` is the kind after desugaring (`rotateX` becomes `rotate`).
    Parametric { kind: TransformType, params: Vec<Param> },
    FusedConstant,
}

/// A homogeneous matrix transform.
#[derive(Debug, Clone)]
pub struct Transformation {
    kind: TransformType,
    dim: Dim,
    state: State,
    matrix: DMatrix<f64>,
    is_numeric_matrix: bool,
}

impl Transformation {
    /// Builds a transformation, checking the parameter count for `kind` in
    /// `dim`. The matrix is the identity until the first update.
    pub fn new(kind: TransformType, params: Vec<Param>, dim: Dim) -> Result<Self> {
        let (accepted, expected) = kinds::arity(kind, dim).ok_or(Error::UnsupportedTransform {
            kind: kind.as_str(),
            dim: dim.name(),
        })?;
        if !accepted.contains(&params.len()) {
            return Err(Error::Arity {
                kind: kind.as_str(),
                dim: dim.name(),
                expected,
                got: params.len(),
            });
        }
        if kind == TransformType::Matrix {
            kinds::check_matrix_shape(&params[0], dim)?;
        }

        let is_numeric_matrix = params.iter().all(Param::is_numeric);
        let (base, params) = desugar(kind, params);
        let n = dim.size();

        Ok(Self {
            kind,
            dim,
            state: State::Parametric { kind: base, params },
            matrix: DMatrix::identity(n, n),
            is_numeric_matrix,
        })
    }

    /// Builds a transformation from a type tag such as `"rotateX"`.
    pub fn from_type_str(kind: &str, params: Vec<Param>, dim: Dim) -> Result<Self> {
        Self::new(kind.parse()?, params, dim)
    }

    pub fn translate(x: impl Into<Param>, y: impl Into<Param>) -> Result<Self> {
        Self::new(TransformType::Translate, vec![x.into(), y.into()], Dim::D2)
    }

    pub fn scale(x: impl Into<Param>, y: impl Into<Param>) -> Result<Self> {
        Self::new(TransformType::Scale, vec![x.into(), y.into()], Dim::D2)
    }

    /// Rotation of the plane by `angle` around the origin.
    pub fn rotate(angle: impl Into<Param>) -> Result<Self> {
        Self::new(TransformType::Rotate, vec![angle.into()], Dim::D2)
    }

    /// Rotation of the plane by `angle` around `center`.
    pub fn rotate_around(angle: impl Into<Param>, center: impl Into<Param>) -> Result<Self> {
        Self::new(TransformType::Rotate, vec![angle.into(), center.into()], Dim::D2)
    }

    /// Wraps the transformation for binding to elements.
    pub fn into_handle(self) -> TransformHandle {
        Arc::new(RwLock::new(self))
    }

    /// The kind the transformation was built as.
    pub fn kind(&self) -> TransformType {
        self.kind
    }

    pub fn dim(&self) -> Dim {
        self.dim
    }

    /// The matrix as of the last update.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// True if every parameter is a plain number, or the transformation has
    /// been fused into a constant.
    pub fn is_numeric_matrix(&self) -> bool {
        self.is_numeric_matrix
    }

    pub fn is_fused(&self) -> bool {
        matches!(self.state, State::FusedConstant)
    }

    /// Parameters after desugaring; empty once fused.
    pub fn params(&self) -> &[Param] {
        match &self.state {
            State::Parametric { params, .. } => params,
            State::FusedConstant => &[],
        }
    }

    /// Elements whose values the parameters read.
    pub fn dependencies(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for p in self.params() {
            p.collect_nodes(&mut out);
        }
        out
    }

    /// Recomputes the matrix from the current parameter values. A fused
    /// transformation keeps its matrix.
    pub fn update(&mut self, values: &dyn NodeValues) -> Result<()> {
        if let State::Parametric { kind, params } = &self.state {
            self.matrix = kinds::build(*kind, params, self.dim, values)?;
        }
        Ok(())
    }

    /// Updates the matrix and returns `matrix * coords`.
    pub fn apply_to(&mut self, coords: &[f64], values: &dyn NodeValues) -> Result<Vec<f64>> {
        self.update(values)?;
        self.multiply(coords)
    }

    /// `matrix * coords` with the matrix as it is.
    pub fn multiply(&self, coords: &[f64]) -> Result<Vec<f64>> {
        let n = self.dim.size();
        if coords.len() != n {
            return Err(Error::DimensionMismatch {
                matrix: n,
                coords: coords.len(),
            });
        }
        let v = &self.matrix * DVector::from_column_slice(coords);
        Ok(v.as_slice().to_vec())
    }

    /// Fuses `other` into `self`: afterwards `self` applies its old matrix
    /// first and `other`'s second, as one constant matrix.
    ///
    /// Both matrices are updated before fusing. If either depends on live
    /// parameters the result is a snapshot of their current values.
    pub fn melt(&mut self, other: &mut Transformation, values: &dyn NodeValues) -> Result<()> {
        if self.dim != other.dim {
            return Err(Error::DimensionMismatch {
                matrix: self.dim.size(),
                coords: other.dim.size(),
            });
        }
        self.update(values)?;
        other.update(values)?;
        self.matrix = &other.matrix * &self.matrix;
        self.state = State::FusedConstant;
        self.is_numeric_matrix = true;
        Ok(())
    }
}

// rotateX/Y/Z are rotate with a fixed axis
fn desugar(kind: TransformType, mut params: Vec<Param>) -> (TransformType, Vec<Param>) {
    let axis = match kind {
        TransformType::RotateX => vec![1.0, 0.0, 0.0],
        TransformType::RotateY => vec![0.0, 1.0, 0.0],
        TransformType::RotateZ => vec![0.0, 0.0, 1.0],
        _ => return (kind, params),
    };
    params.insert(1, Param::from(axis));
    (TransformType::Rotate, params)
}
