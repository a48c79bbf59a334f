use nalgebra::{DVector, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// The numeric state of an element.
///
/// Points carry homogeneous coordinates `[w, x, y]` or `[w, x, y, z]`; a
/// point at infinity has `w = 0`. Lines carry their standard form
/// `[c, a, b]` for `c + a x + b y = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Point(DVector<f64>),
    Line(DVector<f64>),
    Circle { center: DVector<f64>, radius: f64 },
    Scalar(f64),
    Text(String),
    /// Vertex coordinates shared by the faces of a polyhedron.
    Mesh(Vec<Point3<f64>>),
    /// A planar face: its vertices, unit normal and plane offset `d`, so the
    /// plane is `normal . p = d`.
    Face {
        vertices: Vec<Point3<f64>>,
        normal: Vector3<f64>,
        d: f64,
    },
}

impl Value {
    /// A finite point of the plane.
    pub fn point2(x: f64, y: f64) -> Self {
        Self::Point(DVector::from_vec(vec![1.0, x, y]))
    }

    /// A finite point of space.
    pub fn point3(x: f64, y: f64, z: f64) -> Self {
        Self::Point(DVector::from_vec(vec![1.0, x, y, z]))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Line(_) => "line",
            Self::Circle { .. } => "circle",
            Self::Scalar(_) => "number",
            Self::Text(_) => "text",
            Self::Mesh(_) => "mesh",
            Self::Face { .. } => "face",
        }
    }

    /// The flat numbers other elements and transformations read: point
    /// coordinates, line coefficients, a circle's center, a scalar. Empty for
    /// text, meshes and faces.
    pub fn numeric(&self) -> &[f64] {
        match self {
            Self::Point(c) | Self::Line(c) => c.as_slice(),
            Self::Circle { center, .. } => center.as_slice(),
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Text(_) | Self::Mesh(_) | Self::Face { .. } => &[],
        }
    }

    /// Same variant and, for coordinate values, the same number of
    /// coordinates.
    pub fn same_shape(&self, other: &Value) -> bool {
        self.type_name() == other.type_name() && self.numeric().len() == other.numeric().len()
    }

    /// True if any number in the value is NaN.
    pub fn has_nan(&self) -> bool {
        match self {
            Self::Point(c) | Self::Line(c) => c.iter().any(|v| v.is_nan()),
            Self::Circle { center, radius } => radius.is_nan() || center.iter().any(|v| v.is_nan()),
            Self::Scalar(v) => v.is_nan(),
            Self::Text(_) => false,
            Self::Mesh(vertices) => vertices.iter().any(|p| p.coords.iter().any(|v| v.is_nan())),
            Self::Face { vertices, normal, d } => {
                d.is_nan()
                    || normal.iter().any(|v| v.is_nan())
                    || vertices.iter().any(|p| p.coords.iter().any(|v| v.is_nan()))
            }
        }
    }

    /// Euclidean coordinates of a point (`[x, y]` or `[x, y, z]`).
    pub fn euclidean(&self) -> Option<Vec<f64>> {
        match self {
            Self::Point(c) if !c.is_empty() => {
                let w = c[0];
                Some(c.iter().skip(1).map(|v| v / w).collect())
            }
            _ => None,
        }
    }

    /// `x` of a point.
    pub fn x(&self) -> Option<f64> {
        self.euclidean().and_then(|e| e.first().copied())
    }

    /// `y` of a point.
    pub fn y(&self) -> Option<f64> {
        self.euclidean().and_then(|e| e.get(1).copied())
    }

    pub fn z(&self) -> Option<f64> {
        self.euclidean().and_then(|e| e.get(2).copied())
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}
