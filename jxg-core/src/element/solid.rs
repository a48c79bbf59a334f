//! Polyhedra.
//!
//! A polyhedron is split in two kinds of nodes. The [`PolyhedronMesh`] owns
//! the vertex coordinates and depends on the vertex points. Each [`Face3D`]
//! depends on the mesh alone and reads its vertices by index, so every face
//! of a polyhedron sees the same, already refreshed, coordinates.

use nalgebra::{Point3, Vector3};

use super::{Behavior, UpdateContext, Value};
use crate::error::{Error, Result};

/// Collects the vertex points of a polyhedron (all parents, in order).
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyhedronMesh;

impl Behavior for PolyhedronMesh {
    fn type_name(&self) -> &'static str {
        "polyhedron"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let vertices = (0..ctx.parent_count())
            .map(|i| {
                let c = ctx.point(i)?;
                if c.len() != 4 {
                    return Err(Error::ParentType {
                        element: self.type_name(),
                        index: i,
                        expected: "3D point",
                        found: "2D point",
                    });
                }
                Ok(Point3::new(c[1] / c[0], c[2] / c[0], c[3] / c[0]))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Mesh(vertices))
    }
}

/// One face of a polyhedron, given by vertex indices into the mesh in
/// parent 0.
#[derive(Debug, Clone)]
pub struct Face3D {
    indices: Vec<usize>,
    eps: f64,
}

impl Face3D {
    /// `eps` is the length below which the normal is left unnormalized.
    pub fn new(indices: Vec<usize>, eps: f64) -> Self {
        Self { indices, eps }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl Behavior for Face3D {
    fn type_name(&self) -> &'static str {
        "face"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let mesh = ctx.mesh(0)?;
        let vertices = self
            .indices
            .iter()
            .map(|&i| {
                mesh.get(i).copied().ok_or_else(|| Error::InvalidParam {
                    kind: "face",
                    reason: format!("vertex index {i} out of range for {} vertices", mesh.len()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // a point or a segment has no plane
        if vertices.len() < 3 {
            return Ok(Value::Face {
                vertices,
                normal: Vector3::zeros(),
                d: 0.0,
            });
        }

        let p1 = vertices[0];
        let mut normal = (vertices[1] - p1).cross(&(vertices[2] - p1));
        let norm = normal.norm();
        if norm.abs() > self.eps * self.eps {
            normal /= norm;
        }
        let d = p1.coords.dot(&normal);

        Ok(Value::Face { vertices, normal, d })
    }
}
