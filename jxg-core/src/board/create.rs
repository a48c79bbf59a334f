//! Element factories.
//!
//! Each factory builds a behavior, checks its parents and registers the new
//! element after them, so construction order is dependency order.

use nalgebra::DVector;

use super::Board;
use crate::element::{
    Circle, Computed, Face3D, Free, Join, Meet, Midpoint, PolyhedronMesh, Radius, Text,
    TransformedPoint, UpdateContext, Value,
};
use crate::error::{Error, Result};
use crate::expr::{self, TraceIR};
use crate::graph::NodeId;
use crate::transform::{Dim, Param, TransformHandle, TransformType, Transformation};

impl Board {
    /// A free point of the plane.
    pub fn point(&mut self, x: f64, y: f64) -> Result<NodeId> {
        self.add_free(Free::point(), Value::point2(x, y))
    }

    /// A free point of space.
    pub fn point3(&mut self, x: f64, y: f64, z: f64) -> Result<NodeId> {
        self.add_free(Free::point(), Value::point3(x, y, z))
    }

    /// A free number, e.g. the value of a slider.
    pub fn slider(&mut self, value: f64) -> Result<NodeId> {
        self.add_free(Free::slider(), Value::Scalar(value))
    }

    /// A point whose coordinates are computed from `parents`. `f` returns
    /// Euclidean coordinates.
    pub fn point_fn(
        &mut self,
        parents: Vec<NodeId>,
        f: impl Fn(&UpdateContext<'_>) -> Result<Vec<f64>> + Send + Sync + 'static,
    ) -> Result<NodeId> {
        let behavior = Computed::new("point", move |ctx| {
            let coords = f(ctx)?;
            Ok(Value::Point(DVector::from_vec(
                std::iter::once(1.0).chain(coords).collect(),
            )))
        });
        self.add_derived(parents, behavior)
    }

    pub fn midpoint(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.add_derived(vec![a, b], Midpoint)
    }

    /// The line through two points.
    pub fn line(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.add_derived(vec![a, b], Join)
    }

    /// The intersection of two lines.
    pub fn intersection(&mut self, l: NodeId, m: NodeId) -> Result<NodeId> {
        self.add_derived(vec![l, m], Meet)
    }

    /// Circle around `center` through the point `through`.
    pub fn circle(&mut self, center: NodeId, through: NodeId) -> Result<NodeId> {
        self.add_derived(vec![center, through], Circle { radius: Radius::Through })
    }

    pub fn circle_radius(&mut self, center: NodeId, radius: f64) -> Result<NodeId> {
        self.add_derived(vec![center], Circle { radius: Radius::Fixed(radius) })
    }

    /// Circle around `center` whose radius is the number element `radius`.
    pub fn circle_slider(&mut self, center: NodeId, radius: NodeId) -> Result<NodeId> {
        self.add_derived(vec![center, radius], Circle { radius: Radius::Parent })
    }

    /// A number computed by an expression. Input `i` of `ir` (by position)
    /// reads the number element `parents[i]`.
    pub fn expression(&mut self, parents: Vec<NodeId>, ir: TraceIR) -> Result<NodeId> {
        if ir.num_inputs() != parents.len() {
            return Err(Error::Eval(format!(
                "expression has {} inputs, got {} parents",
                ir.num_inputs(),
                parents.len()
            )));
        }
        let behavior = Computed::new("expression", move |ctx| {
            let inputs = (0..ctx.parent_count())
                .map(|i| ctx.scalar(i))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Scalar(expr::eval(&ir, &inputs)?))
        });
        self.add_derived(parents, behavior)
    }

    /// A text formatted from `parents`.
    pub fn text(
        &mut self,
        parents: Vec<NodeId>,
        format: impl Fn(&UpdateContext<'_>) -> Result<String> + Send + Sync + 'static,
    ) -> Result<NodeId> {
        self.add_derived(parents, Text::new(format))
    }

    /// A plane transformation. Its parameters may read elements of this
    /// board by id.
    pub fn transform(&self, kind: TransformType, params: Vec<Param>) -> Result<TransformHandle> {
        Ok(Transformation::new(kind, params, Dim::D2)?.into_handle())
    }

    pub fn transform3(&self, kind: TransformType, params: Vec<Param>) -> Result<TransformHandle> {
        Ok(Transformation::new(kind, params, Dim::D3)?.into_handle())
    }

    /// The image of `point` under `t`, kept up to date when either the
    /// point or anything `t` reads changes.
    pub fn transformed_point(&mut self, point: NodeId, t: &TransformHandle) -> Result<NodeId> {
        let mut parents = vec![point];
        for dep in t.read().dependencies() {
            if !parents.contains(&dep) {
                parents.push(dep);
            }
        }
        self.add_derived(parents, TransformedPoint::new(t.clone()))
    }

    /// The vertex mesh of a polyhedron with the given 3D points as vertices.
    pub fn polyhedron(&mut self, vertices: Vec<NodeId>) -> Result<NodeId> {
        self.add_derived(vertices, PolyhedronMesh)
    }

    /// One face of the polyhedron `mesh`, by vertex indices.
    pub fn face(&mut self, mesh: NodeId, indices: Vec<usize>) -> Result<NodeId> {
        let eps = self.config.eps;
        self.add_derived(vec![mesh], Face3D::new(indices, eps))
    }

    /// A polyhedron and all its faces, built as one batch so each face is
    /// drawn once.
    pub fn polyhedron_faces(
        &mut self,
        vertices: Vec<NodeId>,
        faces: Vec<Vec<usize>>,
    ) -> Result<(NodeId, Vec<NodeId>)> {
        self.batch(|board| {
            let mesh = board.polyhedron(vertices)?;
            let faces = faces
                .into_iter()
                .map(|indices| board.face(mesh, indices))
                .collect::<Result<Vec<_>>>()?;
            Ok((mesh, faces))
        })
    }
}
