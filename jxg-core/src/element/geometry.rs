//! Plane elements: points, lines, circles and texts.

use nalgebra::{DVector, Vector3};

use super::{Behavior, UpdateContext, Value};
use crate::error::{Error, Result};
use crate::transform::TransformHandle;

type ValueFn = dyn Fn(&UpdateContext<'_>) -> Result<Value> + Send + Sync;
type TextFn = dyn Fn(&UpdateContext<'_>) -> Result<String> + Send + Sync;

fn euclidean(c: &DVector<f64>) -> impl Iterator<Item = f64> + '_ {
    let w = c[0];
    c.iter().skip(1).map(move |v| v / w)
}

fn as_vector3(ctx: &UpdateContext<'_>, c: &DVector<f64>, what: &'static str) -> Result<Vector3<f64>> {
    if c.len() != 3 {
        return Err(Error::InvalidParam {
            kind: what,
            reason: format!("needs plane coordinates, element {:?} has {}", ctx.id(), c.len()),
        });
    }
    Ok(Vector3::new(c[0], c[1], c[2]))
}

/// An element whose value is set from outside: a draggable point or a
/// slider value.
#[derive(Debug, Clone, Copy)]
pub struct Free {
    name: &'static str,
}

impl Free {
    pub fn point() -> Self {
        Self { name: "point" }
    }

    pub fn slider() -> Self {
        Self { name: "slider" }
    }
}

impl Behavior for Free {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        Ok(ctx.base().clone())
    }
}

/// Midpoint of two points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl Behavior for Midpoint {
    fn type_name(&self) -> &'static str {
        "midpoint"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let a = ctx.point(0)?;
        let b = ctx.point(1)?;
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                matrix: a.len(),
                coords: b.len(),
            });
        }
        let coords = std::iter::once(1.0)
            .chain(euclidean(a).zip(euclidean(b)).map(|(p, q)| 0.5 * (p + q)))
            .collect();
        Ok(Value::Point(DVector::from_vec(coords)))
    }
}

/// The line through two points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Join;

impl Behavior for Join {
    fn type_name(&self) -> &'static str {
        "line"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let p = as_vector3(ctx, ctx.point(0)?, "line")?;
        let q = as_vector3(ctx, ctx.point(1)?, "line")?;
        Ok(Value::Line(DVector::from_column_slice(p.cross(&q).as_slice())))
    }
}

/// The intersection point of two lines; a point at infinity for parallel
/// lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Meet;

impl Behavior for Meet {
    fn type_name(&self) -> &'static str {
        "intersection"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let l = as_vector3(ctx, ctx.line(0)?, "intersection")?;
        let m = as_vector3(ctx, ctx.line(1)?, "intersection")?;
        let mut p = l.cross(&m);
        let w = p[0];
        if w != 0.0 {
            p /= w;
        }
        Ok(Value::Point(DVector::from_column_slice(p.as_slice())))
    }
}

/// Where a circle's radius comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Radius {
    /// Distance from the center (parent 0) to a point (parent 1).
    Through,
    /// The value of a number element (parent 1).
    Parent,
    Fixed(f64),
}

/// A circle around the point in parent 0.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub radius: Radius,
}

impl Behavior for Circle {
    fn type_name(&self) -> &'static str {
        "circle"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let center = ctx.point(0)?;
        let radius = match self.radius {
            Radius::Fixed(r) => r,
            Radius::Parent => ctx.scalar(1)?,
            Radius::Through => {
                let p = ctx.point(1)?;
                euclidean(center)
                    .zip(euclidean(p))
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt()
            }
        };
        Ok(Value::Circle {
            center: center.clone(),
            radius,
        })
    }
}

/// An element computed by a closure over its parents, e.g. a point whose
/// coordinates are functions of sliders.
pub struct Computed {
    name: &'static str,
    f: Box<ValueFn>,
}

impl Computed {
    pub fn new(
        name: &'static str,
        f: impl Fn(&UpdateContext<'_>) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self { name, f: Box::new(f) }
    }
}

impl Behavior for Computed {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        (self.f)(ctx)
    }
}

/// A text whose content is formatted from its parents.
pub struct Text {
    format: Box<TextFn>,
}

impl Text {
    pub fn new(format: impl Fn(&UpdateContext<'_>) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            format: Box::new(format),
        }
    }
}

impl Behavior for Text {
    fn type_name(&self) -> &'static str {
        "text"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        (self.format)(ctx).map(Value::Text)
    }
}

/// The image of the point in parent 0 under a transformation.
pub struct TransformedPoint {
    transform: TransformHandle,
}

impl TransformedPoint {
    pub fn new(transform: TransformHandle) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &TransformHandle {
        &self.transform
    }
}

impl Behavior for TransformedPoint {
    fn type_name(&self) -> &'static str {
        "point"
    }

    fn compute(&self, ctx: &UpdateContext<'_>) -> Result<Value> {
        let p = ctx.point(0)?;
        let image = self.transform.write().apply_to(p.as_slice(), ctx)?;
        Ok(Value::Point(DVector::from_vec(image)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::element::ValueLookup;
    use crate::graph::NodeId;
    use crate::transform::Transformation;

    struct Values(HashMap<NodeId, Value>);

    impl ValueLookup for Values {
        fn value(&self, id: NodeId) -> Option<&Value> {
            self.0.get(&id)
        }
    }

    fn run(behavior: &dyn Behavior, parents: &[(NodeId, Value)]) -> Result<Value> {
        let values = Values(parents.iter().cloned().collect());
        let ids: Vec<_> = parents.iter().map(|(id, _)| *id).collect();
        let base = Value::Scalar(0.0);
        let ctx = UpdateContext::new(behavior.type_name(), NodeId::new(), &ids, &base, &values);
        behavior.compute(&ctx)
    }

    fn pt(x: f64, y: f64) -> (NodeId, Value) {
        (NodeId::new(), Value::point2(x, y))
    }

    #[test]
    fn midpoint_of_two_points() {
        let m = run(&Midpoint, &[pt(0.0, 0.0), pt(4.0, 2.0)]).unwrap();
        assert_eq!(m, Value::point2(2.0, 1.0));
    }

    #[test]
    fn midpoint_rejects_wrong_parent() {
        let err = run(&Midpoint, &[pt(0.0, 0.0), (NodeId::new(), Value::Scalar(1.0))]).unwrap_err();
        assert!(matches!(
            err,
            Error::ParentType { index: 1, expected: "point", found: "number", .. }
        ));
    }

    #[test]
    fn join_and_meet() {
        let l = run(&Join, &[pt(0.0, 0.0), pt(1.0, 1.0)]).unwrap();
        let m = run(&Join, &[pt(0.0, 2.0), pt(2.0, 0.0)]).unwrap();
        let p = run(&Meet, &[(NodeId::new(), l), (NodeId::new(), m)]).unwrap();
        assert_eq!(p.x(), Some(1.0));
        assert_eq!(p.y(), Some(1.0));
    }

    #[test]
    fn parallel_lines_meet_at_infinity() {
        let l = run(&Join, &[pt(0.0, 0.0), pt(1.0, 0.0)]).unwrap();
        let m = run(&Join, &[pt(0.0, 1.0), pt(1.0, 1.0)]).unwrap();
        let p = run(&Meet, &[(NodeId::new(), l), (NodeId::new(), m)]).unwrap();
        assert_eq!(p.numeric()[0], 0.0);
        assert!(!p.has_nan());
    }

    #[test]
    fn circle_radius_sources() {
        let through = Circle { radius: Radius::Through };
        let c = run(&through, &[pt(1.0, 1.0), pt(4.0, 5.0)]).unwrap();
        assert!(matches!(c, Value::Circle { radius, .. } if radius == 5.0));

        let from_slider = Circle { radius: Radius::Parent };
        let c = run(&from_slider, &[pt(0.0, 0.0), (NodeId::new(), Value::Scalar(2.5))]).unwrap();
        assert!(matches!(c, Value::Circle { radius, .. } if radius == 2.5));
    }

    #[test]
    fn text_formats_parent() {
        let text = Text::new(|ctx| {
            let p = ctx.parent(0)?;
            Ok(format!("({:.1}, {:.1})", p.x().unwrap_or(f64::NAN), p.y().unwrap_or(f64::NAN)))
        });
        let t = run(&text, &[pt(2.5, -1.0)]).unwrap();
        assert_eq!(t.as_text(), Some("(2.5, -1.0)"));
    }

    #[test]
    fn transformed_point_follows_transform() {
        let t = Transformation::translate(1.0, -1.0).unwrap().into_handle();
        let image = run(&TransformedPoint::new(t), &[pt(2.0, 3.0)]).unwrap();
        assert_eq!(image, Value::point2(3.0, 2.0));
    }
}
