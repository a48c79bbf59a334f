//! Integration Tests for the Update Engine
//!
//! These tests drive whole constructions through a board: dragging, batching,
//! transformations and snapshots.

use std::f64::consts::PI;

use jxg_core::board::Board;
use jxg_core::config::{BoardConfig, UpdateOrder};
use jxg_core::element::Value;
use jxg_core::error::Error;
use jxg_core::expr::{self, TraceIR};
use jxg_core::interval::{Interval, IntervalContext};
use jxg_core::render::RecordingRenderer;
use jxg_core::transform::{Dim, Param, TransformType, Transformation};

fn close(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
}

/// Dragging a point updates its midpoint and the text showing it in one pass.
#[test]
fn drag_propagates_in_one_pass() {
    let mut board = Board::default();
    let a = board.point(1.0, 1.0).unwrap();
    let c = board.point(3.0, -1.0).unwrap();
    let b = board.midpoint(a, c).unwrap();
    let t = board
        .text(vec![b], |ctx| {
            let p = ctx.parent(0)?;
            Ok(format!("B = ({}, {})", p.x().unwrap_or(f64::NAN), p.y().unwrap_or(f64::NAN)))
        })
        .unwrap();
    assert_eq!(board.value(t).unwrap().as_text(), Some("B = (2, 0)"));

    let updated = board.set_position(a, &[5.0, 5.0]).unwrap();
    assert_eq!(updated, 3);
    assert_eq!(board.value(b).unwrap(), &Value::point2(4.0, 2.0));
    assert_eq!(board.value(t).unwrap().as_text(), Some("B = (4, 2)"));
    // C is untouched
    assert_eq!(board.value(c).unwrap(), &Value::point2(3.0, -1.0));
}

/// Building 20 dependent elements while suspended draws each exactly once.
#[test]
fn suspended_construction_draws_once() {
    let recorder = RecordingRenderer::new();
    let mut board = Board::with_renderer(BoardConfig::default(), recorder.clone());
    let a = board.point(0.0, 0.0).unwrap();
    let b = board.point(8.0, 8.0).unwrap();

    board.suspend_update();
    let mut chain = Vec::new();
    let mut last = a;
    for _ in 0..20 {
        last = board.midpoint(last, b).unwrap();
        chain.push(last);
    }
    // values stay current while nothing is drawn
    board.set_position(a, &[-8.0, -8.0]).unwrap();
    assert!(chain.iter().all(|&id| recorder.count(id) == 0));
    board.unsuspend_update();

    assert!(chain.iter().all(|&id| recorder.count(id) == 1));
    assert_eq!(board.value(chain[0]).unwrap(), &Value::point2(0.0, 0.0));
}

/// Polyhedron faces are built in one batch and follow their vertices.
#[test]
fn polyhedron_faces_follow_vertices() {
    let recorder = RecordingRenderer::new();
    let mut board = Board::with_renderer(BoardConfig::default(), recorder.clone());
    let v: Vec<_> = [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0)]
        .into_iter()
        .map(|(x, y, z)| board.point3(x, y, z).unwrap())
        .collect();
    let (mesh, faces) = board
        .polyhedron_faces(v.clone(), vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3], vec![1, 2, 3]])
        .unwrap();
    assert_eq!(recorder.count(mesh), 1);
    assert!(faces.iter().all(|&f| recorder.count(f) == 1));

    recorder.clear();
    board.set_position(v[0], &[0.0, 0.0, -1.0]).unwrap();

    // the mesh is refreshed before any face reads it
    let drawn = recorder.drawn();
    let mesh_at = drawn.iter().position(|&id| id == mesh).unwrap();
    assert!(faces
        .iter()
        .all(|f| drawn.iter().position(|id| id == f).unwrap() > mesh_at));

    let Value::Face { d, normal, .. } = board.value(faces[0]).unwrap() else {
        panic!("not a face");
    };
    // plane through (0,0,-1), (1,0,0), (0,1,0)
    let n = normal.as_slice();
    assert!((n[0] - n[1]).abs() < 1e-12 && (n[0] + n[2]).abs() < 1e-12);
    assert!((d - n[0]).abs() < 1e-12);
}

/// A translate needs exactly two parameters in the plane.
#[test]
fn transform_arity_validation() {
    for params in [vec![1.0.into()], vec![1.0.into(), 2.0.into(), 3.0.into()]] {
        assert!(matches!(
            Transformation::new(TransformType::Translate, params, Dim::D2),
            Err(Error::Arity { .. })
        ));
    }

    let mut t = Transformation::translate(4.0, -2.0).unwrap();
    t.update(&()).unwrap();
    let m = t.matrix();
    assert_eq!(m[(1, 0)], 4.0);
    assert_eq!(m[(2, 0)], -2.0);
    assert_eq!(m[(0, 0)], 1.0);
    assert_eq!(m[(1, 1)], 1.0);
    assert_eq!(m[(0, 1)], 0.0);

    assert!(matches!(
        Transformation::from_type_str("skew", vec![], Dim::D2),
        Err(Error::UnknownTransformType(_))
    ));
}

/// Rotating the center of a rotation leaves it in place.
#[test]
fn rotation_fixes_its_center() {
    for angle in [0.1, 1.0, PI / 2.0, PI, 5.0] {
        let mut t = Transformation::rotate_around(angle, Param::from(vec![2.0, -3.0])).unwrap();
        let image = t.apply_to(&[1.0, 2.0, -3.0], &()).unwrap();
        assert!(close(&image, &[1.0, 2.0, -3.0]), "angle {angle}: {image:?}");
    }
}

/// Melting B into A applies A first, then B.
#[test]
fn melt_composes_in_order() {
    let p = [1.0, 2.0, -1.0];
    let cases: Vec<(Transformation, Transformation)> = vec![
        (Transformation::rotate(0.7).unwrap(), Transformation::translate(1.0, 2.0).unwrap()),
        (Transformation::translate(3.0, 0.0).unwrap(), Transformation::scale(2.0, -1.0).unwrap()),
        (Transformation::scale(0.5, 4.0).unwrap(), Transformation::rotate(-1.2).unwrap()),
    ];
    for (a, mut b) in cases {
        let mut a_orig = a.clone();
        let expected = b.apply_to(&a_orig.apply_to(&p, &()).unwrap(), &()).unwrap();

        let mut fused = a;
        fused.melt(&mut b, &()).unwrap();
        let got = fused.apply_to(&p, &()).unwrap();
        assert!(close(&got, &expected), "{got:?} != {expected:?}");
    }
}

/// `melt_to` keeps one transformation per point and does not leak into
/// transformations shared with other points.
#[test]
fn melt_to_and_set_position_by_transform() {
    let mut board = Board::default();
    let a = board.point(1.0, 0.0).unwrap();
    let b = board.point(1.0, 0.0).unwrap();
    let rot = board.transform(TransformType::Rotate, vec![(PI / 2.0).into()]).unwrap();
    board.bind_transform(&rot, &[a, b]).unwrap();

    board.set_position_by_transform(a, &[1.0, 1.0]).unwrap();
    assert_eq!(board.element(a).unwrap().transforms().len(), 1);
    assert!(close(board.value(a).unwrap().numeric(), &[1.0, 1.0, 2.0]));
    assert!(close(board.value(b).unwrap().numeric(), &[1.0, 0.0, 1.0]));

    let shift = board.transform(TransformType::Translate, vec![0.0.into(), (-2.0).into()]).unwrap();
    board.melt_to(&shift, &[a, b]).unwrap();
    assert!(close(board.value(a).unwrap().numeric(), &[1.0, 1.0, 0.0]));
    assert!(close(board.value(b).unwrap().numeric(), &[1.0, 0.0, -1.0]));
    assert!(!rot.read().is_fused());
}

/// Edges that would close a cycle are rejected and leave the graph intact.
#[test]
fn cycles_are_rejected() {
    let mut board = Board::default();
    let a = board.point(0.0, 0.0).unwrap();
    let b = board.point(1.0, 0.0).unwrap();
    let m = board.midpoint(a, b).unwrap();
    let l = board.line(a, m).unwrap();

    assert!(matches!(board.register_edge(l, a), Err(Error::Cycle(_))));
    assert!(!board.graph().get_node(l).unwrap().children().contains(&a));
    board.set_position(a, &[2.0, 2.0]).unwrap();
    assert_eq!(board.value(m).unwrap(), &Value::point2(1.5, 1.0));
}

/// In registration order an element registered before one of its
/// dependencies lags one pass behind; the topological order does not.
#[test]
fn registration_and_topological_order() {
    for (order, fresh_after_one_pass) in [(UpdateOrder::Topological, true), (UpdateOrder::Registration, false)] {
        let mut board = Board::new(BoardConfig::default().with_update_order(order));
        let p = board.point(0.0, 0.0).unwrap();
        let dx = board.slider(1.0).unwrap();
        let t = board.transform(TransformType::Translate, vec![dx.into(), 0.0.into()]).unwrap();
        board.bind_transform(&t, &[p]).unwrap();
        assert_eq!(board.value(p).unwrap(), &Value::point2(1.0, 0.0));

        board.set_value(dx, Value::Scalar(3.0)).unwrap();
        let fresh = board.value(p).unwrap() == &Value::point2(3.0, 0.0);
        assert_eq!(fresh, fresh_after_one_pass, "{order:?}");

        board.update().unwrap();
        assert_eq!(board.value(p).unwrap(), &Value::point2(3.0, 0.0), "{order:?}");
    }
}

/// Degenerate states hide elements instead of failing.
#[test]
fn nan_hides_elements() {
    let mut board = Board::default();
    let s = board.slider(4.0).unwrap();
    let p = board
        .point_fn(vec![s], |ctx| Ok(vec![ctx.scalar(0)?.sqrt(), 0.0]))
        .unwrap();
    let q = board.point(0.0, 2.0).unwrap();
    let m = board.midpoint(p, q).unwrap();
    assert!(board.element(m).unwrap().is_visible());

    board.set_value(s, Value::Scalar(-1.0)).unwrap();
    assert!(!board.element(p).unwrap().is_visible());
    assert!(!board.element(m).unwrap().is_visible());

    board.set_value(s, Value::Scalar(16.0)).unwrap();
    assert!(board.element(m).unwrap().is_visible());
    assert_eq!(board.value(m).unwrap(), &Value::point2(2.0, 1.0));

    // parallel lines meet at infinity, which is not NaN
    let a = board.point(0.0, 0.0).unwrap();
    let b = board.point(1.0, 0.0).unwrap();
    let c = board.point(0.0, 1.0).unwrap();
    let d = board.point(1.0, 1.0).unwrap();
    let l1 = board.line(a, b).unwrap();
    let l2 = board.line(c, d).unwrap();
    let x = board.intersection(l1, l2).unwrap();
    assert!(board.element(x).unwrap().is_visible());
    assert_eq!(board.value(x).unwrap().numeric()[0], 0.0);
}

/// Removing an element removes everything built on it.
#[test]
fn remove_and_select() {
    let mut board = Board::default();
    let a = board.point(0.0, 0.0).unwrap();
    let b = board.point(2.0, 0.0).unwrap();
    let m = board.midpoint(a, b).unwrap();
    let k = board.circle(m, b).unwrap();
    board.set_name(a, "A").unwrap();
    board.set_name(k, "k").unwrap();
    assert_eq!(board.select("k"), Some(k));

    let removed = board.remove(a).unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(board.ids(), vec![b]);
    assert_eq!(board.select("A"), None);
    assert_eq!(board.select("k"), None);
    assert!(matches!(board.set_position(a, &[1.0, 1.0]), Err(Error::UnknownNode(_))));
}

/// Snapshots survive both encodings and restore the whole construction.
#[test]
fn snapshot_roundtrip() {
    let mut board = Board::default();
    let a = board.point(0.0, 0.0).unwrap();
    let r = board.slider(2.0).unwrap();
    let k = board.circle_slider(a, r).unwrap();
    let snap = board.snapshot();

    board.set_position(a, &[3.0, 3.0]).unwrap();
    board.set_value(r, Value::Scalar(7.0)).unwrap();

    let json = snap.to_json().unwrap();
    let restored = jxg_core::Snapshot::from_json(&json).unwrap();
    assert_eq!(restored, snap);
    let bytes = snap.to_msgpack().unwrap();
    assert_eq!(jxg_core::Snapshot::from_msgpack(&bytes).unwrap(), snap);

    board.restore(&restored).unwrap();
    let Value::Circle { center, radius } = board.value(k).unwrap() else {
        panic!("not a circle");
    };
    assert_eq!(center.as_slice(), &[1.0, 0.0, 0.0]);
    assert_eq!(*radius, 2.0);
}

/// The board's rounding mode is what expressions are evaluated with.
#[test]
fn board_rounding_reaches_expressions() {
    let ir = TraceIR::from_json(
        r#"{
        "inputs": {"x": 1},
        "output": 3,
        "ops": [
            {"op": "load", "result": 1, "operands": ["x"]},
            {"op": "const", "result": 2, "operands": [0.1]},
            {"op": "add", "result": 3, "operands": [1, 2]}
        ]
    }"#,
    )
    .unwrap();

    let exact = Board::new(BoardConfig::default().with_rounding(jxg_core::interval::Rounding::Disabled));
    let r = expr::eval_interval(&ir, &exact.interval_context(), &[Interval::singleton(0.2)]).unwrap();
    assert!(r.is_singleton());

    let outward = Board::default();
    let r = expr::eval_interval(&ir, &outward.interval_context(), &[Interval::singleton(0.2)]).unwrap();
    assert!(r.lo < r.hi);
    assert!(r.has_value(0.2 + 0.1));
    assert_eq!(outward.interval_context(), IntervalContext::outward());
}
