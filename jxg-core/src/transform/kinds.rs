//! Closed-form matrices for each transformation kind.
//!
//! Homogeneous vectors are ordered `(w, x, y)` / `(w, x, y, z)`, so the
//! translation part of a matrix lives in column 0.

use nalgebra::{DMatrix, Vector3};

use super::{Dim, NodeValues, Param, TransformType};
use crate::error::{Error, Result};

/// Accepted parameter counts for `kind` in `dim`, or `None` if the kind does
/// not exist in that dimension.
pub(super) fn arity(kind: TransformType, dim: Dim) -> Option<(&'static [usize], &'static str)> {
    use TransformType::*;
    let counts = |accepted: &'static [usize], text: &'static str| Some((accepted, text));
    match (kind, dim) {
        (Translate | Scale, Dim::D2) => counts(&[2], "2"),
        (Translate | Scale, Dim::D3) => counts(&[3], "3"),
        (Shear, Dim::D2) => counts(&[2], "2"),
        (Reflect, Dim::D2) => counts(&[1, 2, 4], "1, 2 or 4"),
        (Rotate, Dim::D2) => counts(&[1, 2, 3], "1, 2 or 3"),
        (Rotate, Dim::D3) => counts(&[2, 3], "2 or 3"),
        (RotateX | RotateY | RotateZ, Dim::D3) => counts(&[1, 2], "1 or 2"),
        (Generic, Dim::D2) => counts(&[9], "9"),
        (Generic, Dim::D3) => counts(&[16], "16"),
        (Matrix, _) => counts(&[1], "1"),
        (Shear | Reflect | RotateX | RotateY | RotateZ, _) => None,
    }
}

/// Computes the matrix of a (desugared) kind from its current parameters.
pub(super) fn build(
    kind: TransformType,
    params: &[Param],
    dim: Dim,
    values: &dyn NodeValues,
) -> Result<DMatrix<f64>> {
    let name = kind.as_str();
    let n = dim.size();
    let scalar = |i: usize| params[i].scalar(name, values);
    let mut m = DMatrix::identity(n, n);

    match kind {
        TransformType::Translate => {
            for i in 1..n {
                m[(i, 0)] = scalar(i - 1)?;
            }
        }
        TransformType::Scale => {
            for i in 1..n {
                m[(i, i)] = scalar(i - 1)?;
            }
        }
        TransformType::Shear => {
            m[(1, 2)] = scalar(0)?;
            m[(2, 1)] = scalar(1)?;
        }
        TransformType::Generic => {
            for (k, p) in params.iter().enumerate() {
                m[(k / n, k % n)] = p.scalar(name, values)?;
            }
        }
        TransformType::Matrix => {
            let Param::Matrix(rows) = &params[0] else {
                return Err(Error::InvalidParam {
                    kind: name,
                    reason: "expected a matrix".into(),
                });
            };
            for (i, row) in rows.iter().enumerate() {
                for (j, p) in row.iter().enumerate() {
                    m[(i, j)] = p.scalar(name, values)?;
                }
            }
        }
        TransformType::Reflect => {
            let line = reflection_axis(params, values)?;
            reflect_2d(&mut m, line);
        }
        TransformType::Rotate if dim == Dim::D2 => {
            let angle = scalar(0)?;
            let center = match params.len() {
                3 => Some((scalar(1)?, scalar(2)?)),
                2 => {
                    let c = params[1].euclidean(name, dim, values)?;
                    Some((c[0], c[1]))
                }
                _ => None,
            };
            rotate_2d(&mut m, angle, center);
        }
        TransformType::Rotate => {
            let angle = scalar(0)?;
            let axis = params[1].vector(name, 3, values)?;
            let point = match params.get(2) {
                Some(p) => Some(p.euclidean(name, dim, values)?),
                None => None,
            };
            m = rotate_3d(angle, Vector3::new(axis[0], axis[1], axis[2]), point.as_deref());
        }
        TransformType::RotateX | TransformType::RotateY | TransformType::RotateZ => {
            // desugared to Rotate before any update
            return Err(Error::UnsupportedTransform {
                kind: name,
                dim: dim.name(),
            });
        }
    }
    Ok(m)
}

/// Checks a `matrix` parameter against the dimension.
pub(super) fn check_matrix_shape(param: &Param, dim: Dim) -> Result<()> {
    let n = dim.size();
    let Param::Matrix(rows) = param else {
        return Err(Error::InvalidParam {
            kind: TransformType::Matrix.as_str(),
            reason: "expected a matrix".into(),
        });
    };
    let cols = rows.first().map_or(0, Vec::len);
    if rows.len() != n || rows.iter().any(|r| r.len() != n) {
        return Err(Error::MatrixShape {
            expected: n,
            rows: rows.len(),
            cols,
        });
    }
    Ok(())
}

// Homogeneous coordinates [c, a, b] of the mirror line.
fn reflection_axis(params: &[Param], values: &dyn NodeValues) -> Result<Vector3<f64>> {
    let name = TransformType::Reflect.as_str();
    match params.len() {
        1 => {
            let v = params[0].vector(name, 3, values)?;
            Ok(Vector3::new(v[0], v[1], v[2]))
        }
        2 => {
            let p = params[0].euclidean(name, Dim::D2, values)?;
            let q = params[1].euclidean(name, Dim::D2, values)?;
            Ok(Vector3::new(1.0, q[0], q[1]).cross(&Vector3::new(1.0, p[0], p[1])))
        }
        _ => {
            let s = params
                .iter()
                .map(|p| p.scalar(name, values))
                .collect::<Result<Vec<_>>>()?;
            Ok(Vector3::new(1.0, s[2], s[3]).cross(&Vector3::new(1.0, s[0], s[1])))
        }
    }
}

fn reflect_2d(m: &mut DMatrix<f64>, v: Vector3<f64>) {
    // project the origin onto the line
    let (z, x, y) = (v[0], v[1], v[2]);
    let d = x * x + y * y;
    let xoff = -z * x / d;
    let yoff = -z * y / d;

    // direction of the line
    let (dx, dy) = (-v[2], v[1]);

    m[(1, 1)] = (dx * dx - dy * dy) / d;
    m[(1, 2)] = 2.0 * dx * dy / d;
    m[(2, 1)] = m[(1, 2)];
    m[(2, 2)] = -m[(1, 1)];
    m[(1, 0)] = xoff * (1.0 - m[(1, 1)]) - yoff * m[(1, 2)];
    m[(2, 0)] = yoff * (1.0 - m[(2, 2)]) - xoff * m[(2, 1)];
}

fn rotate_2d(m: &mut DMatrix<f64>, angle: f64, center: Option<(f64, f64)>) {
    let (si, co) = angle.sin_cos();
    m[(1, 1)] = co;
    m[(1, 2)] = -si;
    m[(2, 1)] = si;
    m[(2, 2)] = co;

    if let Some((x, y)) = center {
        m[(1, 0)] = x * (1.0 - co) + y * si;
        m[(2, 0)] = y * (1.0 - co) - x * si;
    }
}

/// Rotation by `angle` around the axis `axis` through `point` (origin if
/// absent). A zero axis yields NaN entries.
fn rotate_3d(angle: f64, axis: Vector3<f64>, point: Option<&[f64]>) -> DMatrix<f64> {
    let n = axis / axis.norm();
    let (si, co) = angle.sin_cos();
    let t = 1.0 - co;

    let mut r = DMatrix::identity(4, 4);
    r[(1, 1)] = co + n.x * n.x * t;
    r[(1, 2)] = n.x * n.y * t - n.z * si;
    r[(1, 3)] = n.x * n.z * t + n.y * si;
    r[(2, 1)] = n.y * n.x * t + n.z * si;
    r[(2, 2)] = co + n.y * n.y * t;
    r[(2, 3)] = n.y * n.z * t - n.x * si;
    r[(3, 1)] = n.z * n.x * t - n.y * si;
    r[(3, 2)] = n.z * n.y * t + n.x * si;
    r[(3, 3)] = co + n.z * n.z * t;

    match point {
        Some(p) if p.iter().any(|&c| c != 0.0) => {
            let mut to_origin = DMatrix::identity(4, 4);
            let mut back = DMatrix::identity(4, 4);
            for i in 0..3 {
                to_origin[(i + 1, 0)] = -p[i];
                back[(i + 1, 0)] = p[i];
            }
            back * r * to_origin
        }
        _ => r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: &DMatrix<f64>, v: &[f64]) -> Vec<f64> {
        (m * nalgebra::DVector::from_column_slice(v)).as_slice().to_vec()
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn arity_table() {
        assert_eq!(arity(TransformType::Translate, Dim::D2).unwrap().0, &[2]);
        assert_eq!(arity(TransformType::Translate, Dim::D3).unwrap().0, &[3]);
        assert!(arity(TransformType::Shear, Dim::D3).is_none());
        assert!(arity(TransformType::RotateX, Dim::D2).is_none());
        assert_eq!(arity(TransformType::Generic, Dim::D3).unwrap().0, &[16]);
    }

    #[test]
    fn reflect_across_horizontal_line() {
        // y = 1  <=>  -1 + 0x + 1y = 0
        let params = [Param::from(vec![-1.0, 0.0, 1.0])];
        let m = build(TransformType::Reflect, &params, Dim::D2, &()).unwrap();
        assert!(close(&apply(&m, &[1.0, 3.0, 4.0]), &[1.0, 3.0, -2.0]));
    }

    #[test]
    fn reflect_across_diagonal_through_points() {
        let params = [Param::from(vec![0.0, 0.0]), Param::from(vec![1.0, 1.0])];
        let m = build(TransformType::Reflect, &params, Dim::D2, &()).unwrap();
        assert!(close(&apply(&m, &[1.0, 2.0, 5.0]), &[1.0, 5.0, 2.0]));

        let coords: Vec<Param> = [0.0, 0.0, 1.0, 1.0].into_iter().map(Param::Num).collect();
        let m4 = build(TransformType::Reflect, &coords, Dim::D2, &()).unwrap();
        assert!(close(m.as_slice(), m4.as_slice()));
    }

    #[test]
    fn rotate_3d_around_z_axis() {
        let m = rotate_3d(std::f64::consts::FRAC_PI_2, Vector3::new(0.0, 0.0, 2.0), None);
        assert!(close(&apply(&m, &[1.0, 1.0, 0.0, 5.0]), &[1.0, 0.0, 1.0, 5.0]));
    }

    #[test]
    fn rotate_3d_fixes_its_point() {
        let p = [1.0, 2.0, 3.0];
        let m = rotate_3d(0.7, Vector3::new(1.0, 1.0, 0.0), Some(&p));
        assert!(close(&apply(&m, &[1.0, 1.0, 2.0, 3.0]), &[1.0, 1.0, 2.0, 3.0]));
    }

    #[test]
    fn matrix_shape_is_checked() {
        let ok = Param::from(vec![vec![1.0, 0.0, 0.0]; 3]);
        assert!(check_matrix_shape(&ok, Dim::D2).is_ok());
        assert!(matches!(
            check_matrix_shape(&ok, Dim::D3),
            Err(Error::MatrixShape { expected: 4, rows: 3, cols: 3 })
        ));
        assert!(check_matrix_shape(&Param::Num(1.0), Dim::D2).is_err());
    }
}
