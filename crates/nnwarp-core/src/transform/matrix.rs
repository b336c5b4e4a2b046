//! Homogeneous 3x3 transforms built from a rotation angle and a pivot.
//!
//! A transform maps source coordinates to destination coordinates:
//! ```text
//! [ cos(θ)  -sin(θ)   pivot.x ]
//! [ sin(θ)   cos(θ)   pivot.y ]
//! [   0        0         1    ]
//! ```
//! Image coordinates have the origin at the top-left and y pointing down, so
//! a positive angle turns content clockwise on screen.

use serde::{Deserialize, Serialize};

use super::TransformError;

/// Determinants at or below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Translation component of a transform, in destination pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pivot {
    pub x: f64,
    pub y: f64,
}

impl Pivot {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Pivot {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Pivot {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}

impl From<(u32, u32)> for Pivot {
    fn from((x, y): (u32, u32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}

/// An immutable 3x3 homogeneous transform, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f64; 3]; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation by `angle_degrees` followed by translation to `pivot`.
    ///
    /// No validation is performed: NaN or infinite input yields NaN or
    /// infinite matrix entries.
    pub fn rotation(angle_degrees: f64, pivot: impl Into<Pivot>) -> Self {
        let pivot = pivot.into();
        let angle = angle_degrees * std::f64::consts::PI / 180.0;
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [[cos, -sin, pivot.x], [sin, cos, pivot.y], [0.0, 0.0, 1.0]],
        }
    }

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m: [[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]],
        }
    }

    /// Wrap an arbitrary matrix. The caller is responsible for it being a
    /// meaningful affine map.
    pub fn from_matrix(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.m
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    pub fn is_invertible(&self) -> bool {
        invertible_determinant(self.determinant())
    }

    /// Matrix inverse via the adjugate.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::InvalidTransform` if the determinant is
    /// non-finite or within `SINGULAR_EPSILON` of zero.
    pub fn inverse(&self) -> Result<Transform, TransformError> {
        let det = self.determinant();
        if !invertible_determinant(det) {
            return Err(TransformError::InvalidTransform { determinant: det });
        }
        let m = &self.m;
        let inv_det = 1.0 / det;

        let mut inv = [[0.0; 3]; 3];
        inv[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det;
        inv[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        inv[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        inv[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        inv[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        inv[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det;
        inv[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det;
        inv[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det;
        inv[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det;

        Ok(Transform { m: inv })
    }

    /// Transform that applies `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        let (a, b) = (&next.m, &self.m);
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Transform { m: out }
    }

    /// Map a point forward, including the homogeneous division.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        let hx = m[0][0] * x + m[0][1] * y + m[0][2];
        let hy = m[1][0] * x + m[1][1] * y + m[1][2];
        let hw = m[2][0] * x + m[2][1] * y + m[2][2];
        (hx / hw, hy / hw)
    }
}

fn invertible_determinant(det: f64) -> bool {
    det.is_finite() && det.abs() > SINGULAR_EPSILON
}

/// Build the rotation-about-pivot transform.
///
/// Equivalent to [`Transform::rotation`].
pub fn build_transform(angle_degrees: f64, pivot: impl Into<Pivot>) -> Transform {
    Transform::rotation(angle_degrees, pivot)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: rotation+translation transforms are always invertible
        /// and keep the homogeneous row intact.
        #[test]
        fn prop_rotation_is_invertible(
            angle in -1000.0f64..1000.0,
            px in -1e4f64..1e4,
            py in -1e4f64..1e4,
        ) {
            let t = build_transform(angle, (px, py));
            prop_assert!(t.is_invertible());
            prop_assert_eq!(t.matrix()[2], [0.0, 0.0, 1.0]);

            let inv = t.inverse().unwrap();
            prop_assert_eq!(inv.matrix()[2][2], 1.0);
        }

        /// Property: forward then inverse mapping returns the starting point.
        #[test]
        fn prop_inverse_undoes_forward(
            angle in -360.0f64..360.0,
            px in -500.0f64..500.0,
            py in -500.0f64..500.0,
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
        ) {
            let t = build_transform(angle, (px, py));
            let (fx, fy) = t.apply(x, y);
            let (bx, by) = t.inverse().unwrap().apply(fx, fy);
            prop_assert!((bx - x).abs() < 1e-9, "x: {} vs {}", bx, x);
            prop_assert!((by - y).abs() < 1e-9, "y: {} vs {}", by, y);
        }
    }
}
