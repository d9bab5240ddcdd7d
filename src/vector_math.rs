use log::warn;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::ops::Neg;

/// Threshold (radians) around ±90° on the middle axis below which the
/// Euler decomposition is treated as gimbal locked.
const GIMBAL_LOCK_EPSILON: f64 = 1e-6;

/// An intrinsic X→Y→Z rotation in degrees.
///
/// Angles produced by [`euler_from_rotation_matrix`] are wrapped into
/// `[0, 360)`. The rotation is applied to points as `(Rx·Ry·Rz)ᵀ`, see
/// [`crate::transform::rotate_about`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerAngles {
    pub const ZERO: EulerAngles = EulerAngles {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Neg for EulerAngles {
    type Output = EulerAngles;

    fn neg(self) -> EulerAngles {
        EulerAngles::new(-self.x, -self.y, -self.z)
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Normalize a vector to unit length.
///
/// A zero-norm input is returned unchanged. Callers that cannot tolerate a
/// zero vector must check the norm themselves; the frame rebuild does.
pub fn normalize(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm == 0.0 { v } else { v / norm }
}

/// Build the rotation matrix whose columns are the sagittal, coronal and
/// axial basis vectors. This matrix maps the canonical frame onto the
/// derived anatomical frame.
pub fn rotation_matrix_from_basis(
    sagittal: Vector3<f64>,
    coronal: Vector3<f64>,
    axial: Vector3<f64>,
) -> Matrix3<f64> {
    Matrix3::from_columns(&[sagittal, coronal, axial])
}

/// Extract X→Y→Z Euler angles in degrees from a rotation matrix.
///
/// Y comes from `atan2(m02, √(m00² + m01²))`. Within
/// [`GIMBAL_LOCK_EPSILON`] of ±90° the decomposition is singular; Z is
/// pinned to zero and X is derived from the second row, with both operands
/// sign-flipped in the −90° case. The branch order fixes which degenerate
/// solution is chosen; the physical-origin bookkeeping downstream depends
/// on it.
pub fn euler_from_rotation_matrix(matrix: &Matrix3<f64>) -> EulerAngles {
    let y = matrix[(0, 2)].atan2((matrix[(0, 0)].powi(2) + matrix[(0, 1)].powi(2)).sqrt());

    let (x, z) = if (y - FRAC_PI_2).abs() < GIMBAL_LOCK_EPSILON {
        warn!("gimbal lock detected (y = 90 deg)");
        (matrix[(1, 0)].atan2(matrix[(1, 1)]), 0.0)
    } else if (y + FRAC_PI_2).abs() < GIMBAL_LOCK_EPSILON {
        warn!("gimbal lock detected (y = -90 deg)");
        ((-matrix[(1, 0)]).atan2(-matrix[(1, 1)]), 0.0)
    } else {
        (
            (-matrix[(1, 2)]).atan2(matrix[(2, 2)]),
            (-matrix[(0, 1)]).atan2(matrix[(0, 0)]),
        )
    };

    EulerAngles::new(
        wrap_degrees(x.to_degrees()),
        wrap_degrees(y.to_degrees()),
        wrap_degrees(z.to_degrees()),
    )
}
