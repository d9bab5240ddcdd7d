use crate::vector_math::EulerAngles;
use nalgebra::{Matrix3, Point3};

/// Build the point-rotation matrix for the given angles.
///
/// The elemental matrices are composed as `(Rx·Ry·Rz)ᵀ`. The transpose is
/// deliberate: it matches the review tool's two-step protocol of undoing
/// the current view rotation (negated angles) before applying the frame
/// rotation. Reverse calls always pass negated angles; the composition
/// itself never branches.
pub fn rotation_matrix(angles: EulerAngles) -> Matrix3<f64> {
    let (sin_x, cos_x) = angles.x.to_radians().sin_cos();
    let (sin_y, cos_y) = angles.y.to_radians().sin_cos();
    let (sin_z, cos_z) = angles.z.to_radians().sin_cos();

    #[rustfmt::skip]
    let r_x = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, cos_x, -sin_x,
        0.0, sin_x, cos_x,
    );
    #[rustfmt::skip]
    let r_y = Matrix3::new(
        cos_y, 0.0, sin_y,
        0.0, 1.0, 0.0,
        -sin_y, 0.0, cos_y,
    );
    #[rustfmt::skip]
    let r_z = Matrix3::new(
        cos_z, -sin_z, 0.0,
        sin_z, cos_z, 0.0,
        0.0, 0.0, 1.0,
    );

    (r_x * r_y * r_z).transpose()
}

/// Rotate `point` about an arbitrary `pivot` by the given Euler angles.
///
/// The pivot is explicit rather than baked into two near-identical
/// functions; the frame supplies either the SR world origin or the volume
/// center depending on the call site.
pub fn rotate_about(point: Point3<f64>, pivot: Point3<f64>, angles: EulerAngles) -> Point3<f64> {
    pivot + rotation_matrix(angles) * (point - pivot)
}
