use crate::enums::FlipAxis;
use nalgebra::Point3;
use ndarray::{Array3, Axis};

/// A loaded scan volume.
///
/// Voxel data is stored as `(depth, height, width)` with `spacing` giving
/// the physical extent of one voxel along (x, y, z); the z spacing is the
/// slice thickness used by all physical conversions.
#[derive(Clone, Debug, Default)]
pub struct Volume {
    data: Array3<u16>,
    spacing: (f32, f32, f32),
}

impl Volume {
    pub fn new(data: Array3<u16>, spacing: (f32, f32, f32)) -> Self {
        Self { data, spacing }
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<u16> {
        &self.data
    }

    pub fn spacing(&self) -> (f32, f32, f32) {
        self.spacing
    }

    /// Uniform millimeter scale per slice unit.
    pub fn slice_thickness(&self) -> f64 {
        self.spacing.2 as f64
    }

    /// Geometric center in slice-index space, `(x, y, z)` order. This is
    /// the pivot for all view-space rotations.
    pub fn center(&self) -> Point3<f64> {
        let (depth, height, width) = self.data.dim();
        Point3::new(
            (width as f64 - 1.0) / 2.0,
            (height as f64 - 1.0) / 2.0,
            (depth as f64 - 1.0) / 2.0,
        )
    }

    /// Whether `(x, y, z)` slice indices address a voxel inside the
    /// volume.
    pub fn contains(&self, indices: [i32; 3]) -> bool {
        let (depth, height, width) = self.data.dim();
        let [x, y, z] = indices;
        (0..width as i32).contains(&x)
            && (0..height as i32).contains(&y)
            && (0..depth as i32).contains(&z)
    }

    /// Clamp `(x, y, z)` slice indices to the volume bounds.
    pub fn clamp(&self, indices: [i32; 3]) -> [i32; 3] {
        let (depth, height, width) = self.data.dim();
        [
            indices[0].clamp(0, width as i32 - 1),
            indices[1].clamp(0, height as i32 - 1),
            indices[2].clamp(0, depth as i32 - 1),
        ]
    }

    /// Mirror the voxel data along one axis, in place.
    pub fn flip(&mut self, axis: FlipAxis) {
        let array_axis = match axis {
            // Data layout is (depth, height, width) = (z, y, x).
            FlipAxis::LeftRight => Axis(2),
            FlipAxis::TopBottom => Axis(1),
            FlipAxis::FrontBack => Axis(0),
        };
        self.data.invert_axis(array_axis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_volume() -> Volume {
        let data = Array3::from_shape_fn((2, 3, 4), |(z, y, x)| (z * 100 + y * 10 + x) as u16);
        Volume::new(data, (0.5, 0.5, 0.5))
    }

    #[test]
    fn center_is_half_extent_in_xyz_order() {
        let volume = ramp_volume();
        assert_eq!(volume.center(), Point3::new(1.5, 1.0, 0.5));
    }

    #[test]
    fn contains_and_clamp_respect_bounds() {
        let volume = ramp_volume();
        assert!(volume.contains([3, 2, 1]));
        assert!(!volume.contains([4, 0, 0]));
        assert!(!volume.contains([0, -1, 0]));
        assert_eq!(volume.clamp([9, -1, 1]), [3, 0, 1]);
    }

    #[test]
    fn flip_mirrors_along_the_selected_axis() {
        let mut volume = ramp_volume();
        volume.flip(FlipAxis::LeftRight);
        assert_eq!(volume.data()[[0, 0, 0]], 3);
        assert_eq!(volume.data()[[1, 2, 3]], 120);
    }

    #[test]
    fn double_flip_restores_original_data() {
        let mut volume = ramp_volume();
        let original = volume.data().clone();
        volume.flip(FlipAxis::FrontBack);
        volume.flip(FlipAxis::FrontBack);
        assert_eq!(volume.data(), &original);
    }
}
