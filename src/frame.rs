use crate::enums::AngleVariant;
use crate::landmarks::LandmarkStore;
use crate::transform::rotate_about;
use crate::vector_math::{
    EulerAngles, euler_from_rotation_matrix, normalize, rotation_matrix_from_basis, wrap_degrees,
};
use log::debug;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Cross products below this norm are rejected as degenerate landmark
/// geometry instead of silently poisoning the rotation matrix.
const DEGENERATE_NORM_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("all five anatomical landmarks must be set before building a frame")]
    MissingLandmarks,

    #[error("degenerate landmark geometry: {0}")]
    DegenerateLandmarks(&'static str),

    #[error("frame computation produced a non-finite value")]
    NonFiniteResult,

    #[error("no coordinate frame has been established")]
    FrameNotEstablished,
}

/// The patient-specific anatomical reference frame derived from the five
/// landmarks.
///
/// The frame carries two parallel angle/origin representations: the true
/// set keeps physical measurements consistent, the display set is adjusted
/// so the volume renders upright under the camera convention and feeds the
/// integral slice-navigation fields. `euler_display` is derived from
/// `euler_true` at build time and never mutated independently.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateFrame {
    /// SR's raw position at frame-build time; pivot for landmark
    /// unification, fixed thereafter.
    pub origin_world: Point3<f64>,
    /// Unit normal of the sagittal plane (frame x axis).
    pub sagittal: Vector3<f64>,
    /// Unit normal of the coronal plane (frame y axis).
    pub coronal: Vector3<f64>,
    /// Unit normal of the axial plane (frame z axis).
    pub axial: Vector3<f64>,
    pub euler_true: EulerAngles,
    pub euler_display: EulerAngles,
    /// Frame-space position of SR under the true angles; the reference
    /// offset subtracted by physical conversions.
    pub physical_origin_true: Point3<f64>,
    /// Frame-space position of SR under the display angles, rounded to
    /// integers because it feeds slice-index navigation.
    pub physical_origin_display: Point3<f64>,
    /// Geometric center of the loaded volume; pivot for view-space
    /// rotations.
    pub volume_center: Point3<f64>,
    /// Uniform millimeter scale per slice unit.
    pub slice_thickness: f64,
}

impl CoordinateFrame {
    /// Build a frame from the five landmarks.
    ///
    /// Each landmark is first rotated by its own capture angles about the
    /// SR raw position, unifying all five into a rotation-free world
    /// space. The basis is then derived in a fixed order — axial from
    /// AB×CD, coronal from CD×axial, sagittal from coronal×axial — which
    /// fixes the frame's handedness.
    ///
    /// Nothing is committed on failure: missing landmarks, degenerate
    /// geometry and non-finite intermediate values all return an error
    /// before any state leaves this function.
    pub fn rebuild(
        landmarks: &LandmarkStore,
        volume_center: Point3<f64>,
        slice_thickness: f64,
    ) -> Result<CoordinateFrame, FrameError> {
        let [aoda, ans, ht_r, ht_l, sr] =
            landmarks.required().ok_or(FrameError::MissingLandmarks)?;

        let origin_world = sr.raw_position;
        let unified: Vec<Point3<f64>> = [aoda, ans, ht_r, ht_l, sr]
            .iter()
            .map(|landmark| {
                rotate_about(landmark.raw_position, origin_world, landmark.capture_angles)
            })
            .collect();

        let vector_ab = unified[1] - unified[0];
        let vector_cd = unified[3] - unified[2];

        let axial = checked_cross(
            vector_ab,
            vector_cd,
            "the AODA-ANS and HtR-HtL segments are parallel or coincident",
        )?;
        let coronal = checked_cross(
            vector_cd,
            axial,
            "the HtR-HtL segment is parallel to the axial normal",
        )?;
        let sagittal = checked_cross(
            coronal,
            axial,
            "the coronal and axial normals are parallel",
        )?;

        let euler_true =
            euler_from_rotation_matrix(&rotation_matrix_from_basis(sagittal, coronal, axial));

        // The display z keeps the unwrapped signed form; the rotation
        // dials accept it directly.
        let euler_display = EulerAngles::new(
            wrap_degrees(180.0 + euler_true.x),
            wrap_degrees(-euler_true.y),
            180.0 - euler_true.z,
        );

        let mut frame = CoordinateFrame {
            origin_world,
            sagittal,
            coronal,
            axial,
            euler_true,
            euler_display,
            physical_origin_true: Point3::origin(),
            physical_origin_display: Point3::origin(),
            volume_center,
            slice_thickness,
        };

        frame.physical_origin_true =
            frame.to_frame_space(sr.raw_position, sr.capture_angles, AngleVariant::True);
        frame.physical_origin_display =
            frame.to_frame_space(sr.raw_position, sr.capture_angles, AngleVariant::Display);

        frame.validate()?;

        debug!(
            "coordinate frame rebuilt: euler_true=({:.3}, {:.3}, {:.3}) euler_display=({:.3}, {:.3}, {:.3})",
            frame.euler_true.x,
            frame.euler_true.y,
            frame.euler_true.z,
            frame.euler_display.x,
            frame.euler_display.y,
            frame.euler_display.z,
        );

        Ok(frame)
    }

    /// Map a raw slice-index coordinate into frame-space slice
    /// coordinates: undo the view rotation in effect when the coordinate
    /// was captured, then rotate into the anatomical frame. Both steps
    /// pivot on the volume center. The display variant rounds to whole
    /// slice units for the navigation fields.
    pub fn to_frame_space(
        &self,
        raw: Point3<f64>,
        view_angles: EulerAngles,
        variant: AngleVariant,
    ) -> Point3<f64> {
        let unrotated = rotate_about(raw, self.volume_center, -view_angles);
        match variant {
            AngleVariant::True => rotate_about(unrotated, self.volume_center, self.euler_true),
            AngleVariant::Display => {
                let mapped = rotate_about(unrotated, self.volume_center, self.euler_display);
                Point3::new(mapped.x.round(), mapped.y.round(), mapped.z.round())
            }
        }
    }

    /// Full composite mapping from a raw slice-index coordinate to a
    /// frame-relative physical position in millimeters.
    ///
    /// The true variant negates the resulting x and z components, tying
    /// the physical axes to the anatomical left/right and
    /// superior/inferior display convention. The display variant works on
    /// whole slice units and skips the negation.
    pub fn to_physical(
        &self,
        raw: Point3<f64>,
        view_angles: EulerAngles,
        variant: AngleVariant,
    ) -> Point3<f64> {
        let frame_space = self.to_frame_space(raw, view_angles, variant);
        match variant {
            AngleVariant::True => {
                let offset = (frame_space - self.physical_origin_true) * self.slice_thickness;
                Point3::new(-offset.x, offset.y, -offset.z)
            }
            AngleVariant::Display => {
                Point3::from((frame_space - self.physical_origin_display) * self.slice_thickness)
            }
        }
    }

    fn validate(&self) -> Result<(), FrameError> {
        let finite = self.sagittal.iter().all(|v| v.is_finite())
            && self.coronal.iter().all(|v| v.is_finite())
            && self.axial.iter().all(|v| v.is_finite())
            && self.euler_true.is_finite()
            && self.euler_display.is_finite()
            && self.physical_origin_true.iter().all(|v| v.is_finite())
            && self.physical_origin_display.iter().all(|v| v.is_finite());
        if finite {
            Ok(())
        } else {
            Err(FrameError::NonFiniteResult)
        }
    }
}

fn checked_cross(
    a: Vector3<f64>,
    b: Vector3<f64>,
    reason: &'static str,
) -> Result<Vector3<f64>, FrameError> {
    let cross = a.cross(&b);
    if cross.norm() <= DEGENERATE_NORM_EPSILON {
        return Err(FrameError::DegenerateLandmarks(reason));
    }
    Ok(normalize(cross))
}
