use crate::enums::{AngleVariant, FlipAxis, LandmarkName};
use crate::frame::{CoordinateFrame, FrameError};
use crate::landmarks::{LandmarkStore, MarkedPoint, PointRecord};
use crate::vector_math::EulerAngles;
use crate::view_state::ViewState;
use crate::volume::Volume;
use log::debug;
use nalgebra::Point3;

/// All review state for one loaded volume.
///
/// A session owns its volume, landmark registry, marked points,
/// measurements, coordinate frame and navigation state exclusively;
/// switching the active volume means switching which session the UI talks
/// to. No two sessions' frames interact.
#[derive(Debug, Default)]
pub struct Session {
    volume: Volume,
    landmarks: LandmarkStore,
    marked_points: Vec<MarkedPoint>,
    distances: Vec<(String, f64)>,
    angles: Vec<(String, f64)>,
    frame: Option<CoordinateFrame>,
    view: ViewState,
}

impl Session {
    pub fn new(volume: Volume) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn landmarks(&self) -> &LandmarkStore {
        &self.landmarks
    }

    pub fn marked_points(&self) -> &[MarkedPoint] {
        &self.marked_points
    }

    pub fn distances(&self) -> &[(String, f64)] {
        &self.distances
    }

    pub fn angles(&self) -> &[(String, f64)] {
        &self.angles
    }

    /// The current frame, once a rebuild has succeeded.
    pub fn frame(&self) -> Option<&CoordinateFrame> {
        self.frame.as_ref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Update or insert one of the five named landmarks. Any established
    /// frame keeps its previous state until the next rebuild.
    pub fn set_landmark(
        &mut self,
        name: LandmarkName,
        raw_position: Point3<f64>,
        capture_angles: EulerAngles,
    ) {
        self.landmarks.set(name, raw_position, capture_angles);
    }

    /// Replace landmark slots from imported table rows. Later rows win
    /// when a name repeats; rows that are not one of the five landmarks
    /// are skipped. Returns how many slots were written.
    pub fn import_landmarks(&mut self, records: &[PointRecord]) -> usize {
        records
            .iter()
            .filter(|record| self.landmarks.set_from_record(record).is_some())
            .count()
    }

    /// Derive the anatomical coordinate frame from the five landmarks.
    ///
    /// On success every landmark's physical position is re-derived and
    /// the view jumps to the new frame's origin, oriented along its axes.
    /// On failure nothing changes.
    pub fn rebuild_frame(&mut self) -> Result<(), FrameError> {
        let frame = CoordinateFrame::rebuild(
            &self.landmarks,
            self.volume.center(),
            self.volume.slice_thickness(),
        )?;

        for name in LandmarkName::ALL {
            if let Some(landmark) = self.landmarks.get(name) {
                let physical = frame.to_physical(
                    landmark.raw_position,
                    landmark.capture_angles,
                    AngleVariant::True,
                );
                self.landmarks.set_physical(name, physical);
            }
        }

        let origin = frame.physical_origin_display;
        self.view.slice_indices = [origin.x as i32, origin.y as i32, origin.z as i32];
        self.view.view_angles = frame.euler_display;
        self.view.frame_established = true;
        self.frame = Some(frame);
        Ok(())
    }

    /// Convert a raw slice-index coordinate captured under `view_angles`
    /// into a frame-relative physical position in millimeters.
    pub fn convert_to_physical(
        &self,
        raw: Point3<f64>,
        view_angles: EulerAngles,
        variant: AngleVariant,
    ) -> Result<Point3<f64>, FrameError> {
        let frame = self.frame.as_ref().ok_or(FrameError::FrameNotEstablished)?;
        Ok(frame.to_physical(raw, view_angles, variant))
    }

    /// Record a user-marked point at the given raw position and view
    /// angles. The physical position uses the display variant, matching
    /// the on-screen coordinate readout.
    pub fn mark_point(
        &mut self,
        raw: Point3<f64>,
        view_angles: EulerAngles,
    ) -> Result<MarkedPoint, FrameError> {
        let physical = self.convert_to_physical(raw, view_angles, AngleVariant::Display)?;
        let point = MarkedPoint {
            name: format!("Point {}", self.marked_points.len() + 1),
            position: raw,
            angles: view_angles,
            physical_position: physical,
        };
        self.marked_points.push(point.clone());
        Ok(point)
    }

    pub fn rename_marked_point(&mut self, current: &str, new_name: impl Into<String>) -> bool {
        match self
            .marked_points
            .iter_mut()
            .find(|point| point.name == current)
        {
            Some(point) => {
                point.name = new_name.into();
                true
            }
            None => false,
        }
    }

    pub fn erase_marked_point(&mut self, name: &str) -> bool {
        let before = self.marked_points.len();
        self.marked_points.retain(|point| point.name != name);
        self.marked_points.len() != before
    }

    /// Move the view to new slice indices and rotation. The previous
    /// state is snapshotted first so the move can be undone; indices are
    /// clamped to the volume bounds.
    pub fn navigate_to(&mut self, slice_indices: [i32; 3], view_angles: EulerAngles) {
        self.view.push_snapshot();
        self.view.slice_indices = self.volume.clamp(slice_indices);
        self.view.view_angles = view_angles;
    }

    /// Navigate to a stored point's position and capture-time angles.
    pub fn jump_to_point(&mut self, position: Point3<f64>, angles: EulerAngles) {
        self.navigate_to(
            [position.x as i32, position.y as i32, position.z as i32],
            angles,
        );
    }

    pub fn push_snapshot(&mut self) {
        self.view.push_snapshot();
    }

    /// Restore the most recent navigation snapshot; no-op when the
    /// history is empty.
    pub fn undo(&mut self) -> bool {
        self.view.undo()
    }

    /// Mirror the volume along `axis` and remember it in the per-axis
    /// counter.
    pub fn apply_flip(&mut self, axis: FlipAxis) {
        self.volume.flip(axis);
        self.view.flip_counts.bump(axis);
    }

    /// Re-apply the recorded flips to freshly reloaded voxel data,
    /// restoring this volume's visual orientation after a switch. Each
    /// axis is flipped exactly `count` times, not `count mod 2`; the
    /// counters themselves are left untouched.
    pub fn replay_flips(&mut self) {
        for axis in [FlipAxis::LeftRight, FlipAxis::FrontBack, FlipAxis::TopBottom] {
            let count = self.view.flip_counts.get(axis);
            debug!("replaying {count} {axis:?} flips");
            for _ in 0..count {
                self.volume.flip(axis);
            }
        }
    }

    /// Measure the distance between two slice-index-space points in
    /// millimeters and record it as `Distance N`.
    pub fn measure_distance(&mut self, a: Point3<f64>, b: Point3<f64>) -> f64 {
        let distance = (a - b).norm() * self.volume.slice_thickness();
        let name = format!("Distance {}", self.distances.len() + 1);
        self.distances.push((name, distance));
        distance
    }

    /// Measure the angle at vertex `b` formed by `a` and `c`, in degrees,
    /// and record it as `Angle N`.
    pub fn measure_angle(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> f64 {
        let u = (a - b).normalize();
        let v = (c - b).normalize();
        let angle = u.dot(&v).clamp(-1.0, 1.0).acos().to_degrees();
        let name = format!("Angle {}", self.angles.len() + 1);
        self.angles.push((name, angle));
        angle
    }

    /// Flatten landmarks and marked points into the flat table consumed
    /// by the export layer. Landmark rows carry the frame's true angles
    /// once a frame is established, matching the exported sheet.
    pub fn point_records(&self) -> Vec<PointRecord> {
        let landmark_angles = self.frame.as_ref().map(|frame| frame.euler_true);
        let landmark_rows = self.landmarks.iter().map(|landmark| {
            PointRecord::new(
                landmark.name.as_str(),
                landmark.raw_position,
                landmark_angles.unwrap_or(landmark.capture_angles),
                landmark.physical_position,
            )
        });
        let marked_rows = self.marked_points.iter().map(|point| {
            PointRecord::new(
                point.name.clone(),
                point.position,
                point.angles,
                point.physical_position,
            )
        });
        landmark_rows.chain(marked_rows).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;

    fn reference_session() -> Session {
        // 512x768 in-plane, 400 slices: center (255.5, 383.5, 199.5).
        let volume = Volume::new(Array3::zeros((400, 768, 512)), (0.5, 0.5, 0.5));
        let mut session = Session::new(volume);
        for (name, [x, y, z]) in [
            (LandmarkName::Aoda, [389.0, 371.0, 225.0]),
            (LandmarkName::Ans, [380.0, 649.0, 199.0]),
            (LandmarkName::HtR, [281.0, 359.0, 303.0]),
            (LandmarkName::HtL, [509.0, 366.0, 303.0]),
            (LandmarkName::Sr, [387.0, 440.0, 269.0]),
        ] {
            session.set_landmark(name, Point3::new(x, y, z), EulerAngles::ZERO);
        }
        session
    }

    #[test]
    fn rebuild_requires_all_landmarks_and_mutates_nothing_on_failure() {
        let volume = Volume::new(Array3::zeros((10, 10, 10)), (1.0, 1.0, 1.0));
        let mut session = Session::new(volume);
        session.set_landmark(LandmarkName::Sr, Point3::new(1.0, 2.0, 3.0), EulerAngles::ZERO);

        assert_eq!(session.rebuild_frame(), Err(FrameError::MissingLandmarks));
        assert!(session.frame().is_none());
        assert!(!session.view().frame_established);
        assert_eq!(session.view().slice_indices, [0, 0, 0]);
    }

    #[test]
    fn rebuild_jumps_view_to_display_origin() {
        let mut session = reference_session();
        session.rebuild_frame().unwrap();

        let frame = session.frame().unwrap();
        assert_eq!(frame.physical_origin_display, Point3::new(389.0, 429.0, 274.0));
        assert_eq!(session.view().slice_indices, [389, 429, 274]);
        assert_eq!(session.view().view_angles, frame.euler_display);
        assert!(session.view().frame_established);
    }

    #[test]
    fn rebuild_rederives_landmark_physical_positions() {
        let mut session = reference_session();
        session.rebuild_frame().unwrap();

        let sr = session.landmarks().get(LandmarkName::Sr).unwrap();
        assert_relative_eq!(sr.physical_position, Point3::origin(), epsilon = 1e-9);

        let ht_l = session.landmarks().get(LandmarkName::HtL).unwrap();
        assert_relative_eq!(
            ht_l.physical_position,
            Point3::new(59.835841166236, -40.268052017345, 13.309999949564),
            epsilon = 1e-8
        );
    }

    #[test]
    fn conversions_require_an_established_frame() {
        let mut session = reference_session();
        assert_eq!(
            session.convert_to_physical(Point3::origin(), EulerAngles::ZERO, AngleVariant::True),
            Err(FrameError::FrameNotEstablished)
        );
        assert_eq!(
            session
                .mark_point(Point3::origin(), EulerAngles::ZERO)
                .unwrap_err(),
            FrameError::FrameNotEstablished
        );
        assert!(session.marked_points().is_empty());
    }

    #[test]
    fn marked_points_are_numbered_and_carry_display_physicals() {
        let mut session = reference_session();
        session.rebuild_frame().unwrap();
        let view_angles = session.frame().unwrap().euler_display;

        let first = session
            .mark_point(Point3::new(300.0, 400.0, 250.0), view_angles)
            .unwrap();
        assert_eq!(first.name, "Point 1");
        assert_relative_eq!(
            first.physical_position,
            Point3::new(-44.5, -14.5, -12.0),
            epsilon = 1e-9
        );

        let second = session
            .mark_point(Point3::new(389.0, 429.0, 274.0), view_angles)
            .unwrap();
        assert_eq!(second.name, "Point 2");
        assert_relative_eq!(second.physical_position, Point3::origin(), epsilon = 1e-9);
    }

    #[test]
    fn marked_points_can_be_renamed_and_erased() {
        let mut session = reference_session();
        session.rebuild_frame().unwrap();
        let view_angles = session.frame().unwrap().euler_display;
        session.mark_point(Point3::new(300.0, 400.0, 250.0), view_angles).unwrap();
        session.mark_point(Point3::new(310.0, 410.0, 260.0), view_angles).unwrap();

        assert!(session.rename_marked_point("Point 1", "apex"));
        assert!(!session.rename_marked_point("Point 1", "nope"));
        assert!(session.erase_marked_point("Point 2"));
        assert_eq!(session.marked_points().len(), 1);
        assert_eq!(session.marked_points()[0].name, "apex");
    }

    #[test]
    fn navigation_clamps_and_snapshots() {
        let mut session = reference_session();
        session.navigate_to([600, -5, 100], EulerAngles::new(0.0, 0.0, 15.0));
        assert_eq!(session.view().slice_indices, [511, 0, 100]);

        session.navigate_to([10, 10, 10], EulerAngles::ZERO);
        assert!(session.undo());
        assert_eq!(session.view().slice_indices, [511, 0, 100]);
        assert_eq!(session.view().view_angles, EulerAngles::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn flips_are_counted_and_replayable() {
        let mut session = reference_session();
        let original = session.volume().data().clone();

        session.apply_flip(FlipAxis::LeftRight);
        session.apply_flip(FlipAxis::LeftRight);
        assert_eq!(session.view().flip_counts.get(FlipAxis::LeftRight), 2);
        // A double flip restores the original orientation bit for bit.
        assert_eq!(session.volume().data(), &original);

        // Replaying repeats each flip by count; an even count is a
        // round trip, and the counters stay put.
        session.replay_flips();
        assert_eq!(session.volume().data(), &original);
        assert_eq!(session.view().flip_counts.get(FlipAxis::LeftRight), 2);
    }

    #[test]
    fn measurements_are_scaled_and_named() {
        let mut session = reference_session();
        let distance =
            session.measure_distance(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 8.0, 0.0));
        assert_relative_eq!(distance, 5.0, epsilon = 1e-12);
        assert_eq!(session.distances()[0].0, "Distance 1");

        let angle = session.measure_angle(
            Point3::new(1.0, 0.0, 0.0),
            Point3::origin(),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(angle, 90.0, epsilon = 1e-9);
        assert_eq!(session.angles()[0].0, "Angle 1");
    }

    #[test]
    fn point_records_flatten_landmarks_and_marks() {
        let mut session = reference_session();
        session.rebuild_frame().unwrap();
        let view_angles = session.frame().unwrap().euler_display;
        session.mark_point(Point3::new(300.0, 400.0, 250.0), view_angles).unwrap();

        let records = session.point_records();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].name, "AODA");
        assert_eq!(records[4].name, "SR");
        assert_eq!(records[5].name, "Point 1");

        // Landmark rows carry the frame's true angles.
        let euler_true = session.frame().unwrap().euler_true;
        assert_relative_eq!(records[0].angle_x, euler_true.x, epsilon = 1e-12);

        // Physical X/Y columns are swapped relative to internal order.
        let ht_l = session.landmarks().get(LandmarkName::HtL).unwrap();
        assert_relative_eq!(
            records[3].physical_x,
            (ht_l.physical_position.y * 100.0).round() / 100.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn import_replaces_landmarks_keeping_last_duplicate() {
        let mut session = reference_session();
        let mut records = session.point_records();
        // A later duplicate of SR wins, as with the spreadsheet import.
        let mut replacement = records[4].clone();
        replacement.x = 100.0;
        records.push(replacement);

        assert_eq!(session.import_landmarks(&records), 6);
        assert_eq!(
            session.landmarks().get(LandmarkName::Sr).unwrap().raw_position,
            Point3::new(100.0, 440.0, 269.0)
        );
    }
}
