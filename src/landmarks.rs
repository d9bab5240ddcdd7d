use crate::enums::LandmarkName;
use crate::vector_math::EulerAngles;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// One of the five named anatomical points the coordinate frame is built
/// from.
///
/// `raw_position` is in slice-index space as captured; `capture_angles` is
/// the view rotation in effect at capture time. `physical_position` (mm,
/// relative to the SR origin) is derived state, written by the frame
/// rebuild.
#[derive(Clone, Debug)]
pub struct Landmark {
    pub name: LandmarkName,
    pub raw_position: Point3<f64>,
    pub capture_angles: EulerAngles,
    pub physical_position: Point3<f64>,
}

/// A user-marked measurement point, auto-numbered `Point N`.
#[derive(Clone, Debug)]
pub struct MarkedPoint {
    pub name: String,
    /// Slice-index space at mark time.
    pub position: Point3<f64>,
    /// View rotation in effect at mark time.
    pub angles: EulerAngles,
    /// Millimeter position relative to the SR origin (display variant).
    pub physical_position: Point3<f64>,
}

/// Named-slot registry of the five required landmarks.
#[derive(Clone, Debug, Default)]
pub struct LandmarkStore {
    aoda: Option<Landmark>,
    ans: Option<Landmark>,
    ht_r: Option<Landmark>,
    ht_l: Option<Landmark>,
    sr: Option<Landmark>,
}

impl LandmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a landmark. The physical position is reset; it is
    /// only meaningful again after the next frame rebuild.
    pub fn set(
        &mut self,
        name: LandmarkName,
        raw_position: Point3<f64>,
        capture_angles: EulerAngles,
    ) {
        *self.slot_mut(name) = Some(Landmark {
            name,
            raw_position,
            capture_angles,
            physical_position: Point3::origin(),
        });
    }

    pub fn get(&self, name: LandmarkName) -> Option<&Landmark> {
        self.slot(name).as_ref()
    }

    /// True once all five named slots are filled.
    pub fn is_complete(&self) -> bool {
        LandmarkName::ALL.iter().all(|&name| self.get(name).is_some())
    }

    /// All five landmarks in frame-construction order, or `None` while any
    /// slot is still empty.
    pub(crate) fn required(&self) -> Option<[&Landmark; 5]> {
        Some([
            self.aoda.as_ref()?,
            self.ans.as_ref()?,
            self.ht_r.as_ref()?,
            self.ht_l.as_ref()?,
            self.sr.as_ref()?,
        ])
    }

    /// Landmarks currently set, in frame-construction order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        LandmarkName::ALL.iter().filter_map(|&name| self.get(name))
    }

    pub(crate) fn set_physical(&mut self, name: LandmarkName, physical: Point3<f64>) {
        if let Some(landmark) = self.slot_mut(name).as_mut() {
            landmark.physical_position = physical;
        }
    }

    /// Rebuild a slot from an imported table row. Returns the slot name on
    /// success, `None` for rows that are not one of the five landmarks.
    /// A re-import replaces whatever the slot held before.
    pub fn set_from_record(&mut self, record: &PointRecord) -> Option<LandmarkName> {
        let name = LandmarkName::from_str(&record.name)?;
        *self.slot_mut(name) = Some(Landmark {
            name,
            raw_position: Point3::new(record.x, record.y, record.z),
            capture_angles: EulerAngles::new(record.angle_x, record.angle_y, record.angle_z),
            physical_position: Point3::new(
                record.physical_x,
                record.physical_y,
                record.physical_z,
            ),
        });
        Some(name)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, name: LandmarkName) -> &Option<Landmark> {
        match name {
            LandmarkName::Aoda => &self.aoda,
            LandmarkName::Ans => &self.ans,
            LandmarkName::HtR => &self.ht_r,
            LandmarkName::HtL => &self.ht_l,
            LandmarkName::Sr => &self.sr,
        }
    }

    fn slot_mut(&mut self, name: LandmarkName) -> &mut Option<Landmark> {
        match name {
            LandmarkName::Aoda => &mut self.aoda,
            LandmarkName::Ans => &mut self.ans,
            LandmarkName::HtR => &mut self.ht_r,
            LandmarkName::HtL => &mut self.ht_l,
            LandmarkName::Sr => &mut self.sr,
        }
    }
}

/// One row of the flat point table consumed by the spreadsheet
/// export/import layer.
///
/// Raw coordinates and physical coordinates are rounded to two decimals;
/// the physical X and Y columns are written swapped relative to the
/// internal (x, y, z) order. Import reads the columns back verbatim, so
/// the swap survives a round trip unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
    #[serde(rename = "Angle X")]
    pub angle_x: f64,
    #[serde(rename = "Angle Y")]
    pub angle_y: f64,
    #[serde(rename = "Angle Z")]
    pub angle_z: f64,
    #[serde(rename = "Physical X")]
    pub physical_x: f64,
    #[serde(rename = "Physical Y")]
    pub physical_y: f64,
    #[serde(rename = "Physical Z")]
    pub physical_z: f64,
}

impl PointRecord {
    pub fn new(
        name: impl Into<String>,
        position: Point3<f64>,
        angles: EulerAngles,
        physical: Point3<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            x: round2(position.x),
            y: round2(position.y),
            z: round2(position.z),
            angle_x: angles.x,
            angle_y: angles.y,
            angle_z: angles.z,
            physical_x: round2(physical.y),
            physical_y: round2(physical.x),
            physical_z: round2(physical.z),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_requires_all_five_landmarks() {
        let mut store = LandmarkStore::new();
        for &name in &LandmarkName::ALL[..4] {
            store.set(name, Point3::origin(), EulerAngles::ZERO);
            assert!(!store.is_complete());
            assert!(store.required().is_none());
        }
        store.set(LandmarkName::Sr, Point3::new(1.0, 2.0, 3.0), EulerAngles::ZERO);
        assert!(store.is_complete());
        let required = store.required().unwrap();
        assert_eq!(required[4].name, LandmarkName::Sr);
        assert_eq!(required[4].raw_position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn set_replaces_existing_slot() {
        let mut store = LandmarkStore::new();
        store.set(LandmarkName::Ans, Point3::new(1.0, 1.0, 1.0), EulerAngles::ZERO);
        store.set(
            LandmarkName::Ans,
            Point3::new(9.0, 8.0, 7.0),
            EulerAngles::new(0.0, 0.0, 45.0),
        );
        let landmark = store.get(LandmarkName::Ans).unwrap();
        assert_eq!(landmark.raw_position, Point3::new(9.0, 8.0, 7.0));
        assert_eq!(landmark.capture_angles.z, 45.0);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn record_swaps_physical_x_and_y_columns() {
        let record = PointRecord::new(
            "Point 1",
            Point3::new(1.234, 5.678, 9.0),
            EulerAngles::new(10.0, 20.0, 30.0),
            Point3::new(-3.456, 7.891, 2.0),
        );
        assert_eq!(record.x, 1.23);
        assert_eq!(record.y, 5.68);
        assert_eq!(record.physical_x, 7.89);
        assert_eq!(record.physical_y, -3.46);
        assert_eq!(record.physical_z, 2.0);
    }

    #[test]
    fn import_record_replaces_landmark_slot() {
        let mut store = LandmarkStore::new();
        store.set(LandmarkName::Sr, Point3::origin(), EulerAngles::ZERO);

        let record = PointRecord {
            name: "SR".into(),
            x: 387.0,
            y: 440.0,
            z: 269.0,
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            physical_x: 0.0,
            physical_y: 0.0,
            physical_z: 0.0,
        };
        assert_eq!(store.set_from_record(&record), Some(LandmarkName::Sr));
        assert_eq!(
            store.get(LandmarkName::Sr).unwrap().raw_position,
            Point3::new(387.0, 440.0, 269.0)
        );

        let unknown = PointRecord {
            name: "Point 3".into(),
            ..record
        };
        assert_eq!(store.set_from_record(&unknown), None);
    }
}
