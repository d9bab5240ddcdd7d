//! # DICOM-frame library
//!
//! This crate implements the anatomical coordinate-frame resolver and
//! spatial transform engine behind a DICOM review tool.
//!
//! From five named landmark points (AODA, ANS, HtR, HtL and SR) it derives
//! a patient-specific orthonormal reference frame, decomposes it into
//! Euler angles with explicit gimbal-lock handling, and maintains two
//! parallel angle/origin representations: a true set for physically
//! consistent measurements and a display set adjusted for the on-screen
//! orientation. Around that core it keeps the per-volume review state a
//! UI layer needs:
//!  - a named-slot landmark registry plus user-marked points
//!  - forward/inverse mapping between slice-index and millimeter space
//!    while a view is live-rotated
//!  - slice navigation with a bounded undo history
//!  - per-axis mirror counters that replay a volume's orientation
//!
//! Rendering, DICOM decoding and UI wiring live in the surrounding
//! application; everything here is synchronous in-memory arithmetic, one
//! [`session::Session`] per loaded volume.
//!
//! # Examples
//!
//! ## Building a frame from five landmarks
//!
//! Register the landmarks, rebuild the frame, then convert raw slice
//! coordinates to frame-relative millimeters:
//!
//! ```
//! # use dicom_frame::enums::{AngleVariant, LandmarkName};
//! # use dicom_frame::session::Session;
//! # use dicom_frame::vector_math::EulerAngles;
//! # use dicom_frame::volume::Volume;
//! # use nalgebra::Point3;
//! # use ndarray::Array3;
//! let volume = Volume::new(Array3::zeros((40, 40, 40)), (0.5, 0.5, 0.5));
//! let mut session = Session::new(volume);
//!
//! for (name, position) in [
//!     (LandmarkName::Aoda, Point3::new(20.0, 10.0, 20.0)),
//!     (LandmarkName::Ans, Point3::new(20.0, 30.0, 20.0)),
//!     (LandmarkName::HtR, Point3::new(30.0, 10.0, 20.0)),
//!     (LandmarkName::HtL, Point3::new(10.0, 10.0, 20.0)),
//!     (LandmarkName::Sr, Point3::new(20.0, 15.0, 20.0)),
//! ] {
//!     session.set_landmark(name, position, EulerAngles::ZERO);
//! }
//!
//! session.rebuild_frame().expect("five landmarks are set");
//! let frame = session.frame().expect("frame is established");
//! assert_eq!(frame.euler_true, EulerAngles::ZERO);
//!
//! let physical = session
//!     .convert_to_physical(Point3::new(20.0, 19.0, 20.0), EulerAngles::ZERO, AngleVariant::True)
//!     .expect("frame is established");
//! assert_eq!(physical, Point3::new(0.0, 2.0, 0.0));
//! ```

pub mod enums;
pub mod frame;
pub mod landmarks;
pub mod session;
pub mod transform;
pub mod vector_math;
pub mod view_state;
pub mod volume;
