//! Core math and geometry primitives for the gaze estimation workspace.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, ...) and vector helpers,
//! - the extrinsic Euler rotation builder,
//! - frame-tagged values and rigid transforms between the camera/world (WCS)
//!   and screen (SCS) coordinate systems,
//! - the pinhole lifting between image pixels (ICS) and camera space,
//! - the immutable [`CalibrationConstants`] record and the shared [`GazeError`].
//!
//! Lifting pipeline:
//! `pixel (ICS) -> image plane at z = -f (camera) -> WCS (+ nodal point)`

/// Pinhole lifting between pixels and camera space.
pub mod camera;
/// Tracker and subject calibration constants.
pub mod constants;
/// Error taxonomy shared by every stage of the pipeline.
pub mod error;
/// Frame-tagged values and rigid transforms.
pub mod frames;
/// Linear algebra type aliases and vector helpers.
pub mod math;
/// Extrinsic rotation matrices from Euler angles.
pub mod rotation;
/// Shared reference fixtures for tests across the workspace.
pub mod test_utils;

pub use camera::*;
pub use constants::*;
pub use error::*;
pub use frames::*;
pub use math::*;
pub use rotation::*;
