//! Closed-form eye model for remote two-light gaze estimation.
//!
//! Given the center of corneal curvature, this crate reconstructs the
//! optic axis from the refracted pupil image ([`optic_axis`]), offsets it
//! by the subject's calibration angles to obtain the visual axis
//! ([`visual_axis`]) and intersects that axis with the screen plane
//! ([`gaze_point`]).
//!
//! All inputs and outputs are WCS points and directions in centimeters.

pub mod gaze_point;
pub mod optic_axis;
pub mod visual_axis;

pub use gaze_point::project_gaze_point;
pub use optic_axis::{
    estimate_optic_axis, pupil_center, refract_into_cornea, refraction_point, CorneaModel,
    OpticAxisEstimate,
};
pub use visual_axis::{eye_angles, eye_rotation, eye_visual_direction, visual_axis, EyeAngles};
