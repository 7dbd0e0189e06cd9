//! High-level entry crate for the remote two-light gaze estimation toolbox.
//!
//! A camera and two point lights observe the subject's eye. From the two
//! corneal reflections (glints) and the pupil center in a single image, the
//! pipeline reconstructs the center of corneal curvature, the optic and
//! visual axes of the eye and finally the point of regard on the screen.
//!
//! ## Per-frame API
//!
//! ```no_run
//! use gaze::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let constants = CalibrationConstants::from_json_str(&std::fs::read_to_string("constants.json")?)?;
//! let estimator = GazeEstimator::new(constants, PipelineConfig::default())?;
//!
//! let frame = GlintPupilFrame::new(
//!     Pt2::new(332.0, 164.0),
//!     Pt2::new(313.0, 165.0),
//!     Pt2::new(323.0, 163.0),
//! );
//! let estimate = estimator.estimate(&frame)?;
//! println!(
//!     "gaze at {:?} ({:?}), cornea center {:?}",
//!     estimate.gaze.position, estimate.gaze.frame, estimate.cornea.center
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Building blocks
//!
//! Each stage is usable on its own:
//!
//! ```no_run
//! use gaze::core::{Pt3, Vec3};
//! use gaze::eye::{project_gaze_point, visual_axis};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cornea_center = Pt3::new(1.45, 2.54, 46.94);
//! let optic_axis = Vec3::new(-0.0456, 0.0045, -0.9989).normalize();
//! let g = visual_axis(&optic_axis, (-5.0f64).to_radians(), 1.5f64.to_radians())?;
//! let on_screen = project_gaze_point(&cornea_center, &g, -18.0)?;
//! println!("{on_screen}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: Math types, frames, camera model, calibration constants, errors
//! - **[`optim`]**: Least-squares backend and the cornea-center problem
//! - **[`eye`]**: Optic axis, visual axis, screen intersection
//! - **[`pipeline`]**: Per-frame and batch orchestration
//! - **[`prelude`]**: Convenient re-exports for common use cases

/// Math types, reference frames, camera model and calibration constants.
pub mod core {
    pub use gaze_core::*;
}

/// Non-linear least-squares backend and the cornea-center estimator.
pub mod optim {
    pub use gaze_optim::*;
}

/// Closed-form eye model.
pub mod eye {
    pub use gaze_eye::*;
}

/// Per-frame gaze estimation.
pub mod pipeline {
    pub use gaze_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use gaze::prelude::*;` to get started quickly.
pub mod prelude {
    pub use gaze_core::{
        CalibrationConstants, CameraIntrinsics, EulerAnglesDeg, FrameKind, GazeError, GazeResult,
        Pt2, Pt3, Real, Vec3,
    };
    pub use gaze_pipeline::{
        estimate_gaze, estimate_gaze_batch, estimate_gaze_point, GazeEstimate, GazeEstimator,
        GazePoint, GlintPupilFrame, PipelineConfig,
    };
}
