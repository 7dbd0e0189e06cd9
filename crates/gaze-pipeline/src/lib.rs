//! Per-frame gaze estimation.
//!
//! A frame is two glint centers and one pupil center in pixels. Processing
//! runs the stages in order:
//!
//! 1. lift the glints into WCS and estimate the cornea center,
//! 2. lift the pupil and reconstruct the optic axis,
//! 3. offset the optic axis into the visual axis,
//! 4. intersect the visual axis with the screen plane (in SCS when the
//!    camera is tilted against the screen).
//!
//! Frames are independent: the same frame and constants always give the same
//! result, and a failed frame carries no state into the next one.

mod estimator;

pub use estimator::{
    estimate_gaze, estimate_gaze_batch, estimate_gaze_point, GazeEstimate, GazeEstimator,
};

use gaze_core::{FrameKind, Pt2, Pt3};
use gaze_optim::cornea_center::CorneaCenterOptions;
use serde::{Deserialize, Serialize};

/// Solver settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cornea: CorneaCenterOptions,
}

/// Image measurements of one frame (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlintPupilFrame {
    /// Reflection of `light_1`.
    pub glint_1: Pt2,
    /// Reflection of `light_2`.
    pub glint_2: Pt2,
    pub pupil: Pt2,
}

impl GlintPupilFrame {
    pub fn new(glint_1: Pt2, glint_2: Pt2, pupil: Pt2) -> Self {
        Self {
            glint_1,
            glint_2,
            pupil,
        }
    }
}

/// Point of regard on the screen plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub position: Pt3,
    /// Frame `position` is expressed in.
    pub frame: FrameKind,
}
