use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Real;

/// Surface a ray was expected to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Corneal sphere of radius `R` around the cornea center.
    Cornea,
    /// Sphere of radius `K` around the cornea center holding the pupil center.
    Pupil,
    /// Screen plane `z = screen_z`.
    Screen,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Cornea => write!(f, "corneal sphere"),
            Surface::Pupil => write!(f, "pupil sphere"),
            Surface::Screen => write!(f, "screen plane"),
        }
    }
}

/// Failure of a single frame's gaze computation.
///
/// Every variant is final for the frame: retrying with the same inputs
/// reproduces the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GazeError {
    /// A vector that must be normalized, or an input that must be finite, is not.
    #[error("geometric degeneracy: {what} has zero length or is not finite")]
    GeometricDegeneracy {
        /// Label of the offending quantity.
        what: &'static str,
    },
    /// Snell's law has no transmitted ray at the corneal surface.
    #[error("no refracted ray exists at the corneal surface (radicand {radicand:.6e})")]
    RefractionDomain {
        /// Negative value under the square root of the refraction formula.
        radicand: Real,
    },
    /// A calibration constant or option is outside its valid range.
    #[error("invalid configuration `{field}`: {reason}")]
    InvalidConfiguration {
        /// Name of the offending field.
        field: &'static str,
        /// What the field must satisfy and the value it had.
        reason: String,
    },
    /// The cornea-center minimization produced no acceptable solution.
    #[error(
        "cornea-center minimization failed: {reason} (residual {residual:.3e} cm after {evaluations} evaluations)"
    )]
    ConvergenceFailure {
        /// Which acceptance check failed.
        reason: &'static str,
        /// Distance between the two per-light centers (cm), `NaN` if undefined.
        residual: Real,
        /// Residual evaluations spent by the solver.
        evaluations: usize,
    },
    /// A ray misses a surface it has to hit.
    #[error("ray does not intersect the {surface}")]
    NoIntersection {
        /// Surface that was missed.
        surface: Surface,
    },
}

impl GazeError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        GazeError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub type GazeResult<T> = Result<T, GazeError>;
