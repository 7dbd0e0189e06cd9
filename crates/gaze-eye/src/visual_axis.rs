//! Visual axis from the optic axis and the subject's angular offsets.
//!
//! The eye frame is oriented by the optic axis (pan `theta`, tilt `phi`,
//! torsion `kappa`). In that frame the visual axis has the fixed direction
//! `nu(alpha, beta)`; rotating it back into WCS gives the visual axis.

use gaze_core::{rotation_z, GazeError, GazeResult, Mat3, Real, Vec3};
use serde::{Deserialize, Serialize};

/// Orientation of the eye frame in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyeAngles {
    /// Horizontal angle of the optic axis.
    pub theta: Real,
    /// Vertical angle of the optic axis.
    pub phi: Real,
    /// Torsion around the optic axis (zero in the gaze pipeline).
    pub kappa: Real,
}

/// Pan and tilt of a unit optic axis; torsion is zero.
pub fn eye_angles(omega: &Vec3) -> GazeResult<EyeAngles> {
    let theta = -(omega.x / omega.z).atan();
    let phi = omega.y.clamp(-1.0, 1.0).asin();
    if !theta.is_finite() || !phi.is_finite() {
        return Err(GazeError::GeometricDegeneracy {
            what: "optic axis orientation",
        });
    }
    Ok(EyeAngles {
        theta,
        phi,
        kappa: 0.0,
    })
}

/// Rotation from eye-frame coordinates into WCS.
///
/// `R_eye = flip * R_theta * R_phi * R_kappa` with `flip = diag(-1, 1, -1)`,
/// so `eye_rotation(0, 0, 0)` is `flip` itself.
pub fn eye_rotation(angles: &EyeAngles) -> Mat3 {
    let flip = Mat3::from_diagonal(&Vec3::new(-1.0, 1.0, -1.0));
    let (st, ct) = angles.theta.sin_cos();
    let (sp, cp) = angles.phi.sin_cos();
    let r_theta = Mat3::new(ct, 0.0, -st, 0.0, 1.0, 0.0, st, 0.0, ct);
    let r_phi = Mat3::new(1.0, 0.0, 0.0, 0.0, cp, sp, 0.0, -sp, cp);
    flip * r_theta * r_phi * rotation_z(angles.kappa)
}

/// Visual-axis direction in eye coordinates for offsets `alpha`, `beta` (rad).
pub fn eye_visual_direction(alpha: Real, beta: Real) -> Vec3 {
    let (sa, ca) = alpha.sin_cos();
    let (sb, cb) = beta.sin_cos();
    Vec3::new(-sa * cb, sb, ca * cb)
}

/// Rotate the eye-frame visual direction into WCS around the optic axis `omega`.
///
/// With `alpha = beta = 0` this returns `omega` for any axis facing the
/// camera (`omega.z < 0`).
pub fn visual_axis(omega: &Vec3, alpha: Real, beta: Real) -> GazeResult<Vec3> {
    let angles = eye_angles(omega)?;
    Ok(eye_rotation(&angles) * eye_visual_direction(alpha, beta))
}
