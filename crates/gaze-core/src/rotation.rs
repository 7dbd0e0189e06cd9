//! Extrinsic rotation matrices built from Euler angles.
//!
//! The composed rotation is
//!
//! ```text
//! R = Rz(gamma) * Ry(beta) * Rx(alpha)
//! ```
//!
//! so a vector is rotated about z first, then y, then x. The order is part of
//! the contract: permuting the factors yields a different (still orthonormal)
//! matrix without any error.

use serde::{Deserialize, Serialize};

use crate::{Mat3, Real};

/// Counter-clockwise rotation about the x axis.
pub fn rotation_x(alpha_rad: Real) -> Mat3 {
    let (s, c) = alpha_rad.sin_cos();
    Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Counter-clockwise rotation about the y axis.
pub fn rotation_y(beta_rad: Real) -> Mat3 {
    let (s, c) = beta_rad.sin_cos();
    Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Counter-clockwise rotation about the z axis.
pub fn rotation_z(gamma_rad: Real) -> Mat3 {
    let (s, c) = gamma_rad.sin_cos();
    Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Build `Rz(gamma) * Ry(beta) * Rx(alpha)` from angles given in degrees.
pub fn build_extrinsic_rotation(alpha_deg: Real, beta_deg: Real, gamma_deg: Real) -> Mat3 {
    rotation_z(gamma_deg.to_radians())
        * rotation_y(beta_deg.to_radians())
        * rotation_x(alpha_deg.to_radians())
}

/// Euler angles (degrees) about x, y and z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAnglesDeg {
    /// Rotation about x.
    pub alpha: Real,
    /// Rotation about y.
    pub beta: Real,
    /// Rotation about z.
    pub gamma: Real,
}

impl EulerAnglesDeg {
    pub fn new(alpha: Real, beta: Real, gamma: Real) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Extrinsic rotation matrix for these angles.
    pub fn rotation(&self) -> Mat3 {
        build_extrinsic_rotation(self.alpha, self.beta, self.gamma)
    }

    pub fn is_finite(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.gamma.is_finite()
    }
}
