//! Mathematical utilities and type definitions.
//!
//! This module provides the fundamental types used throughout the workspace
//! and the two vector helpers every geometric stage relies on.

use nalgebra::{Matrix3, Point2, Point3, Vector2, Vector3};

use crate::{GazeError, GazeResult};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates (pixels in ICS).
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates (centimeters).
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;

/// Tolerance used when checking that a vector has unit length.
pub const UNIT_TOLERANCE: Real = 1e-6;

/// Euclidean norm of `v`.
pub fn magnitude(v: &Vec3) -> Real {
    v.norm()
}

/// Scale `v` to unit length.
///
/// Fails with [`GazeError::GeometricDegeneracy`] when `v` has zero length or
/// non-finite components.
pub fn normalize(v: &Vec3) -> GazeResult<Vec3> {
    normalize_labeled(v, "vector")
}

/// Same as [`normalize`], naming the offending quantity in the error.
pub fn normalize_labeled(v: &Vec3, what: &'static str) -> GazeResult<Vec3> {
    let n = magnitude(v);
    if n == 0.0 || !n.is_finite() {
        return Err(GazeError::GeometricDegeneracy { what });
    }
    Ok(v / n)
}

/// Returns `true` when `v` has unit length within [`UNIT_TOLERANCE`].
pub fn is_unit(v: &Vec3) -> bool {
    (magnitude(v) - 1.0).abs() <= UNIT_TOLERANCE
}

/// Returns `true` when every component of `v` is finite.
pub fn is_finite3(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
