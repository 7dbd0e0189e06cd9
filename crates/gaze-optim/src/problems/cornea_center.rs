//! Cornea-center estimation from two corneal reflections.
//!
//! For light `i` the point of reflection lies on the camera ray through the
//! glint image `u_i`:
//!
//! ```text
//! q_i = o + Kq_i * normalize(o - u_i)
//! ```
//!
//! By the law of reflection the surface normal at `q_i` bisects the
//! directions towards the light and towards the camera, so the center of
//! corneal curvature is
//!
//! ```text
//! c_i = q_i - R * normalize(normalize(l_i - q_i) + normalize(o - q_i))
//! ```
//!
//! Both lights must agree on the same center, which fixes `Kq1`, `Kq2`:
//! `min |c_1(Kq1) - c_2(Kq2)|`, solved here as least squares on the
//! 3-vector `c_1 - c_2`. The estimate is the midpoint of `c_1` and `c_2`.

use gaze_core::{normalize_labeled, GazeError, GazeResult, Pt3, Real, Vec3};
use log::{debug, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{LmBackend, NllsProblem, NllsSolverBackend, SolveOptions};

/// Point of reflection at distance `kq` along the unit camera ray `ray`.
pub fn reflection_point(camera: &Pt3, ray: &Vec3, kq: Real) -> Pt3 {
    camera + ray * kq
}

/// Center of corneal curvature implied by a reflection at `q`.
pub fn center_from_reflection(q: &Pt3, light: &Pt3, camera: &Pt3, radius: Real) -> GazeResult<Pt3> {
    let to_light = normalize_labeled(&(light - q), "reflection point to light")?;
    let to_camera = normalize_labeled(&(camera - q), "reflection point to camera")?;
    let normal = normalize_labeled(&(to_light + to_camera), "corneal surface normal")?;
    Ok(q - normal * radius)
}

/// Two-light reflection geometry for one frame, all points in WCS.
#[derive(Debug, Clone)]
pub struct CorneaCenterProblem {
    camera: Pt3,
    lights: [Pt3; 2],
    rays: [Vec3; 2],
    radius: Real,
}

impl CorneaCenterProblem {
    /// `glints` are the glint images already lifted into WCS, in light order.
    ///
    /// Fails with [`GazeError::GeometricDegeneracy`] when a glint image
    /// coincides with the camera nodal point.
    pub fn new(camera: Pt3, glints: [Pt3; 2], lights: [Pt3; 2], radius: Real) -> GazeResult<Self> {
        let rays = [
            normalize_labeled(&(camera - glints[0]), "camera to glint 1")?,
            normalize_labeled(&(camera - glints[1]), "camera to glint 2")?,
        ];
        Ok(Self {
            camera,
            lights,
            rays,
            radius,
        })
    }

    /// Unit ray from the camera towards the reflection of light `i`.
    pub fn ray(&self, i: usize) -> &Vec3 {
        &self.rays[i]
    }

    /// Cornea center seen through light `i` at ray coefficient `kq`.
    pub fn center_for(&self, i: usize, kq: Real) -> GazeResult<Pt3> {
        let q = reflection_point(&self.camera, &self.rays[i], kq);
        center_from_reflection(&q, &self.lights[i], &self.camera, self.radius)
    }

    pub fn centers(&self, kq: [Real; 2]) -> GazeResult<[Pt3; 2]> {
        Ok([self.center_for(0, kq[0])?, self.center_for(1, kq[1])?])
    }
}

impl NllsProblem for CorneaCenterProblem {
    fn num_params(&self) -> usize {
        2
    }

    fn num_residuals(&self) -> usize {
        3
    }

    fn residuals(&self, x: &DVector<Real>) -> Option<DVector<Real>> {
        let [c1, c2] = self.centers([x[0], x[1]]).ok()?;
        let d = c1 - c2;
        Some(DVector::from_column_slice(d.as_slice()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorneaCenterOptions {
    pub solve: SolveOptions,
    /// Largest accepted distance between the two per-light centers (cm).
    ///
    /// Glint noise keeps the per-light centers of measured frames apart by a
    /// couple of tenths of a millimeter even at the optimum.
    pub max_residual_cm: Real,
}

impl Default for CorneaCenterOptions {
    fn default() -> Self {
        Self {
            solve: SolveOptions::default(),
            max_residual_cm: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorneaCenterEstimate {
    /// Midpoint of the two per-light centers (WCS).
    pub center: Pt3,
    /// Ray coefficients `[Kq1, Kq2]` at the solution.
    pub kq: [Real; 2],
    /// Remaining distance between the two per-light centers (cm).
    pub residual_cm: Real,
    pub evaluations: usize,
}

/// Estimate the cornea center with the Levenberg-Marquardt backend.
///
/// `seed` is the starting value of both `Kq` coefficients; since the rays are
/// unit length it is the approximate camera-to-eye distance.
pub fn estimate_cornea_center(
    problem: &CorneaCenterProblem,
    seed: Real,
    opts: &CorneaCenterOptions,
) -> GazeResult<CorneaCenterEstimate> {
    estimate_cornea_center_with(&LmBackend, problem, seed, opts)
}

pub fn estimate_cornea_center_with<B: NllsSolverBackend>(
    backend: &B,
    problem: &CorneaCenterProblem,
    seed: Real,
    opts: &CorneaCenterOptions,
) -> GazeResult<CorneaCenterEstimate> {
    let x0 = DVector::from_element(2, seed);
    let (x, report) = backend.solve(problem, x0, &opts.solve);
    let evaluations = report.evaluations;
    let kq = [x[0], x[1]];

    let failure = |reason: &'static str, residual: Real| GazeError::ConvergenceFailure {
        reason,
        residual,
        evaluations,
    };

    if !kq.iter().all(|k| k.is_finite()) {
        return Err(failure("ray coefficients are not finite", Real::NAN));
    }
    let [c1, c2] = problem
        .centers(kq)
        .map_err(|_| failure("reflection geometry undefined at the solution", Real::NAN))?;
    let residual = (c1 - c2).norm();

    if kq.iter().any(|k| *k <= 0.0) {
        return Err(failure("reflection point behind the camera", residual));
    }
    if !(residual <= opts.max_residual_cm) {
        let reason = if report.budget_exhausted {
            "evaluation budget exhausted"
        } else {
            "per-light cornea centers do not agree"
        };
        return Err(failure(reason, residual));
    }
    if !report.converged {
        warn!(
            "cornea-center solver stopped with {} but residual {:.3e} cm is within tolerance",
            report.termination, residual
        );
    }

    let center = nalgebra::center(&c1, &c2);
    debug!(
        "cornea center {:?} (Kq = {:?}, residual {:.3e} cm, {} evaluations)",
        center, kq, residual, evaluations
    );

    Ok(CorneaCenterEstimate {
        center,
        kq,
        residual_cm: residual,
        evaluations,
    })
}
