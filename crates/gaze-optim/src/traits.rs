use gaze_core::Real;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Generic non-linear least squares problem with dense parameter/residual vectors.
pub trait NllsProblem {
    /// Number of parameters in the optimization vector.
    fn num_params(&self) -> usize;
    /// Number of residual rows in the problem.
    fn num_residuals(&self) -> usize;

    /// Residuals at `x`, or `None` where the model is undefined.
    fn residuals(&self, x: &DVector<Real>) -> Option<DVector<Real>>;

    /// Jacobian at `x`. Defaults to central finite differences.
    fn jacobian(&self, x: &DVector<Real>) -> Option<DMatrix<Real>> {
        central_difference_jacobian(self, x)
    }
}

/// Central-difference Jacobian with a step scaled to each parameter.
pub fn central_difference_jacobian<P: NllsProblem + ?Sized>(
    problem: &P,
    x: &DVector<Real>,
) -> Option<DMatrix<Real>> {
    let m = problem.num_residuals();
    let n = x.len();
    let mut j = DMatrix::zeros(m, n);

    for k in 0..n {
        let h = 1e-6 * x[k].abs().max(1.0);
        let mut x_plus = x.clone();
        let mut x_minus = x.clone();
        x_plus[k] += h;
        x_minus[k] -= h;
        let r_plus = problem.residuals(&x_plus)?;
        let r_minus = problem.residuals(&x_minus)?;
        j.set_column(k, &((r_plus - r_minus) / (2.0 * h)));
    }

    Some(j)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Maximum number of solver iterations before termination.
    ///
    /// The LM backend follows the MINPACK convention and caps function
    /// evaluations at `max_iters * (n + 1)`.
    pub max_iters: usize,
    /// Relative tolerance on the objective (cost) reduction.
    pub ftol: Real,
    /// Orthogonality/gradient tolerance.
    pub gtol: Real,
    /// Relative tolerance on parameter updates.
    pub xtol: Real,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 200,
            ftol: 1e-12,
            gtol: 1e-12,
            xtol: 1e-12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Residual evaluations spent by the solver.
    pub evaluations: usize,
    /// `0.5 * |r|^2` at the returned parameters.
    pub final_cost: Real,
    /// Solver reported a successful termination.
    pub converged: bool,
    /// Solver stopped because it ran out of evaluations.
    pub budget_exhausted: bool,
    /// Backend-specific description of why the solver stopped.
    pub termination: String,
}

pub trait NllsSolverBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport);
}
