use crate::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};
use gaze_core::Real;
use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt, TerminationReason};
use nalgebra::{storage::Owned, DMatrix, DVector, Dyn};

/// Presents an [`NllsProblem`] to the `levenberg-marquardt` crate, which
/// owns the current parameter vector while it iterates.
struct Adapter<'p, P: NllsProblem> {
    problem: &'p P,
    x: DVector<Real>,
}

impl<P: NllsProblem> LeastSquaresProblem<Real, Dyn, Dyn> for Adapter<'_, P> {
    type ResidualStorage = Owned<Real, Dyn>;
    type JacobianStorage = Owned<Real, Dyn, Dyn>;
    type ParameterStorage = Owned<Real, Dyn>;

    fn set_params(&mut self, x: &DVector<Real>) {
        self.x.copy_from(x);
    }

    fn params(&self) -> DVector<Real> {
        self.x.clone()
    }

    // `None` makes the solver stop with a user-evaluation termination.
    fn residuals(&self) -> Option<DVector<Real>> {
        self.problem.residuals(&self.x)
    }

    fn jacobian(&self) -> Option<DMatrix<Real>> {
        self.problem.jacobian(&self.x)
    }
}

/// Levenberg-Marquardt backend (MINPACK port from the `levenberg-marquardt` crate).
#[derive(Debug, Default, Clone)]
pub struct LmBackend;

impl NllsSolverBackend for LmBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport) {
        let solver = LevenbergMarquardt::new()
            .with_ftol(opts.ftol)
            .with_xtol(opts.xtol)
            .with_gtol(opts.gtol)
            .with_patience(opts.max_iters.max(1));

        let (adapter, outcome) = solver.minimize(Adapter { problem, x: x0 });
        let report = SolveReport {
            evaluations: outcome.number_of_evaluations,
            final_cost: outcome.objective_function,
            converged: outcome.termination.was_successful(),
            budget_exhausted: matches!(outcome.termination, TerminationReason::LostPatience),
            termination: format!("{:?}", outcome.termination),
        };
        (adapter.x, report)
    }
}
