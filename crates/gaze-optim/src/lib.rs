//! Non-linear least-squares machinery and the cornea-center estimation problem.
//!
//! The cornea center is the one stage of the gaze pipeline without a closed
//! form: two reflection-law constraints (one per light) are reconciled by a
//! Levenberg-Marquardt search over the two ray coefficients `Kq1`, `Kq2`.

pub mod backend_lm;
pub mod problems;
mod traits;

pub use crate::backend_lm::LmBackend;
pub use crate::problems::cornea_center;
pub use crate::traits::{
    central_difference_jacobian, NllsProblem, NllsSolverBackend, SolveOptions, SolveReport,
};
