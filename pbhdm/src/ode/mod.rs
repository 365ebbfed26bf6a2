//! Explicit Runge-Kutta solvers with embedded error control.
//!
//! The entry point is [`OdeSolverProblem`], which pairs a set of
//! [`OdeEquations`] with tolerances and an initial time. A problem is
//! turned into a stepping solver via [`OdeSolverProblem::tsit45`] or
//! [`OdeSolverProblem::dopri45`], and driven through the
//! [`OdeSolverMethod`] trait.

pub mod config;
pub mod equations;
pub mod explicit_rk;
pub mod method;
pub mod problem;
pub mod state;
pub mod tableau;

#[cfg(test)]
pub mod test_models;

pub use config::RkConfig;
pub use equations::OdeEquations;
pub use explicit_rk::{ExplicitRk, RkStatistics};
pub use method::{OdeSolverMethod, OdeSolverStopReason};
pub use problem::OdeSolverProblem;
pub use state::RkState;
pub use tableau::Tableau;

use nalgebra::DVector;

/// Mean of the squared error components, each scaled by the mixed
/// absolute/relative tolerance `atol_i + rtol * |y_i|`. An error vector
/// passes the step acceptance test when this is below one.
pub fn squared_norm(error: &DVector<f64>, y: &DVector<f64>, atol: &DVector<f64>, rtol: f64) -> f64 {
    let mut acc = 0.0;
    for i in 0..error.len() {
        let scale = atol[i] + rtol * y[i].abs();
        let e = error[i] / scale;
        acc += e * e;
    }
    acc / error.len() as f64
}
