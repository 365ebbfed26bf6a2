use nalgebra::DVector;

use crate::error::PbhdmError;
use crate::ode::equations::OdeEquations;
use crate::ode::problem::OdeSolverProblem;
use crate::ode::squared_norm;
use crate::ode_solver_error;

/// State for the ODE solver, containing:
/// - the current solution `y`
/// - the derivative of the solution wrt time `dy`
/// - the current time `t`
/// - the current step size `h`
#[derive(Debug, Clone)]
pub struct RkState {
    pub y: DVector<f64>,
    pub dy: DVector<f64>,
    pub t: f64,
    pub h: f64,
}

impl RkState {
    /// Create a state at the problem's initial condition with a starting
    /// step size chosen for a solver of the given order.
    pub fn new<Eqn: OdeEquations>(problem: &OdeSolverProblem<Eqn>, solver_order: usize) -> Self {
        let t = problem.t0;
        let y = problem.eqn.init(t);
        let dy = problem.eqn.rhs(&y, t);
        let mut state = Self {
            y,
            dy,
            t,
            h: problem.h0,
        };
        state.set_step_size(
            problem.h0,
            &problem.atol,
            problem.rtol,
            &problem.eqn,
            solver_order,
        );
        state
    }

    pub(crate) fn check_consistent_with_problem<Eqn: OdeEquations>(
        &self,
        problem: &OdeSolverProblem<Eqn>,
    ) -> Result<(), PbhdmError> {
        if self.y.len() != problem.eqn.nstates() || self.dy.len() != problem.eqn.nstates() {
            return Err(ode_solver_error!(StateProblemMismatch));
        }
        Ok(())
    }

    /// compute size of first step based on alg in Hairer, Norsett, Wanner
    /// Solving Ordinary Differential Equations I, Nonstiff Problems
    /// Section II.4.2
    /// Note: this assumes y and dy are already set appropriately
    pub fn set_step_size<Eqn: OdeEquations>(
        &mut self,
        h0: f64,
        atol: &DVector<f64>,
        rtol: f64,
        eqn: &Eqn,
        solver_order: usize,
    ) {
        let is_neg_h = h0 < 0.0;
        let (h0, h1) = {
            let y0 = &self.y;
            let t0 = self.t;
            let f0 = &self.dy;

            let d0 = squared_norm(y0, y0, atol, rtol).sqrt();
            let d1 = squared_norm(f0, y0, atol, rtol).sqrt();

            let h0 = if d0 < 1e-5 || d1 < 1e-5 {
                1e-6
            } else {
                0.01 * (d0 / d1)
            };

            // make sure we preserve the sign of h0
            let f1 = if is_neg_h {
                let y1 = y0 - f0 * h0;
                eqn.rhs(&y1, t0 - h0)
            } else {
                let y1 = y0 + f0 * h0;
                eqn.rhs(&y1, t0 + h0)
            };

            let df = f1 - f0;
            let d2 = squared_norm(&df, y0, atol, rtol).sqrt() / h0.abs();

            let max_d = d2.max(d1);
            let h1 = if max_d < 1e-15 {
                (h0 * 1e-3).max(1e-6)
            } else {
                (0.01 / max_d).powf(1.0 / (1.0 + solver_order as f64))
            };
            (h0, h1)
        };

        self.h = (100.0 * h0).min(h1);
        if is_neg_h {
            self.h = -self.h;
        }
    }
}
