use nalgebra::{DMatrix, DVector};

use crate::error::PbhdmError;
use crate::ode::config::RkConfig;
use crate::ode::equations::OdeEquations;
use crate::ode::problem::OdeSolverProblem;
use crate::ode::state::RkState;
use crate::ode_solver_error;

/// The reason why the solver stopped after a call to [OdeSolverMethod::step].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdeSolverStopReason {
    /// The solver took an internal timestep chosen by its error control.
    InternalTimestep,
    /// The solver reached the stop time set by [OdeSolverMethod::set_stop_time].
    TstopReached,
}

/// A generic interface to an ODE solver.
///
/// The solver is advanced one adaptive step at a time with [Self::step], or
/// driven to a final time with the higher level [Self::solve] and
/// [Self::solve_dense] methods.
pub trait OdeSolverMethod<'a, Eqn: OdeEquations + 'a> {
    /// Get the current configuration of the solver
    fn config(&self) -> &RkConfig;

    /// Get a mutable reference to the current configuration of the solver
    fn config_mut(&mut self) -> &mut RkConfig;

    /// Get the current problem
    fn problem(&self) -> &'a OdeSolverProblem<Eqn>;

    /// Get the current order of accuracy of the solver
    fn order(&self) -> usize;

    /// Get the current state of the solver
    fn state(&self) -> &RkState;

    /// Get a mutable reference to the current state of the solver.
    /// Note that calling this will cause the next call to `step` to perform
    /// some reinitialisation of the solver
    fn state_mut(&mut self) -> &mut RkState;

    /// Replace the current state of the solver
    fn set_state(&mut self, state: RkState);

    /// Take the current state of the solver, consuming the solver
    fn into_state(self) -> RkState;

    /// Clone the current state of the solver
    fn checkpoint(&mut self) -> RkState;

    /// Step the solution forward by one adaptive step, returning the reason
    /// the solver stopped
    fn step(&mut self) -> Result<OdeSolverStopReason, PbhdmError>;

    /// Set a stop time for the solver. The solver will stop when the
    /// internal time reaches this time
    fn set_stop_time(&mut self, tstop: f64) -> Result<(), PbhdmError>;

    /// Interpolate the solution at a given time and write it to `y`. This
    /// time should be between the current time and the last solver time step
    fn interpolate_inplace(&self, t: f64, y: &mut DVector<f64>) -> Result<(), PbhdmError>;

    /// Allocating convenience wrapper around [Self::interpolate_inplace]
    fn interpolate(&self, t: f64) -> Result<DVector<f64>, PbhdmError> {
        let mut y = DVector::zeros(self.state().y.len());
        self.interpolate_inplace(t, &mut y)?;
        Ok(y)
    }

    /// Solve the ODE from the current time to `final_time`.
    ///
    /// This method integrates the system and returns the solution at adaptive timepoints chosen by the solver's
    /// internal error control mechanism. This is useful when you want the minimal number of timepoints for a given accuracy.
    ///
    /// # Returns
    /// A tuple of `(solution_matrix, times)` where:
    /// - `solution_matrix` is a dense matrix with one column per solution time and one row per state variable
    /// - `times` is a vector of times at which the solution was evaluated
    ///
    /// # Post-condition
    /// After the solver finishes, the internal state of the solver is at time `final_time`.
    fn solve(&mut self, final_time: f64) -> Result<(DMatrix<f64>, Vec<f64>), PbhdmError>
    where
        Self: Sized,
    {
        let mut ret_t = vec![self.state().t];
        let mut ret_y = vec![self.state().y.clone()];

        // do the main loop
        self.set_stop_time(final_time)?;
        loop {
            let reason = self.step()?;
            ret_t.push(self.state().t);
            ret_y.push(self.state().y.clone());
            if reason == OdeSolverStopReason::TstopReached {
                break;
            }
        }
        Ok((DMatrix::from_columns(&ret_y), ret_t))
    }

    /// Solve the ODE from the current time to `t_eval[t_eval.len()-1]`, evaluating at specified times.
    ///
    /// This method integrates the system and returns the solution interpolated at the specified times.
    /// The solver uses its own internal timesteps for accuracy, but the output is interpolated to the
    /// requested evaluation times.
    ///
    /// # Returns
    /// A dense matrix with one column per evaluation time (in the same order as `t_eval`) and one row per state variable.
    ///
    /// # Post-condition
    /// After the solver finishes, the internal state of the solver is at time `t_eval[t_eval.len()-1]`.
    fn solve_dense(&mut self, t_eval: &[f64]) -> Result<DMatrix<f64>, PbhdmError>
    where
        Self: Sized,
    {
        if t_eval.is_empty()
            || t_eval[0] < self.state().t
            || t_eval.windows(2).any(|w| w[1] <= w[0])
        {
            return Err(ode_solver_error!(InvalidTEval));
        }

        let nstates = self.problem().eqn.nstates();
        let mut ret = DMatrix::zeros(nstates, t_eval.len());
        let mut y = DVector::zeros(nstates);

        // do loop
        self.set_stop_time(t_eval[t_eval.len() - 1])?;
        for (i, t) in t_eval.iter().enumerate() {
            while self.state().t < *t {
                match self.step()? {
                    OdeSolverStopReason::InternalTimestep => {}
                    OdeSolverStopReason::TstopReached => break,
                }
            }
            // the tstop-adjusted step can undershoot the final time by roundoff
            let t_interp = t.min(self.state().t);
            self.interpolate_inplace(t_interp, &mut y)?;
            ret.column_mut(i).copy_from(&y);
        }
        Ok(ret)
    }
}
