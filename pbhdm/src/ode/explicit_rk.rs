use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::error::{OdeSolverError, PbhdmError};
use crate::ode::config::RkConfig;
use crate::ode::equations::OdeEquations;
use crate::ode::method::{OdeSolverMethod, OdeSolverStopReason};
use crate::ode::problem::OdeSolverProblem;
use crate::ode::squared_norm;
use crate::ode::state::RkState;
use crate::ode::tableau::Tableau;
use crate::ode_solver_error;

/// Solver statistics, accumulated over the lifetime of the solver.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RkStatistics {
    pub number_of_steps: usize,
    pub number_of_error_test_failures: usize,
    pub number_of_rhs_evals: usize,
}

/// An explicit Runge-Kutta method.
///
/// The particular method is defined by the [Tableau] used to create the solver.
/// If the `beta` matrix of the [Tableau] is present this is used for interpolation, otherwise hermite interpolation is used.
///
/// Restrictions:
/// - The upper triangular and diagonal parts of the `a` matrix must be zero (i.e. explicit).
/// - The last row of the `a` matrix must be the same as the `b` vector, and the last element of the `c` vector must be 1 (i.e. a stiffly accurate method)
pub struct ExplicitRk<'a, Eqn: OdeEquations> {
    problem: &'a OdeSolverProblem<Eqn>,
    tableau: Tableau,
    state: RkState,
    old_state: RkState,
    a_rows: Vec<DVector<f64>>,
    statistics: RkStatistics,
    tstop: Option<f64>,
    // column i holds h * f(y_i) for stage i
    diff: DMatrix<f64>,
    error: DVector<f64>,
    is_state_mutated: bool,
    config: RkConfig,
}

impl<'a, Eqn: OdeEquations> ExplicitRk<'a, Eqn> {
    pub fn new(
        problem: &'a OdeSolverProblem<Eqn>,
        state: RkState,
        tableau: Tableau,
    ) -> Result<Self, PbhdmError> {
        Self::check_explicit_rk(&tableau)?;
        state.check_consistent_with_problem(problem)?;

        let nstates = state.y.len();
        let s = tableau.s();
        let mut a_rows = Vec::with_capacity(s);
        for i in 0..s {
            let mut row = Vec::with_capacity(i);
            for j in 0..i {
                row.push(tableau.a()[(i, j)]);
            }
            a_rows.push(DVector::from_vec(row));
        }

        let diff = DMatrix::zeros(nstates, s);
        let error = DVector::zeros(nstates);
        let old_state = state.clone();

        Ok(Self {
            problem,
            tableau,
            state,
            old_state,
            a_rows,
            statistics: RkStatistics::default(),
            tstop: None,
            diff,
            error,
            is_state_mutated: false,
            config: RkConfig::default(),
        })
    }

    fn check_explicit_rk(tableau: &Tableau) -> Result<(), PbhdmError> {
        // check that the upper triangular and diagonal parts of a are zero
        let s = tableau.s();
        for i in 0..s {
            for j in i..s {
                if tableau.a()[(i, j)] != 0.0 {
                    return Err(ode_solver_error!(
                        InvalidTableau,
                        format!(
                            "Invalid tableau, expected a(i, j) = 0 for i >= j, but found a({}, {}) = {}",
                            i,
                            j,
                            tableau.a()[(i, j)]
                        )
                    ));
                }
            }
        }

        // check last row of a is the same as b
        for i in 0..s {
            if tableau.a()[(s - 1, i)] != tableau.b()[i] {
                return Err(ode_solver_error!(
                    InvalidTableau,
                    "Invalid tableau, expected a(s-1, i) = b(i)"
                ));
            }
        }

        // check that last c is 1
        if tableau.c()[s - 1] != 1.0 {
            return Err(ode_solver_error!(
                InvalidTableau,
                "Invalid tableau, expected c(s-1) = 1"
            ));
        }

        // check that first c is 0
        if tableau.c()[0] != 0.0 {
            return Err(ode_solver_error!(
                InvalidTableau,
                "Invalid tableau, expected c(0) = 0"
            ));
        }
        Ok(())
    }

    pub fn get_statistics(&self) -> &RkStatistics {
        &self.statistics
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    fn start_step(&mut self) -> Result<f64, PbhdmError> {
        if self.is_state_mutated {
            // reinitialise tstop if needed
            if let Some(t_stop) = self.tstop {
                self.set_stop_time(t_stop)?;
            }
            self.is_state_mutated = false;
        }
        // the starting step heuristic and state_mut are not bound by the
        // step size cap, so enforce it here as well
        if let Some(h_max) = self.config.maximum_timestep {
            if self.state.h.abs() > h_max {
                self.state.h = h_max.copysign(self.state.h);
            }
        }
        Ok(self.state.h)
    }

    fn start_step_attempt(&mut self, h: f64) {
        // the first stage is the last stage of the previous step
        self.diff.column_mut(0).axpy(h, &self.state.dy, 0.0);
    }

    fn do_stage(&mut self, i: usize, h: f64) {
        let t = self.state.t + self.tableau.c()[i] * h;

        self.old_state.y.copy_from(&self.state.y);
        self.old_state
            .y
            .gemv(1.0, &self.diff.columns(0, i), &self.a_rows[i], 1.0);

        // update diff with the new stage derivative
        self.problem
            .eqn
            .rhs_inplace(&self.old_state.y, t, &mut self.old_state.dy);
        self.statistics.number_of_rhs_evals += 1;
        self.diff.column_mut(i).axpy(h, &self.old_state.dy, 0.0);
    }

    fn error_norm(&mut self) -> f64 {
        self.error
            .gemv(1.0, &self.diff, self.tableau.d(), 0.0);
        squared_norm(
            &self.error,
            &self.state.y,
            &self.problem.atol,
            self.problem.rtol,
        )
    }

    fn factor(&self, error_norm: f64) -> f64 {
        let safety = 0.9;
        let factor = safety * error_norm.powf(-0.5 / (self.order() as f64 + 1.0));
        factor.clamp(
            self.config.minimum_timestep_shrink,
            self.config.maximum_timestep_growth,
        )
    }

    fn error_test_fail(&mut self, h: f64, nattempts: usize) -> Result<(), PbhdmError> {
        self.statistics.number_of_error_test_failures += 1;
        // if too many error test failures, then fail
        if nattempts >= self.config.maximum_error_test_failures {
            return Err(PbhdmError::from(OdeSolverError::TooManyErrorTestFailures {
                time: self.state.t,
            }));
        }
        // if step size too small, then fail
        if h.abs() < self.config.minimum_timestep {
            return Err(PbhdmError::from(OdeSolverError::StepSizeTooSmall {
                time: self.state.t,
            }));
        }
        Ok(())
    }

    fn step_accepted(&mut self, h: f64, new_h: f64) -> Result<OdeSolverStopReason, PbhdmError> {
        // the last stage is the new state, since the method is stiffly accurate
        self.old_state.t = self.state.t + h;
        self.old_state.h = match self.config.maximum_timestep {
            Some(h_max) if new_h.abs() > h_max => h_max.copysign(new_h),
            _ => new_h,
        };
        std::mem::swap(&mut self.old_state, &mut self.state);

        self.statistics.number_of_steps += 1;

        // check if the we are at tstop
        if let Some(tstop) = self.tstop {
            if let Some(OdeSolverStopReason::TstopReached) = self.handle_tstop(tstop)? {
                self.tstop = None;
                return Ok(OdeSolverStopReason::TstopReached);
            }
        }

        // just a normal step, no tstop reached
        Ok(OdeSolverStopReason::InternalTimestep)
    }

    fn handle_tstop(&mut self, tstop: f64) -> Result<Option<OdeSolverStopReason>, PbhdmError> {
        let state = &mut self.state;
        // check if the we are at tstop
        let troundoff = 100.0 * f64::EPSILON * (state.t.abs() + state.h.abs());
        if (state.t - tstop).abs() <= troundoff {
            return Ok(Some(OdeSolverStopReason::TstopReached));
        } else if (state.h > 0.0 && tstop < state.t - troundoff)
            || (state.h < 0.0 && tstop > state.t + troundoff)
        {
            return Err(PbhdmError::from(
                OdeSolverError::StopTimeBeforeCurrentTime {
                    stop_time: tstop,
                    state_time: state.t,
                },
            ));
        }

        // check if the next step will be beyond tstop, if so adjust the step size
        if (state.h > 0.0 && state.t + state.h > tstop + troundoff)
            || (state.h < 0.0 && state.t + state.h < tstop - troundoff)
        {
            let factor = (tstop - state.t) / state.h;
            state.h *= factor;
        }
        Ok(None)
    }

    fn interpolate_beta_function(theta: f64, beta: &DMatrix<f64>) -> DVector<f64> {
        let poly_order = beta.ncols();
        let mut thetav = Vec::with_capacity(poly_order);
        thetav.push(theta);
        for i in 1..poly_order {
            thetav.push(theta * thetav[i - 1]);
        }
        // beta_poly = beta * thetav
        beta * DVector::from_vec(thetav)
    }

    fn interpolate_hermite(
        theta: f64,
        u0: &DVector<f64>,
        u1: &DVector<f64>,
        diff: &DMatrix<f64>,
        y: &mut DVector<f64>,
    ) {
        let hf0 = diff.column(0);
        let hf1 = diff.column(diff.ncols() - 1);

        y.copy_from(u1);
        *y -= u0;
        y.axpy(theta - 1.0, &hf0, 1.0 - 2.0 * theta);
        y.axpy(theta, &hf1, 1.0);
        y.axpy(1.0 - theta, u0, theta * (theta - 1.0));
        y.axpy(theta, u1, 1.0);
    }
}

impl<'a, Eqn: OdeEquations> OdeSolverMethod<'a, Eqn> for ExplicitRk<'a, Eqn> {
    fn config(&self) -> &RkConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut RkConfig {
        &mut self.config
    }

    fn problem(&self) -> &'a OdeSolverProblem<Eqn> {
        self.problem
    }

    fn order(&self) -> usize {
        self.tableau.order()
    }

    fn state(&self) -> &RkState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut RkState {
        self.is_state_mutated = true;
        &mut self.state
    }

    fn set_state(&mut self, state: RkState) {
        self.is_state_mutated = true;
        self.state = state;
    }

    fn into_state(self) -> RkState {
        self.state
    }

    fn checkpoint(&mut self) -> RkState {
        self.state.clone()
    }

    fn step(&mut self) -> Result<OdeSolverStopReason, PbhdmError> {
        let mut h = self.start_step()?;

        // loop until step is accepted
        let mut nattempts = 0;
        let factor = loop {
            // start a step attempt
            self.start_step_attempt(h);
            for i in 1..self.tableau.s() {
                self.do_stage(i, h);
            }
            let error_norm = self.error_norm();
            let factor = self.factor(error_norm);
            if error_norm < 1.0 {
                break factor;
            }
            h *= factor;
            nattempts += 1;
            self.error_test_fail(h, nattempts)?;
        };
        self.step_accepted(h, h * factor)
    }

    fn set_stop_time(&mut self, tstop: f64) -> Result<(), PbhdmError> {
        self.tstop = Some(tstop);
        if let Some(OdeSolverStopReason::TstopReached) = self.handle_tstop(tstop)? {
            self.tstop = None;
            return Err(PbhdmError::from(OdeSolverError::StopTimeAtCurrentTime));
        }
        Ok(())
    }

    fn interpolate_inplace(&self, t: f64, ret: &mut DVector<f64>) -> Result<(), PbhdmError> {
        if ret.len() != self.state.y.len() {
            return Err(PbhdmError::from(
                OdeSolverError::InterpolationVectorWrongSize {
                    expected: self.state.y.len(),
                    found: ret.len(),
                },
            ));
        }
        if self.is_state_mutated {
            if t == self.state.t {
                ret.copy_from(&self.state.y);
                return Ok(());
            } else {
                return Err(ode_solver_error!(InterpolationTimeOutsideCurrentStep));
            }
        }

        // check that t is within the current step depending on the direction
        let is_forward = self.state.h > 0.0;
        if (is_forward && (t > self.state.t || t < self.old_state.t))
            || (!is_forward && (t < self.state.t || t > self.old_state.t))
        {
            return Err(ode_solver_error!(InterpolationTimeOutsideCurrentStep));
        }

        let dt = self.state.t - self.old_state.t;
        let theta = if dt == 0.0 {
            1.0
        } else {
            (t - self.old_state.t) / dt
        };
        if let Some(beta) = self.tableau.beta() {
            let beta_f = Self::interpolate_beta_function(theta, beta);
            ret.copy_from(&self.old_state.y);
            ret.gemv(1.0, &self.diff, &beta_f, 1.0);
        } else {
            Self::interpolate_hermite(theta, &self.old_state.y, &self.state.y, &self.diff, ret);
        }
        Ok(())
    }
}
