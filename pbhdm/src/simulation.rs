//! The top-level driver: build the Boltzmann system from a [ModelConfig],
//! integrate it over the normalised time interval and derive the dark
//! matter composition.

use nalgebra::{DMatrix, DVector};

use crate::config::{ModelConfig, RkMethod};
use crate::error::PbhdmError;
use crate::model::BoltzmannEquations;
use crate::ode::{ExplicitRk, OdeSolverMethod, OdeSolverProblem, OdeSolverStopReason, RkStatistics};
use crate::postprocess::{Composition, Trajectory};

/// How the integration ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverStatus {
    /// The solver reached the end of the integration interval.
    Completed,
    /// The solver could not continue past `t`. The trajectory holds the
    /// evaluation points reached before that time.
    StoppedEarly { t: f64, reason: String },
}

impl SolverStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, SolverStatus::Completed)
    }
}

/// The outcome of a single run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub trajectory: Trajectory,
    /// Dark matter composition at the last reached evaluation time, `None`
    /// when no evaluation time was reached at all.
    pub composition: Option<Composition>,
    pub status: SolverStatus,
    pub statistics: RkStatistics,
}

/// Integrate the model described by `config` and post-process the result.
///
/// The equations are integrated on the normalised interval [0, 1] and the
/// solution is evaluated at `config.solver.n_steps` equally spaced times.
/// A stiff blow-up of the scale factor can stop the integration before the
/// end of the interval; the run still returns the trajectory up to that
/// point together with a [SolverStatus::StoppedEarly] status.
pub fn run(config: &ModelConfig) -> Result<SimulationResult, PbhdmError> {
    config.validate()?;

    let eqn = BoltzmannEquations::new(config);
    let problem = OdeSolverProblem::new_scalar_atol(
        eqn,
        config.solver.rtol,
        config.solver.atol,
        0.0,
        config.solver.max_step,
    )?;

    let mut solver = match config.solver.method {
        RkMethod::Tsit45 => problem.tsit45()?,
        RkMethod::Dopri45 => problem.dopri45()?,
    };
    solver.config_mut().maximum_timestep = Some(config.solver.max_step);

    let t_eval = linspace(0.0, 1.0, config.solver.n_steps);
    let (ys, ts, status) = integrate(&mut solver, &t_eval);
    let statistics = solver.get_statistics().clone();

    let trajectory = if ys.is_empty() {
        Trajectory::default()
    } else {
        Trajectory::from_solution(config, &DMatrix::from_columns(&ys), &ts)?
    };
    let composition = trajectory.final_composition().ok();

    Ok(SimulationResult {
        trajectory,
        composition,
        status,
        statistics,
    })
}

/// Step the solver through the evaluation times, interpolating the solution
/// at each one, and stop at the first solver failure.
fn integrate(
    solver: &mut ExplicitRk<'_, BoltzmannEquations>,
    t_eval: &[f64],
) -> (Vec<DVector<f64>>, Vec<f64>, SolverStatus) {
    let mut ys = Vec::with_capacity(t_eval.len());
    let mut ts = Vec::with_capacity(t_eval.len());

    if let Err(e) = solver.set_stop_time(t_eval[t_eval.len() - 1]) {
        return (ys, ts, stopped(solver.state().t, e));
    }
    for &t in t_eval {
        while solver.state().t < t {
            match solver.step() {
                Ok(OdeSolverStopReason::InternalTimestep) => {}
                Ok(OdeSolverStopReason::TstopReached) => break,
                Err(e) => return (ys, ts, stopped(solver.state().t, e)),
            }
        }
        // the tstop-adjusted step can undershoot the final time by roundoff
        let t_interp = t.min(solver.state().t);
        match solver.interpolate(t_interp) {
            Ok(y) => {
                ys.push(y);
                ts.push(t);
            }
            Err(e) => return (ys, ts, stopped(solver.state().t, e)),
        }
    }
    (ys, ts, SolverStatus::Completed)
}

fn stopped(t: f64, e: PbhdmError) -> SolverStatus {
    SolverStatus::StoppedEarly {
        t,
        reason: e.to_string(),
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    // i / (n - 1) hits both endpoints exactly
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| start + (end - start) * (i as f64 / denom))
        .collect()
}
