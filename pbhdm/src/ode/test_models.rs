//! Small analytic problems used to test the solvers.

use nalgebra::DVector;

use crate::ode::equations::OdeEquations;
use crate::ode::problem::OdeSolverProblem;

/// dy/dt = -k y, y(0) = y0, with solution y(t) = y0 exp(-k t).
pub struct ExponentialDecay {
    pub k: f64,
    pub y0: f64,
}

impl OdeEquations for ExponentialDecay {
    fn nstates(&self) -> usize {
        1
    }

    fn rhs_inplace(&self, y: &DVector<f64>, _t: f64, dy: &mut DVector<f64>) {
        dy[0] = -self.k * y[0];
    }

    fn init_inplace(&self, _t: f64, y: &mut DVector<f64>) {
        y[0] = self.y0;
    }
}

/// dy/dt = r y (1 - y / k), y(0) = y0, with the usual logistic solution.
pub struct Logistic {
    pub r: f64,
    pub k: f64,
    pub y0: f64,
}

impl OdeEquations for Logistic {
    fn nstates(&self) -> usize {
        1
    }

    fn rhs_inplace(&self, y: &DVector<f64>, _t: f64, dy: &mut DVector<f64>) {
        dy[0] = self.r * y[0] * (1.0 - y[0] / self.k);
    }

    fn init_inplace(&self, _t: f64, y: &mut DVector<f64>) {
        y[0] = self.y0;
    }
}

type Analytic = Box<dyn Fn(f64) -> DVector<f64>>;

pub fn exponential_decay_problem() -> (OdeSolverProblem<ExponentialDecay>, Analytic) {
    let k = 1.0;
    let y0 = 1.0;
    let eqn = ExponentialDecay { k, y0 };
    let problem = OdeSolverProblem::new_scalar_atol(eqn, 1e-6, 1e-8, 0.0, 0.01)
        .expect("valid problem");
    let analytic = Box::new(move |t: f64| DVector::from_element(1, y0 * (-k * t).exp()));
    (problem, analytic)
}

pub fn logistic_problem() -> (OdeSolverProblem<Logistic>, Analytic) {
    let r = 1.0;
    let k = 10.0;
    let y0 = 0.1;
    let eqn = Logistic { r, k, y0 };
    let problem = OdeSolverProblem::new_scalar_atol(eqn, 1e-6, 1e-8, 0.0, 0.01)
        .expect("valid problem");
    let analytic = Box::new(move |t: f64| {
        let denom = 1.0 + (k / y0 - 1.0) * (-r * t).exp();
        DVector::from_element(1, k / denom)
    });
    (problem, analytic)
}
