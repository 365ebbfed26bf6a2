use nalgebra::DVector;

use crate::error::PbhdmError;
use crate::ode::equations::OdeEquations;
use crate::ode::explicit_rk::ExplicitRk;
use crate::ode::state::RkState;
use crate::ode::tableau::Tableau;
use crate::ode_solver_error;

/// An ODE problem, pairing a set of [OdeEquations] with the solver
/// tolerances, the initial time and a suggested initial step size.
pub struct OdeSolverProblem<Eqn: OdeEquations> {
    pub eqn: Eqn,
    pub rtol: f64,
    pub atol: DVector<f64>,
    pub t0: f64,
    pub h0: f64,
}

impl<Eqn: OdeEquations> OdeSolverProblem<Eqn> {
    pub fn new(eqn: Eqn, rtol: f64, atol: DVector<f64>, t0: f64, h0: f64) -> Result<Self, PbhdmError> {
        if atol.len() != eqn.nstates() {
            return Err(ode_solver_error!(StateProblemMismatch));
        }
        Ok(Self {
            eqn,
            rtol,
            atol,
            t0,
            h0,
        })
    }

    /// Like [Self::new] but with a single absolute tolerance broadcast over
    /// all state variables.
    pub fn new_scalar_atol(
        eqn: Eqn,
        rtol: f64,
        atol: f64,
        t0: f64,
        h0: f64,
    ) -> Result<Self, PbhdmError> {
        let n = eqn.nstates();
        Self::new(eqn, rtol, DVector::from_element(n, atol), t0, h0)
    }

    /// Create a Tsitouras 5(4) solver for this problem.
    pub fn tsit45(&self) -> Result<ExplicitRk<'_, Eqn>, PbhdmError> {
        let tableau = Tableau::tsit45();
        let state = RkState::new(self, tableau.order());
        ExplicitRk::new(self, state, tableau)
    }

    /// Create a Dormand-Prince 5(4) solver for this problem.
    pub fn dopri45(&self) -> Result<ExplicitRk<'_, Eqn>, PbhdmError> {
        let tableau = Tableau::dopri45();
        let state = RkState::new(self, tableau.order());
        ExplicitRk::new(self, state, tableau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ode::test_models::ExponentialDecay;

    #[test]
    fn rejects_wrong_atol_length() {
        let eqn = ExponentialDecay { k: 0.1, y0: 1.0 };
        let atol = DVector::from_element(3, 1e-6);
        assert!(OdeSolverProblem::new(eqn, 1e-6, atol, 0.0, 1e-3).is_err());
    }

    #[test]
    fn scalar_atol_is_broadcast() {
        let eqn = ExponentialDecay { k: 0.1, y0: 1.0 };
        let problem = OdeSolverProblem::new_scalar_atol(eqn, 1e-6, 1e-8, 0.0, 1e-3).unwrap();
        assert_eq!(problem.atol.len(), 1);
        assert_eq!(problem.atol[0], 1e-8);
    }
}
