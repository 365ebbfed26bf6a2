//! The coupled Boltzmann-Friedmann right-hand side.
//!
//! State vector (indices below):
//!
//! ```text
//! y = [ M_pbh, n_wimp a^3, n_axion a^3, ln(rho_rad a^4), ln(a) ]
//! ```
//!
//! The scale factor and the comoving radiation energy are integrated in
//! log form so both stay positive by construction.

use nalgebra::DVector;

use crate::config::ModelConfig;
use crate::model::hawking::{evaporation_rate, hawking_temperature_gev};
use crate::model::species::Species;
use crate::ode::OdeEquations;

pub const M_PBH: usize = 0;
pub const N_WIMP_A3: usize = 1;
pub const N_AXION_A3: usize = 2;
pub const LN_RHO_RAD_A4: usize = 3;
pub const LN_A: usize = 4;
pub const NSTATES: usize = 5;

/// The five coupled equations for the PBH-unified dark matter model.
#[derive(Debug, Clone)]
pub struct BoltzmannEquations {
    pub m_initial_grams: f64,
    pub beta: f64,
    pub memory_burden: bool,
    pub wimp: Species,
    pub axion: Species,
    /// Initial radiation temperature in GeV; T_rad = T_initial / a.
    pub t_initial_gev: f64,
}

impl BoltzmannEquations {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            m_initial_grams: config.pbh.m_initial_grams,
            beta: config.pbh.beta,
            memory_burden: config.pbh.memory_burden_enabled,
            wimp: Species::from_config(&config.dm.wimp),
            axion: Species::from_config(&config.dm.axion),
            t_initial_gev: config.solver.t_initial_gev,
        }
    }

    /// Hubble rate H = sqrt(8 pi / 3 (rho_rad + rho_wimp + rho_axion + rho_pbh)).
    ///
    /// The PBH contribution enters as the bare mass, matching the reference
    /// formulation.
    pub fn hubble_rate(&self, rho_rad: f64, rho_wimp: f64, rho_axion: f64, m_pbh: f64) -> f64 {
        (8.0 * std::f64::consts::PI / 3.0 * (rho_rad + rho_wimp + rho_axion + m_pbh)).sqrt()
    }

    /// Radiation temperature at scale factor `a` (radiation era, T ~ 1/a).
    pub fn radiation_temperature(&self, a: f64) -> f64 {
        self.t_initial_gev / a
    }
}

impl OdeEquations for BoltzmannEquations {
    fn nstates(&self) -> usize {
        NSTATES
    }

    fn rhs_inplace(&self, y: &DVector<f64>, _t: f64, dy: &mut DVector<f64>) {
        let m_pbh = y[M_PBH];
        let n_wimp_a3 = y[N_WIMP_A3];
        let n_axion_a3 = y[N_AXION_A3];
        let rho_rad_a4 = y[LN_RHO_RAD_A4].exp();
        let a = y[LN_A].exp();

        let a3 = a * a * a;
        let t_hawking = hawking_temperature_gev(m_pbh);
        let n_wimp = n_wimp_a3 / a3;
        let n_axion = n_axion_a3 / a3;
        let rho_rad = rho_rad_a4 / (a3 * a);
        let rho_wimp = n_wimp * self.wimp.mass_gev;
        let rho_axion = n_axion * self.axion.mass_gev;

        let h = self.hubble_rate(rho_rad, rho_wimp, rho_axion, m_pbh);

        // PBH mass evolution
        let dm_dt = evaporation_rate(m_pbh, self.m_initial_grams, self.memory_burden);
        dy[M_PBH] = dm_dt;

        // WIMP production and annihilation
        let wimp_prod = self.wimp.production_rate(dm_dt, t_hawking, self.beta);
        let wimp_ann = self.wimp.annihilation_rate(n_wimp);
        dy[N_WIMP_A3] = (wimp_prod - wimp_ann / a3) * a3 + n_wimp_a3 * h * a;

        // axion production only
        let axion_prod = self.axion.production_rate(dm_dt, t_hawking, self.beta);
        dy[N_AXION_A3] = axion_prod * a3 + n_axion_a3 * h * a;

        // radiation energy sourced by the evaporating PBH
        dy[LN_RHO_RAD_A4] = if rho_rad_a4 > 0.0 {
            -dm_dt / rho_rad_a4 - 4.0 * h
        } else {
            0.0
        };

        // scale factor
        dy[LN_A] = if a > 0.0 { h } else { 0.0 };
    }

    fn init_inplace(&self, _t: f64, y: &mut DVector<f64>) {
        y[M_PBH] = self.m_initial_grams;
        y[N_WIMP_A3] = 1.0e-15;
        y[N_AXION_A3] = 1.0e-15;
        y[LN_RHO_RAD_A4] = 0.0;
        y[LN_A] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::ode::OdeEquations;

    fn equations() -> BoltzmannEquations {
        BoltzmannEquations::new(&ModelConfig::default())
    }

    #[test]
    fn initial_state_matches_reference() {
        let eqn = equations();
        let y0 = eqn.init(0.0);
        assert_eq!(y0[M_PBH], 1.0e9);
        assert_eq!(y0[N_WIMP_A3], 1.0e-15);
        assert_eq!(y0[N_AXION_A3], 1.0e-15);
        assert_eq!(y0[LN_RHO_RAD_A4], 0.0);
        assert_eq!(y0[LN_A], 0.0);
    }

    #[test]
    fn pbh_loses_mass_and_universe_expands() {
        let eqn = equations();
        let y0 = eqn.init(0.0);
        let dy = eqn.rhs(&y0, 0.0);
        assert!(dy[M_PBH] < 0.0);
        assert!(dy[LN_A] > 0.0);
    }

    #[test]
    fn initial_hubble_rate_is_pbh_dominated() {
        let eqn = equations();
        let h = eqn.hubble_rate(1.0, 0.0, 0.0, 1.0e9);
        let expected = (8.0 * std::f64::consts::PI / 3.0 * (1.0 + 1.0e9)).sqrt();
        assert!((h - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn radiation_cools_with_expansion() {
        let eqn = equations();
        assert_eq!(eqn.radiation_temperature(1.0), 1.0e9);
        assert_eq!(eqn.radiation_temperature(1.0e10), 0.1);
    }

    #[test]
    fn axion_is_sourced_at_the_start() {
        let eqn = equations();
        let y0 = eqn.init(0.0);
        let dy = eqn.rhs(&y0, 0.0);
        // a = 1, so the comoving axion growth includes the positive
        // production and dilution terms
        assert!(dy[N_AXION_A3] > 0.0);
    }

    #[test]
    fn radiation_equation_guards_vanishing_density() {
        let eqn = equations();
        let mut y0 = eqn.init(0.0);
        // drive rho_rad a^4 to an underflowed zero
        y0[LN_RHO_RAD_A4] = -1.0e4;
        let dy = eqn.rhs(&y0, 0.0);
        assert_eq!(dy[LN_RHO_RAD_A4], 0.0);
    }
}
