//! Derived observables: a [Trajectory] of physical quantities along the
//! solution, and the final dark matter [Composition].

use std::fmt;

use nalgebra::DMatrix;

use crate::config::ModelConfig;
use crate::constants::RHO_DM_FLOOR;
use crate::error::{PbhdmError, PostProcessError};
use crate::model::{hawking_temperature_gev, LN_A, LN_RHO_RAD_A4, M_PBH, NSTATES, N_AXION_A3, N_WIMP_A3};

/// Target composition of the 62-33-5 hypothesis.
pub const TARGET_F_WIMP: f64 = 0.62;
pub const TARGET_F_AXION: f64 = 0.33;
pub const TARGET_F_PBH_REMNANT: f64 = 0.05;

/// Physical quantities derived from the raw solution, one entry per
/// evaluation time.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    /// Normalised integration time.
    pub t: Vec<f64>,
    /// Scale factor, normalised to 1 at the start of the run.
    pub a: Vec<f64>,
    /// Radiation temperature in GeV.
    pub t_rad: Vec<f64>,
    /// PBH mass in grams.
    pub m_pbh: Vec<f64>,
    /// Hawking temperature in GeV.
    pub t_hawking: Vec<f64>,
    /// Comoving WIMP number density.
    pub n_wimp_a3: Vec<f64>,
    /// Comoving axion number density.
    pub n_axion_a3: Vec<f64>,
    /// Radiation energy density.
    pub rho_rad: Vec<f64>,
    /// WIMP fraction of the dark matter energy density.
    pub f_wimp: Vec<f64>,
    /// Axion fraction of the dark matter energy density.
    pub f_axion: Vec<f64>,
    /// Stabilised PBH remnant fraction of the dark matter energy density.
    pub f_pbh_rem: Vec<f64>,
}

impl Trajectory {
    /// Derive the trajectory from the raw solution matrix (one column per
    /// time in `times`, one row per state variable).
    pub fn from_solution(
        config: &ModelConfig,
        ys: &DMatrix<f64>,
        times: &[f64],
    ) -> Result<Self, PbhdmError> {
        if times.is_empty() {
            return Err(PostProcessError::EmptySolution.into());
        }
        if ys.nrows() != NSTATES {
            return Err(PostProcessError::WrongStateCount(ys.nrows()).into());
        }
        if ys.ncols() != times.len() {
            return Err(PostProcessError::SolutionShapeMismatch {
                ncols: ys.ncols(),
                ntimes: times.len(),
            }
            .into());
        }

        let m0 = config.pbh.m_initial_grams;
        let m_wimp = config.dm.wimp.mass_gev;
        let m_axion = config.dm.axion.mass_gev;
        let t_initial = config.solver.t_initial_gev;

        let mut traj = Self::default();
        for (i, &t) in times.iter().enumerate() {
            let m_pbh = ys[(M_PBH, i)];
            let n_wimp_a3 = ys[(N_WIMP_A3, i)];
            let n_axion_a3 = ys[(N_AXION_A3, i)];
            let rho_rad_a4 = ys[(LN_RHO_RAD_A4, i)].exp();
            let a = ys[(LN_A, i)].exp();

            let a3 = a * a * a;
            let n_wimp = n_wimp_a3 / a3;
            let n_axion = n_axion_a3 / a3;

            let rho_wimp = n_wimp * m_wimp;
            let rho_axion = n_axion * m_axion;
            let rho_rad = rho_rad_a4 / (a3 * a);

            // once more than half the initial mass has evaporated, the
            // memory-burden stabilised remainder counts as a relic
            let rho_pbh_rem = if m_pbh < 0.5 * m0 { m_pbh } else { 0.0 };

            let rho_dm_total = rho_wimp + rho_axion + rho_pbh_rem;
            let (f_wimp, f_axion, f_pbh_rem) = if rho_dm_total > RHO_DM_FLOOR {
                (
                    rho_wimp / rho_dm_total,
                    rho_axion / rho_dm_total,
                    rho_pbh_rem / rho_dm_total,
                )
            } else {
                (0.0, 0.0, 0.0)
            };

            traj.t.push(t);
            traj.a.push(a);
            traj.t_rad.push(t_initial / a);
            traj.m_pbh.push(m_pbh);
            traj.t_hawking.push(hawking_temperature_gev(m_pbh));
            traj.n_wimp_a3.push(n_wimp_a3);
            traj.n_axion_a3.push(n_axion_a3);
            traj.rho_rad.push(rho_rad);
            traj.f_wimp.push(f_wimp);
            traj.f_axion.push(f_axion);
            traj.f_pbh_rem.push(f_pbh_rem);
        }
        Ok(traj)
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// The dark matter composition at the last evaluation time.
    pub fn final_composition(&self) -> Result<Composition, PbhdmError> {
        if self.is_empty() {
            return Err(PostProcessError::EmptySolution.into());
        }
        let last = self.len() - 1;
        Ok(Composition {
            f_wimp: self.f_wimp[last],
            f_axion: self.f_axion[last],
            f_pbh_rem: self.f_pbh_rem[last],
        })
    }
}

/// Final dark matter composition as fractions of the total dark matter
/// energy density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub f_wimp: f64,
    pub f_axion: f64,
    pub f_pbh_rem: f64,
}

impl Composition {
    /// Whether all three fractions are within `tol` of the 62-33-5 target.
    pub fn matches_target(&self, tol: f64) -> bool {
        (self.f_wimp - TARGET_F_WIMP).abs() < tol
            && (self.f_axion - TARGET_F_AXION).abs() < tol
            && (self.f_pbh_rem - TARGET_F_PBH_REMNANT).abs() < tol
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Dark Matter Composition:")?;
        writeln!(f, "  WIMPs:        {:6.1}%", 100.0 * self.f_wimp)?;
        writeln!(f, "  Axions:       {:6.1}%", 100.0 * self.f_axion)?;
        writeln!(f, "  PBH Remnants: {:6.1}%", 100.0 * self.f_pbh_rem)?;
        writeln!(
            f,
            "  Total:        {:6.1}%",
            100.0 * (self.f_wimp + self.f_axion + self.f_pbh_rem)
        )?;
        writeln!(f)?;
        writeln!(f, "Comparison to Target:")?;
        writeln!(f, "  Target: WIMPs 62% | Axions 33% | PBH-rem 5%")?;
        write!(
            f,
            "  Actual: WIMPs {:.0}% | Axions {:.0}% | PBH-rem {:.0}%",
            100.0 * self.f_wimp,
            100.0 * self.f_axion,
            100.0 * self.f_pbh_rem
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};

    fn column(m_pbh: f64, n_wimp_a3: f64, n_axion_a3: f64, ln_rho: f64, ln_a: f64) -> DVector<f64> {
        DVector::from_vec(vec![m_pbh, n_wimp_a3, n_axion_a3, ln_rho, ln_a])
    }

    #[test]
    fn rejects_shape_mismatches() {
        let config = ModelConfig::default();
        let ys = DMatrix::zeros(NSTATES, 3);
        assert!(Trajectory::from_solution(&config, &ys, &[0.0, 0.5]).is_err());
        let ys = DMatrix::zeros(4, 2);
        assert!(Trajectory::from_solution(&config, &ys, &[0.0, 0.5]).is_err());
        let ys = DMatrix::zeros(NSTATES, 0);
        assert!(Trajectory::from_solution(&config, &ys, &[]).is_err());
    }

    #[test]
    fn initial_state_has_no_dark_matter_fractions() {
        let config = ModelConfig::default();
        let y0 = column(1.0e9, 1.0e-15, 1.0e-15, 0.0, 0.0);
        let ys = DMatrix::from_columns(&[y0]);
        let traj = Trajectory::from_solution(&config, &ys, &[0.0]).unwrap();
        // rho_wimp + rho_axion ~ 3.5e-13 > floor, all of it in the wimp
        assert!(traj.f_pbh_rem[0] == 0.0);
        assert!(traj.f_wimp[0] > 0.99);
        assert_eq!(traj.a[0], 1.0);
        assert_eq!(traj.t_rad[0], 1.0e9);
    }

    #[test]
    fn fractions_vanish_below_density_floor() {
        let config = ModelConfig::default();
        let y = column(1.0e9, 1.0e-40, 1.0e-40, 0.0, 0.0);
        let ys = DMatrix::from_columns(&[y]);
        let traj = Trajectory::from_solution(&config, &ys, &[0.0]).unwrap();
        assert_eq!(traj.f_wimp[0], 0.0);
        assert_eq!(traj.f_axion[0], 0.0);
        assert_eq!(traj.f_pbh_rem[0], 0.0);
    }

    #[test]
    fn remnant_counts_once_below_half_initial_mass() {
        let config = ModelConfig::default();
        let m0 = config.pbh.m_initial_grams;
        let above = column(0.6 * m0, 0.0, 0.0, 0.0, 0.0);
        let below = column(0.4 * m0, 0.0, 0.0, 0.0, 0.0);
        let ys = DMatrix::from_columns(&[above, below]);
        let traj = Trajectory::from_solution(&config, &ys, &[0.0, 0.5]).unwrap();
        assert_eq!(traj.f_pbh_rem[0], 0.0);
        assert_eq!(traj.f_pbh_rem[1], 1.0);
    }

    #[test]
    fn fractions_sum_to_one_above_floor() {
        let config = ModelConfig::default();
        let y = column(0.4e9, 1.0e5, 1.0e20, 0.0, 2.0);
        let ys = DMatrix::from_columns(&[y]);
        let traj = Trajectory::from_solution(&config, &ys, &[1.0]).unwrap();
        let sum = traj.f_wimp[0] + traj.f_axion[0] + traj.f_pbh_rem[0];
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn composition_target_check() {
        let on_target = Composition {
            f_wimp: 0.62,
            f_axion: 0.33,
            f_pbh_rem: 0.05,
        };
        assert!(on_target.matches_target(0.05));
        let off_target = Composition {
            f_wimp: 1.0,
            f_axion: 0.0,
            f_pbh_rem: 0.0,
        };
        assert!(!off_target.matches_target(0.05));
    }

    #[test]
    fn composition_summary_text() {
        let c = Composition {
            f_wimp: 0.62,
            f_axion: 0.33,
            f_pbh_rem: 0.05,
        };
        insta::assert_snapshot!(c.to_string(), @r###"
        Final Dark Matter Composition:
          WIMPs:          62.0%
          Axions:         33.0%
          PBH Remnants:    5.0%
          Total:         100.0%

        Comparison to Target:
          Target: WIMPs 62% | Axions 33% | PBH-rem 5%
          Actual: WIMPs 62% | Axions 33% | PBH-rem 5%
        "###);
    }
}
