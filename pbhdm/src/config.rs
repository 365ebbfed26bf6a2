//! Run configuration.
//!
//! The configuration mirrors the JSON layout used by the reference
//! calculation: a `pbh` block, a `dm` block with the two hardcoded species
//! (WIMP and axion), and a `solver` block. Solver tolerances that the
//! reference passes directly to its integrator (`rtol`, `atol`, `max_step`)
//! have serde defaults so a minimal JSON file still parses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PbhdmError};

/// Primordial black hole population parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PbhConfig {
    /// Initial PBH mass in grams.
    #[serde(rename = "M_initial_grams")]
    pub m_initial_grams: f64,
    /// Initial PBH energy fraction at formation.
    pub beta: f64,
    /// Dimensionless spin parameter (0 = Schwarzschild).
    pub spin_parameter: f64,
    /// Whether the memory-burden suppression of evaporation is active.
    pub memory_burden_enabled: bool,
    /// Mass scale at which the suppression switches on, in grams.
    pub suppression_onset_mass: f64,
}

impl Default for PbhConfig {
    fn default() -> Self {
        Self {
            m_initial_grams: 1.0e9,
            beta: 1.0e-18,
            spin_parameter: 0.0,
            memory_burden_enabled: true,
            suppression_onset_mass: 1.0e7,
        }
    }
}

/// A single dark matter species emitted by Hawking evaporation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    /// Particle mass in GeV.
    pub mass_gev: f64,
    /// Particle spin (0 = scalar, 0.5 = fermion).
    pub spin: f64,
    /// Internal degrees of freedom.
    pub dof: u32,
    /// Thermally averaged annihilation cross section in cm^3/s.
    pub annihilation_xsec_cm3_s: f64,
    /// Greybody emission efficiency relative to a scalar.
    pub relative_greybody_efficiency: f64,
}

impl SpeciesConfig {
    /// The 350 GeV WIMP of the reference calculation.
    pub fn wimp() -> Self {
        Self {
            name: "WIMP".to_string(),
            mass_gev: 350.0,
            spin: 0.5,
            dof: 2,
            annihilation_xsec_cm3_s: 3.0e-26,
            relative_greybody_efficiency: 1.73,
        }
    }

    /// The micro-eV axion of the reference calculation.
    pub fn axion() -> Self {
        Self {
            name: "Axion".to_string(),
            mass_gev: 1.0e-15,
            spin: 0.0,
            dof: 1,
            annihilation_xsec_cm3_s: 0.0,
            relative_greybody_efficiency: 1.0,
        }
    }
}

/// The two hardcoded dark matter species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmConfig {
    pub wimp: SpeciesConfig,
    pub axion: SpeciesConfig,
}

impl Default for DmConfig {
    fn default() -> Self {
        Self {
            wimp: SpeciesConfig::wimp(),
            axion: SpeciesConfig::axion(),
        }
    }
}

/// Which embedded Runge-Kutta pair advances the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RkMethod {
    /// Tsitouras 4(5) with a continuous extension for dense output.
    Tsit45,
    /// Dormand-Prince 4(5), the pair behind scipy's RK45.
    Dopri45,
}

fn default_rtol() -> f64 {
    1.0e-6
}

fn default_atol() -> f64 {
    1.0e-10
}

fn default_max_step() -> f64 {
    1.0e-3
}

fn default_method() -> RkMethod {
    RkMethod::Tsit45
}

/// Integration window and solver tolerances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Radiation temperature at the start of the run, in GeV.
    #[serde(rename = "T_initial_gev")]
    pub t_initial_gev: f64,
    /// Radiation temperature at the end of the run, in GeV.
    #[serde(rename = "T_final_gev")]
    pub t_final_gev: f64,
    /// Number of evaluation points on the normalised time interval.
    pub n_steps: usize,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    /// Cap on the internal step on the normalised time interval.
    #[serde(default = "default_max_step")]
    pub max_step: f64,
    #[serde(default = "default_method")]
    pub method: RkMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            t_initial_gev: 1.0e9,
            t_final_gev: 0.1,
            n_steps: 1000,
            rtol: default_rtol(),
            atol: default_atol(),
            max_step: default_max_step(),
            method: default_method(),
        }
    }
}

/// Full configuration for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub pbh: PbhConfig,
    pub dm: DmConfig,
    pub solver: SolverConfig,
}

impl ModelConfig {
    pub fn from_json_str(s: &str) -> Result<Self, PbhdmError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PbhdmError> {
        let s = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_json_str(&s)
    }

    pub fn to_json_pretty(&self) -> Result<String, PbhdmError> {
        Ok(serde_json::to_string_pretty(self).map_err(ConfigError::from)?)
    }

    pub fn validate(&self) -> Result<(), PbhdmError> {
        let positive = [
            ("pbh.M_initial_grams", self.pbh.m_initial_grams),
            ("pbh.beta", self.pbh.beta),
            ("pbh.suppression_onset_mass", self.pbh.suppression_onset_mass),
            ("dm.wimp.mass_gev", self.dm.wimp.mass_gev),
            ("dm.axion.mass_gev", self.dm.axion.mass_gev),
            ("solver.T_initial_gev", self.solver.t_initial_gev),
            ("solver.T_final_gev", self.solver.t_final_gev),
            ("solver.rtol", self.solver.rtol),
            ("solver.atol", self.solver.atol),
            ("solver.max_step", self.solver.max_step),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value }.into());
            }
        }
        let non_negative = [
            (
                "dm.wimp.annihilation_xsec_cm3_s",
                self.dm.wimp.annihilation_xsec_cm3_s,
            ),
            (
                "dm.axion.annihilation_xsec_cm3_s",
                self.dm.axion.annihilation_xsec_cm3_s,
            ),
            ("pbh.spin_parameter", self.pbh.spin_parameter),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value }.into());
            }
        }
        if self.solver.n_steps < 2 {
            return Err(ConfigError::TooFewSteps(self.solver.n_steps).into());
        }
        if self.solver.t_final_gev >= self.solver.t_initial_gev {
            return Err(ConfigError::NonCoolingTemperatureRange.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ModelConfig::default().validate().unwrap();
    }

    #[test]
    fn default_config_matches_reference_values() {
        let config = ModelConfig::default();
        assert_eq!(config.pbh.m_initial_grams, 1.0e9);
        assert_eq!(config.pbh.beta, 1.0e-18);
        assert_eq!(config.dm.wimp.mass_gev, 350.0);
        assert_eq!(config.dm.wimp.dof, 2);
        assert_eq!(config.dm.axion.annihilation_xsec_cm3_s, 0.0);
        assert_eq!(config.solver.n_steps, 1000);
        assert_eq!(config.solver.rtol, 1.0e-6);
        assert_eq!(config.solver.atol, 1.0e-10);
    }

    #[test]
    fn json_round_trip_preserves_field_names() {
        let config = ModelConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"M_initial_grams\""));
        assert!(json.contains("\"T_initial_gev\""));
        let back = ModelConfig::from_json_str(&json).unwrap();
        assert_eq!(back.pbh.m_initial_grams, config.pbh.m_initial_grams);
        assert_eq!(back.solver.method, config.solver.method);
    }

    #[test]
    fn minimal_json_uses_tolerance_defaults() {
        let json = r#"{
            "pbh": {
                "M_initial_grams": 1.0e9,
                "beta": 1.0e-18,
                "spin_parameter": 0.0,
                "memory_burden_enabled": true,
                "suppression_onset_mass": 1.0e7
            },
            "dm": {
                "wimp": {
                    "name": "WIMP",
                    "mass_gev": 350.0,
                    "spin": 0.5,
                    "dof": 2,
                    "annihilation_xsec_cm3_s": 3.0e-26,
                    "relative_greybody_efficiency": 1.73
                },
                "axion": {
                    "name": "Axion",
                    "mass_gev": 1.0e-15,
                    "spin": 0.0,
                    "dof": 1,
                    "annihilation_xsec_cm3_s": 0.0,
                    "relative_greybody_efficiency": 1.0
                }
            },
            "solver": {
                "T_initial_gev": 1.0e9,
                "T_final_gev": 0.1,
                "n_steps": 1000
            }
        }"#;
        let config = ModelConfig::from_json_str(json).unwrap();
        assert_eq!(config.solver.rtol, 1.0e-6);
        assert_eq!(config.solver.max_step, 1.0e-3);
        assert_eq!(config.solver.method, RkMethod::Tsit45);
    }

    #[test]
    fn rejects_non_positive_mass() {
        let mut config = ModelConfig::default();
        config.pbh.m_initial_grams = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_heating_temperature_range() {
        let mut config = ModelConfig::default();
        config.solver.t_final_gev = config.solver.t_initial_gev;
        assert!(config.validate().is_err());
    }
}
