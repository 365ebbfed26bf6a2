//! Dark matter species and their source and sink terms.

use crate::config::SpeciesConfig;

/// A dark matter species sourced by Hawking radiation.
#[derive(Debug, Clone)]
pub struct Species {
    pub name: String,
    pub mass_gev: f64,
    pub dof: f64,
    pub annihilation_xsec_cm3_s: f64,
    pub greybody_efficiency: f64,
}

impl Species {
    pub fn from_config(config: &SpeciesConfig) -> Self {
        Self {
            name: config.name.clone(),
            mass_gev: config.mass_gev,
            dof: f64::from(config.dof),
            annihilation_xsec_cm3_s: config.annihilation_xsec_cm3_s,
            greybody_efficiency: config.relative_greybody_efficiency,
        }
    }

    /// Production rate from Hawking radiation.
    ///
    /// The energy flux |dM/dt| divided by T_H^3 gives a particle flux,
    /// weighted by the greybody efficiency and degrees of freedom, and
    /// Boltzmann-suppressed once the particle mass exceeds the Hawking
    /// temperature.
    pub fn production_rate(&self, dm_dt: f64, t_hawking: f64, beta: f64) -> f64 {
        let mut rate = dm_dt.abs() / (t_hawking * t_hawking * t_hawking)
            * self.greybody_efficiency
            * self.dof
            * beta
            * 1.0e10;
        if self.mass_gev > t_hawking {
            rate *= (-self.mass_gev / t_hawking).exp();
        }
        rate
    }

    /// Loss rate <sigma v> n^2 for a self-annihilating species.
    pub fn annihilation_rate(&self, n: f64) -> f64 {
        self.annihilation_xsec_cm3_s * n * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeciesConfig;
    use crate::model::hawking::hawking_temperature_gev;

    #[test]
    fn light_species_is_not_boltzmann_suppressed() {
        let axion = Species::from_config(&SpeciesConfig::axion());
        let t_h = hawking_temperature_gev(1.0e9);
        assert!(axion.mass_gev < t_h);
        let rate = axion.production_rate(-1.0e-45, t_h, 1.0e-18);
        assert!(rate > 0.0);
    }

    #[test]
    fn heavy_species_is_boltzmann_suppressed() {
        let wimp = Species::from_config(&SpeciesConfig::wimp());
        let t_h = hawking_temperature_gev(1.0e9);
        assert!(wimp.mass_gev > t_h);
        let suppressed = wimp.production_rate(-1.0e-45, t_h, 1.0e-18);
        // exp(-m/T_H) with m/T_H ~ 3e11 underflows to zero
        assert_eq!(suppressed, 0.0);

        // a hot enough black hole emits the WIMP unsuppressed
        let t_hot = hawking_temperature_gev(1.0e-3);
        let unsuppressed = wimp.production_rate(-1.0e-45, t_hot, 1.0e-18);
        assert!(unsuppressed > 0.0);
    }

    #[test]
    fn production_rate_scales_with_dof_and_efficiency() {
        let axion = Species::from_config(&SpeciesConfig::axion());
        let mut doubled = axion.clone();
        doubled.dof = 2.0;
        let t_h = 1.0;
        let base = axion.production_rate(-1.0, t_h, 1.0e-18);
        assert!((doubled.production_rate(-1.0, t_h, 1.0e-18) - 2.0 * base).abs() < 1e-12 * base);
    }

    #[test]
    fn axion_does_not_annihilate() {
        let axion = Species::from_config(&SpeciesConfig::axion());
        assert_eq!(axion.annihilation_rate(1.0e10), 0.0);
    }

    #[test]
    fn wimp_annihilation_is_quadratic_in_density() {
        let wimp = Species::from_config(&SpeciesConfig::wimp());
        let r1 = wimp.annihilation_rate(1.0);
        let r2 = wimp.annihilation_rate(2.0);
        assert!((r2 - 4.0 * r1).abs() < 1e-12 * r2.abs().max(1e-30));
    }
}
