//! Physical constants in natural units (GeV unless stated otherwise).

/// Planck mass in GeV.
pub const M_PL: f64 = 1.22e19;

/// Gravitational constant in natural units, 1 / M_pl^2.
pub const G_NATURAL: f64 = 1.0 / (M_PL * M_PL);

/// Hawking evaporation coefficient, grams^3 / s.
pub const GAMMA0_GRAMS3_PER_SEC: f64 = 5.3e-27;

/// Hawking temperature coefficient: T_H = 1.23 / M[g] GeV.
///
/// From T_H = 1.06e13 K / M[g] x 1.16e-13 GeV/K.
pub const HAWKING_TEMP_GEV_GRAMS: f64 = 1.23;

/// hbar * c in GeV fm.
pub const HBAR_C_GEV_FM: f64 = 0.1973;

/// Density floor below which dark-matter fractions are reported as zero.
pub const RHO_DM_FLOOR: f64 = 1.0e-30;
