//! The PBH-unified dark matter model: Hawking evaporation with memory
//! burden, greybody particle production, and the coupled Boltzmann
//! right-hand side integrated by the [crate::ode] solver.

pub mod equations;
pub mod hawking;
pub mod species;

pub use equations::{BoltzmannEquations, LN_A, LN_RHO_RAD_A4, M_PBH, NSTATES, N_AXION_A3, N_WIMP_A3};
pub use hawking::{evaporation_rate, hawking_temperature_gev, memory_burden_suppression};
pub use species::Species;
