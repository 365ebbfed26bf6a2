//! # pbhdm
//!
//! pbhdm solves the PBH-unified dark matter model: a population of light
//! primordial black holes evaporates through Hawking radiation, sourcing
//! a heavy WIMP, a light axion and a population of memory-burden
//! stabilised remnants, while the surrounding radiation bath expands and
//! cools. The model is a system of five coupled Boltzmann-Friedmann
//! equations integrated with adaptive explicit Runge-Kutta methods.
//!
//! ## Running the model
//!
//! A run is described by a [ModelConfig], which mirrors the JSON layout of
//! the reference calculation and can be loaded with
//! [ModelConfig::from_json_file] or built from [ModelConfig::default].
//! The [simulation::run] function integrates the model and returns a
//! [simulation::SimulationResult] holding the [postprocess::Trajectory] of
//! derived quantities, the final dark matter [postprocess::Composition]
//! and the solver statistics:
//!
//! ```
//! use pbhdm::{simulation, ModelConfig};
//!
//! let config = ModelConfig::default();
//! let result = simulation::run(&config).unwrap();
//! if let Some(composition) = result.composition {
//!     println!("{composition}");
//! }
//! ```
//!
//! ## The solver
//!
//! The integrator lives in the [ode] module and is independent of the
//! physics. An [OdeSolverProblem] pairs a set of [OdeEquations] with
//! tolerances, and the [OdeSolverProblem::tsit45] and
//! [OdeSolverProblem::dopri45] methods create an [ode::ExplicitRk] solver
//! driven through the [OdeSolverMethod] trait. Possible workflows are:
//! - Use the [OdeSolverMethod::step] method to step the solution forward in time with an internal time step chosen by the solver to meet the error tolerances.
//! - Use the [OdeSolverMethod::interpolate] method to interpolate the solution between the last two time steps.
//! - Use the [OdeSolverMethod::set_stop_time] method to stop the solver at a specific time (i.e. this will override the internal time step so that the solver stops at the specified time).
//! - Alternatively, use the convenience functions [OdeSolverMethod::solve] or [OdeSolverMethod::solve_dense] that will both initialise the problem and solve the problem up to a specific time or a sequence of times.
//!
//! ## The physics
//!
//! The [model] module holds the physics: Hawking temperature
//! and evaporation rate with the memory-burden suppression
//! ([model::hawking]), greybody production and annihilation of the dark
//! matter species ([model::species]) and the assembled
//! [model::BoltzmannEquations]. [constants] collects the physical
//! constants in natural units.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod ode;
pub mod postprocess;
pub mod simulation;

pub use config::{ModelConfig, PbhConfig, RkMethod, SolverConfig, SpeciesConfig};
pub use error::PbhdmError;
pub use model::BoltzmannEquations;
pub use ode::{
    ExplicitRk, OdeEquations, OdeSolverMethod, OdeSolverProblem, OdeSolverStopReason, RkConfig,
    RkState, RkStatistics, Tableau,
};
pub use postprocess::{Composition, Trajectory};
pub use simulation::{run, SimulationResult, SolverStatus};
