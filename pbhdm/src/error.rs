use thiserror::Error;

/// Custom error type for pbhdm
///
/// This error type is used to wrap all possible errors that can occur when using pbhdm
#[derive(Error, Debug)]
pub enum PbhdmError {
    #[error("ODE solver error: {0}")]
    OdeSolverError(#[from] OdeSolverError),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Post-processing error: {0}")]
    PostProcessError(#[from] PostProcessError),
    #[error("Error: {0}")]
    Other(String),
}

/// Possible errors that can occur when solving an ODE
#[derive(Debug, Error)]
pub enum OdeSolverError {
    #[error(
        "Stop time = {} is less than current state time = {}",
        stop_time,
        state_time
    )]
    StopTimeBeforeCurrentTime { stop_time: f64, state_time: f64 },
    #[error("Stop time is at the current state time")]
    StopTimeAtCurrentTime,
    #[error("Interpolation vector is not the correct length, expected {expected}, got {found}")]
    InterpolationVectorWrongSize { expected: usize, found: usize },
    #[error("Interpolation time is not within the current step")]
    InterpolationTimeOutsideCurrentStep,
    #[error("Exceeded maximum number of error test failures at time = {time}")]
    TooManyErrorTestFailures { time: f64 },
    #[error("Step size is too small at time = {time}")]
    StepSizeTooSmall { time: f64 },
    #[error("t_eval must be increasing and all values must be greater than or equal to the current time")]
    InvalidTEval,
    #[error("State is not consistent with the problem equations")]
    StateProblemMismatch,
    #[error("Invalid Tableau: {0}")]
    InvalidTableau(String),
    #[error("Error: {0}")]
    Other(String),
}

/// Possible errors produced when validating a model configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("solver.n_steps must be at least 2, got {0}")]
    TooFewSteps(usize),
    #[error("solver.t_final_gev must be below solver.t_initial_gev")]
    NonCoolingTemperatureRange,
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Possible errors produced when deriving observables from a solution
#[derive(Debug, Error)]
pub enum PostProcessError {
    #[error("solution has {ncols} columns but {ntimes} times")]
    SolutionShapeMismatch { ncols: usize, ntimes: usize },
    #[error("solution rows = {0}, expected the 5 Boltzmann state variables")]
    WrongStateCount(usize),
    #[error("empty solution, nothing to post-process")]
    EmptySolution,
}

#[macro_export]
macro_rules! ode_solver_error {
    ($variant:ident) => {
        $crate::error::PbhdmError::from($crate::error::OdeSolverError::$variant)
    };
    ($variant:ident, $($arg:tt)*) => {
        $crate::error::PbhdmError::from($crate::error::OdeSolverError::$variant($($arg)*.to_string()))
    };
}

#[macro_export]
macro_rules! config_error {
    ($variant:ident) => {
        $crate::error::PbhdmError::from($crate::error::ConfigError::$variant)
    };
    ($variant:ident, $($arg:tt)*) => {
        $crate::error::PbhdmError::from($crate::error::ConfigError::$variant($($arg)*))
    };
}

#[macro_export]
macro_rules! other_error {
    ($msg:expr) => {
        $crate::error::PbhdmError::Other($msg.to_string())
    };
}
