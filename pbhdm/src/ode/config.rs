/// Runtime configuration for the adaptive step size controller.
#[derive(Debug, Clone)]
pub struct RkConfig {
    pub minimum_timestep: f64,
    pub maximum_error_test_failures: usize,
    pub maximum_timestep_growth: f64,
    pub minimum_timestep_shrink: f64,
    /// Cap on the absolute step size, no cap when `None`.
    pub maximum_timestep: Option<f64>,
}

impl Default for RkConfig {
    fn default() -> Self {
        Self {
            minimum_timestep: 1e-13,
            maximum_error_test_failures: 40,
            maximum_timestep_growth: 10.0,
            minimum_timestep_shrink: 0.2,
            maximum_timestep: None,
        }
    }
}
