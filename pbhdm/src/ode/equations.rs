use nalgebra::DVector;

/// A first-order ODE system `dy/dt = f(y, t)` with initial condition
/// `y(t0) = y0`.
pub trait OdeEquations {
    /// Number of state variables.
    fn nstates(&self) -> usize;

    /// Evaluate the right-hand side into `dy`.
    fn rhs_inplace(&self, y: &DVector<f64>, t: f64, dy: &mut DVector<f64>);

    /// Fill `y` with the initial condition at time `t`.
    fn init_inplace(&self, t: f64, y: &mut DVector<f64>);

    /// Allocating convenience wrapper around [`Self::rhs_inplace`].
    fn rhs(&self, y: &DVector<f64>, t: f64) -> DVector<f64> {
        let mut dy = DVector::zeros(self.nstates());
        self.rhs_inplace(y, t, &mut dy);
        dy
    }

    /// Allocating convenience wrapper around [`Self::init_inplace`].
    fn init(&self, t: f64) -> DVector<f64> {
        let mut y = DVector::zeros(self.nstates());
        self.init_inplace(t, &mut y);
        y
    }
}
