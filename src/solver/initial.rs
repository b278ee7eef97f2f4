//! Initial conditions for the 1D wave solver.

use crate::io::SimulationParameters;
use crate::mesh::Discretization;

/// Initial amplitude profile u(x, 0).
pub trait InitialCondition {
    /// Amplitude at position `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// Name for logging.
    fn name(&self) -> &'static str;

    /// Sample the profile on every grid point.
    fn sample(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Truncated Gaussian pulse.
///
/// u(x) = exp(-(x - c)² / (2 σ²)) for x in [lower, upper], zero elsewhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianPulse {
    /// Left edge of the support
    pub lower: f64,
    /// Right edge of the support
    pub upper: f64,
    /// Pulse centre c
    pub centre: f64,
    /// Width σ
    pub sigma: f64,
}

impl GaussianPulse {
    /// Create a pulse on `[lower, upper]`, centred in the interval.
    pub fn new(lower: f64, upper: f64, sigma: f64) -> Self {
        Self {
            lower,
            upper,
            centre: 0.5 * (lower + upper),
            sigma,
        }
    }

    /// Standard pulse of a run.
    ///
    /// Support starts at 30 % of the domain and spans half a wavelength;
    /// σ is five grid spacings.
    pub fn for_run(params: &SimulationParameters, grid: &Discretization) -> Self {
        let lower = 0.3 * params.length;
        let upper = lower + 0.5 * params.wavelength;
        Self::new(lower, upper, 5.0 * grid.dx)
    }
}

impl InitialCondition for GaussianPulse {
    fn evaluate(&self, x: f64) -> f64 {
        if x < self.lower || x > self.upper {
            return 0.0;
        }
        let d = x - self.centre;
        (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }

    fn name(&self) -> &'static str {
        "gaussian_pulse"
    }
}
