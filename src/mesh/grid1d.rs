//! Uniform 1D finite-difference discretization.
//!
//! Derived once from the simulation parameters:
//! - spatial step `dx = 0.01 * wavelength`
//! - time step `dt = cfl * dx / wave_speed`
//! - step count `floor(total_time / dt)`
//! - sample points `x_i = i * dx` on the half-open domain `[0, L)`

use crate::io::SimulationParameters;

/// Spatial step as a fraction of the wavelength (100 points per wavelength).
///
/// Applied as a product, `wavelength * 0.01`. Dividing by 100 rounds
/// differently and shifts step and point counts.
pub const SPATIAL_STEP_FRACTION: f64 = 0.01;

/// Space and time discretization of a 1D wave run.
#[derive(Clone, Debug)]
pub struct Discretization {
    /// Domain length L
    pub length: f64,
    /// Spatial step
    pub dx: f64,
    /// Time step
    pub dt: f64,
    /// Number of time steps
    pub n_steps: usize,
    /// Sample points, `points[i] = i * dx`
    pub points: Vec<f64>,
}

impl Discretization {
    /// Derive the discretization from validated parameters.
    pub fn from_parameters(params: &SimulationParameters) -> Self {
        let dx = params.wavelength * SPATIAL_STEP_FRACTION;
        let dt = params.cfl * dx / params.wave_speed;
        let n_steps = step_count(params.total_time, dt);
        let points = arange(0.0, params.length, dx);

        Self {
            length: params.length,
            dx,
            dt,
            n_steps,
            points,
        }
    }

    /// Number of sample points.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Simulated time of step `k`.
    pub fn time_at(&self, k: usize) -> f64 {
        k as f64 * self.dt
    }

    /// Time reached after the last step.
    pub fn final_time(&self) -> f64 {
        self.time_at(self.n_steps)
    }
}

/// Whole steps of size `dt` in `total_time`, truncated.
pub fn step_count(total_time: f64, dt: f64) -> usize {
    if !(dt > 0.0) || !total_time.is_finite() || total_time <= 0.0 {
        return 0;
    }
    (total_time / dt).floor() as usize
}

/// Evenly spaced values in `[start, stop)`.
///
/// Point count is `ceil((stop - start) / step)`, so the last point may sit
/// closer than `step` to `stop` but never on it.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(stop > start) {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}
