//! Finite-difference wave solver.
//!
//! - Leapfrog time stepping of u_tt = c² u_xx with periodic boundaries
//! - Initial amplitude profiles

mod initial;
mod wave_1d;

pub use initial::{GaussianPulse, InitialCondition};
pub use wave_1d::{MIN_POINTS, WaveSolver1D, WaveState1D, leapfrog_periodic};
