//! Spatial and temporal discretization.
//!
//! A single uniform grid on `[0, L)` with the matching CFL-limited time step.

mod grid1d;

pub use grid1d::{Discretization, SPATIAL_STEP_FRACTION, arange, step_count};
