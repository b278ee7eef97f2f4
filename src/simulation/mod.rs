//! Wave simulation runner.
//!
//! Produces the snapshot directory consumed by [`crate::render`]:
//! - Reads the parameter file and derives the discretization
//! - Samples the initial condition and steps the leapfrog solver
//! - Writes one CSV row per step, labelled with its time
//!
//! # Example
//! ```ignore
//! use wave_plot::layout::DataLayout;
//! use wave_plot::simulation::WaveSimulation;
//!
//! let layout = DataLayout::new("./data");
//! let result = WaveSimulation::from_layout(&layout)?.run()?;
//! println!("{} snapshots, max |u| = {:.3}", result.n_steps, result.max_amplitude);
//! ```

mod runner;

pub use runner::{SimulationConfig, SimulationError, SimulationResult, WaveSimulation};
