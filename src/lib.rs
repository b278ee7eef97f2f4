//! # wave-plot
//!
//! Rendering of 1D wave-simulation snapshots into PNG frames.
//!
//! This crate provides the pieces of a small post-processing pipeline:
//! - Simulation parameter files (domain length, wavelength, wave speed, CFL, total time)
//! - The derived discretization (spatial step, time step, step count, grid)
//! - CSV snapshot reading and writing
//! - One-plot-per-step PNG rendering
//! - The explicit finite-difference wave solver that produces the snapshots
//!
//! # Example
//!
//! ```ignore
//! use wave_plot::{DataLayout, FrameRenderer, RenderConfig};
//!
//! let layout = DataLayout::new("./data");
//! let result = FrameRenderer::from_layout(&layout)?
//!     .with_config(RenderConfig::default().with_stride(10))
//!     .run()?;
//! println!("{} frames written", result.n_frames);
//! ```

pub mod io;
pub mod layout;
pub mod mesh;
pub mod render;
pub mod simulation;
pub mod solver;

pub use io::{
    ParameterFileError, PlotError, PlotStyle, SimulationParameters, Snapshot, SnapshotError,
    format_time_title, parse_parameters, parse_snapshot, read_parameter_file, read_snapshot_file,
    render_snapshot_png, write_parameter_file, write_snapshot_file,
};
pub use layout::DataLayout;
pub use mesh::Discretization;
pub use render::{FrameRenderer, RenderConfig, RenderError, RenderResult};
pub use simulation::{SimulationConfig, SimulationError, SimulationResult, WaveSimulation};
pub use solver::{GaussianPulse, WaveSolver1D, WaveState1D};
