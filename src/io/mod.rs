//! I/O utilities for reading and writing data files.
//!
//! This module provides:
//! - **Simulation parameters**: The five-line `<name> <value>` parameter file
//! - **Snapshots**: One CSV row of wave amplitudes per time step
//! - **Frame rendering**: PNG plot of a snapshot against the grid
//!
//! # File Formats
//!
//! ## Parameter Files
//!
//! ```text
//! length 10.0
//! wavelength 2.0
//! wave_speed 1.0
//! cfl 0.5
//! total_time 4.0
//! ```
//!
//! ## Snapshot Files
//!
//! ```text
//! 0.05,0.0,0.0,0.0012,0.0345,0.2881
//! ```
//!
//! The first cell is a label and is skipped by default.

mod params_reader;
mod plot;
mod snapshot;

pub use params_reader::{
    N_PARAMETER_LINES, PARAMETER_NAMES, ParameterFileError, SimulationParameters,
    parse_parameters, read_parameter_file, write_parameter_file,
};
pub use plot::{
    PlotError, PlotStyle, dash_segments, finite_runs, format_time_title, render_snapshot_png,
};
pub use snapshot::{
    Snapshot, SnapshotError, parse_snapshot, parse_snapshot_row, read_snapshot_file,
    write_snapshot_file,
};
