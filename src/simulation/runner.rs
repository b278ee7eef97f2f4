//! Wave simulation runner implementation.
//!
//! Runs the leapfrog solver over the step count of a parameter set and
//! writes one snapshot per step.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::io::{
    ParameterFileError, SimulationParameters, Snapshot, SnapshotError, read_parameter_file,
    write_snapshot_file,
};
use crate::layout::DataLayout;
use crate::mesh::Discretization;
use crate::solver::{GaussianPulse, InitialCondition, MIN_POINTS, WaveSolver1D};

// =============================================================================
// Errors
// =============================================================================

/// Error type for a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Parameter file could not be read or is out of range
    #[error("Parameter file: {0}")]
    Parameters(#[from] ParameterFileError),

    /// Snapshot could not be written
    #[error("Snapshot output: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Output directory could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Grid too small for the stencil
    #[error("Grid has {n_points} points, need at least 3")]
    GridTooSmall { n_points: usize },
}

// =============================================================================
// Simulation Configuration
// =============================================================================

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Write the step time as the first cell of each snapshot row.
    pub label_column: bool,
    /// Also write the initial condition file.
    pub write_initial_conditions: bool,
    /// Maximum number of time steps.
    pub max_steps: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            label_column: true,
            write_initial_conditions: true,
            max_steps: None,
        }
    }
}

impl SimulationConfig {
    /// Set whether rows carry a time label.
    pub fn with_label_column(mut self, label_column: bool) -> Self {
        self.label_column = label_column;
        self
    }

    /// Cap the number of steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

// =============================================================================
// Simulation Result
// =============================================================================

/// Result of a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    /// Number of snapshots written.
    pub n_steps: usize,
    /// Simulated time of the last snapshot.
    pub final_time: f64,
    /// Largest |u| over all snapshots.
    pub max_amplitude: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// Runs the periodic 1D wave solver and writes its snapshots.
///
/// Step `k` writes `<csv_dir>/time_<k>.csv` holding the solution at time
/// `k * dt`; step 0 is the initial condition.
pub struct WaveSimulation {
    layout: DataLayout,
    params: SimulationParameters,
    grid: Discretization,
    config: SimulationConfig,
}

impl WaveSimulation {
    /// Create a simulation from known parameters.
    pub fn new(layout: DataLayout, params: SimulationParameters) -> Self {
        Self {
            grid: Discretization::from_parameters(&params),
            layout,
            params,
            config: SimulationConfig::default(),
        }
    }

    /// Create a simulation from the parameter file of a working directory.
    pub fn from_layout(layout: &DataLayout) -> Result<Self, SimulationError> {
        let params = read_parameter_file(&layout.parameter_file())?;
        Ok(Self::new(layout.clone(), params))
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Parameters of the run.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// Discretization derived from the parameters.
    pub fn discretization(&self) -> &Discretization {
        &self.grid
    }

    fn write_row(&self, path: &Path, values: &[f64], time: f64) -> Result<(), SimulationError> {
        let mut snapshot = Snapshot::new(values.to_vec());
        if self.config.label_column {
            snapshot = snapshot.with_label(time.to_string());
        }
        write_snapshot_file(path, &snapshot)?;
        Ok(())
    }

    /// Run with the standard Gaussian pulse.
    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        let pulse = GaussianPulse::for_run(&self.params, &self.grid);
        self.run_with(&pulse, |_, _| {})
    }

    /// Run from `initial`, calling `callback` with (step, time) after each
    /// snapshot is written.
    pub fn run_with<IC, F>(
        &self,
        initial: &IC,
        mut callback: F,
    ) -> Result<SimulationResult, SimulationError>
    where
        IC: InitialCondition,
        F: FnMut(usize, f64),
    {
        let start_wall = std::time::Instant::now();

        let n_points = self.grid.n_points();
        if n_points < MIN_POINTS {
            return Err(SimulationError::GridTooSmall { n_points });
        }

        std::fs::create_dir_all(self.layout.csv_dir())?;

        info!(
            length = self.params.length,
            wavelength = self.params.wavelength,
            wave_speed = self.params.wave_speed,
            cfl = self.params.cfl,
            total_time = self.params.total_time,
            "starting {} simulation",
            initial.name()
        );
        info!(
            dx = self.grid.dx,
            dt = self.grid.dt,
            n_points,
            n_steps = self.grid.n_steps,
            "discretization"
        );

        let u0 = initial.sample(&self.grid.points);
        if self.config.write_initial_conditions {
            self.write_row(&self.layout.initial_conditions_file(), &u0, 0.0)?;
        }

        let n_steps = match self.config.max_steps {
            Some(max) => self.grid.n_steps.min(max),
            None => self.grid.n_steps,
        };

        let mut solver = WaveSolver1D::new(u0, self.params.cfl);
        let mut max_amplitude: f64 = 0.0;

        for k in 0..n_steps {
            let t = self.grid.time_at(k);
            let u = solver.step();
            max_amplitude = u.iter().fold(max_amplitude, |m, &v| m.max(v.abs()));

            self.write_row(&self.layout.snapshot_path(k), u, t)?;
            debug!(step = k, time = t, "snapshot written");
            callback(k, t);

            if n_steps >= 10 && (k + 1) % (n_steps / 10) == 0 {
                info!("step {} / {}: t = {:.4}", k + 1, n_steps, t);
            }
        }

        let wall_time = start_wall.elapsed().as_secs_f64();
        let final_time = if n_steps > 0 {
            self.grid.time_at(n_steps - 1)
        } else {
            0.0
        };

        info!(
            steps = n_steps,
            max_amplitude,
            wall_time_s = wall_time,
            "simulation complete"
        );

        Ok(SimulationResult {
            n_steps,
            final_time,
            max_amplitude,
            wall_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{read_snapshot_file, write_parameter_file};

    // dx = 0.02, dt = 0.01, 50 points, 10 steps
    fn small_params() -> SimulationParameters {
        SimulationParameters::new(1.0, 2.0, 1.0, 0.5, 0.1)
    }

    #[test]
    fn test_simulation_config_default() {
        let config = SimulationConfig::default();
        assert!(config.label_column);
        assert!(config.write_initial_conditions);
        assert!(config.max_steps.is_none());
    }

    #[test]
    fn test_run_writes_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let sim = WaveSimulation::new(layout.clone(), small_params());
        let n_steps = sim.discretization().n_steps;
        assert!(n_steps >= 9);

        let mut seen = Vec::new();
        let pulse = GaussianPulse::for_run(sim.parameters(), sim.discretization());
        let result = sim.run_with(&pulse, |k, _| seen.push(k)).unwrap();

        assert_eq!(result.n_steps, n_steps);
        assert_eq!(seen, (0..n_steps).collect::<Vec<_>>());
        assert!(layout.initial_conditions_file().exists());
        for k in 0..n_steps {
            assert!(layout.snapshot_path(k).exists());
        }
        assert!(result.max_amplitude > 0.5);
    }

    #[test]
    fn test_step_zero_is_initial_condition() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let sim = WaveSimulation::new(layout.clone(), small_params());
        sim.run().unwrap();

        let initial = read_snapshot_file(&layout.initial_conditions_file(), true).unwrap();
        let first = read_snapshot_file(&layout.snapshot_path(0), true).unwrap();
        assert_eq!(initial.values, first.values);
        assert_eq!(first.values.len(), sim.discretization().n_points());
        assert_eq!(first.label.as_deref(), Some("0"));
    }

    #[test]
    fn test_max_steps() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let sim = WaveSimulation::new(layout.clone(), small_params())
            .with_config(SimulationConfig::default().with_max_steps(3));

        let result = sim.run().unwrap();
        assert_eq!(result.n_steps, 3);
        assert!(layout.snapshot_path(2).exists());
        assert!(!layout.snapshot_path(3).exists());
    }

    #[test]
    fn test_unlabelled_rows() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let sim = WaveSimulation::new(layout.clone(), small_params()).with_config(
            SimulationConfig::default()
                .with_label_column(false)
                .with_max_steps(1),
        );
        sim.run().unwrap();

        let row = read_snapshot_file(&layout.snapshot_path(0), false).unwrap();
        assert_eq!(row.values.len(), sim.discretization().n_points());
    }

    #[test]
    fn test_grid_too_small() {
        let dir = tempfile::tempdir().unwrap();
        // dx = 0.5 on L = 1: two points
        let params = SimulationParameters::new(1.0, 50.0, 1.0, 0.5, 1.0);
        let sim = WaveSimulation::new(DataLayout::new(dir.path()), params);
        assert!(matches!(
            sim.run(),
            Err(SimulationError::GridTooSmall { n_points: 2 })
        ));
    }

    #[test]
    fn test_from_layout() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        write_parameter_file(&layout.parameter_file(), &small_params()).unwrap();

        let sim = WaveSimulation::from_layout(&layout).unwrap();
        assert_eq!(*sim.parameters(), small_params());
    }
}
