//! Frame renderer implementation.
//!
//! Turns the snapshot directory of one run into one PNG per time step.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::io::{
    ParameterFileError, PlotError, PlotStyle, SimulationParameters, SnapshotError,
    format_time_title, read_parameter_file, read_snapshot_file, render_snapshot_png,
};
use crate::layout::DataLayout;
use crate::mesh::Discretization;

// =============================================================================
// Errors
// =============================================================================

/// Error type for a render run.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Parameter file could not be read
    #[error("Parameter file: {0}")]
    Parameters(#[from] ParameterFileError),

    /// Snapshot of a step could not be read or fitted to the grid
    #[error("Step {step} ({}): {source}", .path.display())]
    Snapshot {
        step: usize,
        path: PathBuf,
        source: SnapshotError,
    },

    /// Frame of a step could not be drawn
    #[error("Step {step} ({}): {source}", .path.display())]
    Plot {
        step: usize,
        path: PathBuf,
        source: PlotError,
    },

    /// Output directory could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable configuration
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),
}

// =============================================================================
// Render Configuration
// =============================================================================

/// Configuration for a render run.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Render every `stride`-th step.
    pub stride: usize,
    /// Maximum number of frames to render.
    pub max_frames: Option<usize>,
    /// Whether snapshot rows start with a label cell.
    pub label_column: bool,
    /// Frame size and decoration.
    pub style: PlotStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stride: 1,
            max_frames: None,
            label_column: true,
            style: PlotStyle::default(),
        }
    }
}

impl RenderConfig {
    /// Set the step stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Cap the number of frames.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Set whether snapshot rows start with a label cell.
    pub fn with_label_column(mut self, label_column: bool) -> Self {
        self.label_column = label_column;
        self
    }

    /// Set the frame style.
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.stride == 0 {
            return Err(RenderError::InvalidConfig("stride must be at least 1".into()));
        }
        self.style
            .validate()
            .map_err(|e| RenderError::InvalidConfig(e.to_string()))
    }
}

// =============================================================================
// Render Result
// =============================================================================

/// Result of a render run.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Number of frames written.
    pub n_frames: usize,
    /// Step index of the first frame, if any.
    pub first_step: Option<usize>,
    /// Step index of the last frame, if any.
    pub last_step: Option<usize>,
    /// Simulated time of the last frame.
    pub final_time: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
}

// =============================================================================
// Frame Renderer
// =============================================================================

/// Renders the snapshots of one run to PNG frames.
///
/// Step `k` reads `<csv_dir>/time_<k>.csv` and writes
/// `<image_dir>/time_<k>.png`, titled with the simulated time `k * dt`.
pub struct FrameRenderer {
    layout: DataLayout,
    params: SimulationParameters,
    grid: Discretization,
    config: RenderConfig,
}

impl FrameRenderer {
    /// Create a renderer from known parameters.
    pub fn new(layout: DataLayout, params: SimulationParameters) -> Self {
        Self {
            grid: Discretization::from_parameters(&params),
            layout,
            params,
            config: RenderConfig::default(),
        }
    }

    /// Create a renderer from the parameter file of a working directory.
    pub fn from_layout(layout: &DataLayout) -> Result<Self, RenderError> {
        let params = read_parameter_file(&layout.parameter_file())?;
        Ok(Self::new(layout.clone(), params))
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the step stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.config.stride = stride;
        self
    }

    /// Cap the number of frames.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.config.max_frames = Some(max_frames);
        self
    }

    /// Set the frame style.
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.config.style = style;
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

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Step indices that will be rendered, in order.
    pub fn steps(&self) -> Vec<usize> {
        let stride = self.config.stride.max(1);
        let steps = (0..self.grid.n_steps).step_by(stride);
        match self.config.max_frames {
            Some(max) => steps.take(max).collect(),
            None => steps.collect(),
        }
    }

    /// Title of the frame of step `k`, from the simulated time `k * dt`.
    pub fn frame_title(&self, step: usize) -> String {
        format_time_title(self.grid.time_at(step))
    }

    /// Render a single step and return the frame path.
    pub fn render_step(&self, step: usize) -> Result<PathBuf, RenderError> {
        let csv_path = self.layout.snapshot_path(step);
        let snapshot = read_snapshot_file(&csv_path, self.config.label_column)
            .and_then(|mut s| s.align_to(self.grid.n_points()).map(|_| s))
            .map_err(|source| RenderError::Snapshot {
                step,
                path: csv_path.clone(),
                source,
            })?;

        let frame_path = self.layout.frame_path(step);
        let (lo, hi) = snapshot.range();
        debug!(step, min = lo, max = hi, "snapshot read");

        render_snapshot_png(
            &frame_path,
            &self.grid.points,
            &snapshot.values,
            self.params.length,
            &self.frame_title(step),
            &self.config.style,
        )
        .map_err(|source| RenderError::Plot {
            step,
            path: frame_path.clone(),
            source,
        })?;

        debug!(step, path = %frame_path.display(), "frame written");
        Ok(frame_path)
    }

    /// Render every selected step.
    ///
    /// Frames are drawn on the rayon pool with the `parallel` feature.
    pub fn run(&self) -> Result<RenderResult, RenderError> {
        #[cfg(feature = "parallel")]
        {
            self.run_parallel()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.run_with_callback(|_, _, _| {})
        }
    }

    /// Render every selected step, in order, calling `callback` with
    /// (step, time, frame path) after each frame.
    ///
    /// Stops at the first failing step.
    pub fn run_with_callback<F>(&self, mut callback: F) -> Result<RenderResult, RenderError>
    where
        F: FnMut(usize, f64, &Path),
    {
        let start_wall = std::time::Instant::now();
        let steps = self.prepare()?;

        for &step in &steps {
            let path = self.render_step(step)?;
            callback(step, self.grid.time_at(step), &path);
        }

        Ok(self.finish(&steps, start_wall))
    }

    /// Render every selected step concurrently.
    ///
    /// Each frame reads its own snapshot, so frames share nothing mutable.
    /// Every selected step is attempted. If several fail, the error of the
    /// lowest step is returned.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self) -> Result<RenderResult, RenderError> {
        use rayon::prelude::*;

        let start_wall = std::time::Instant::now();
        let steps = self.prepare()?;

        // Indexed collect keeps step order
        let results: Vec<Result<PathBuf, RenderError>> = steps
            .par_iter()
            .map(|&step| self.render_step(step))
            .collect();
        if let Some(err) = results.into_iter().find_map(Result::err) {
            return Err(err);
        }

        Ok(self.finish(&steps, start_wall))
    }

    fn prepare(&self) -> Result<Vec<usize>, RenderError> {
        self.config.validate()?;
        std::fs::create_dir_all(self.layout.image_dir())?;

        let steps = self.steps();
        info!(
            length = self.params.length,
            wavelength = self.params.wavelength,
            wave_speed = self.params.wave_speed,
            cfl = self.params.cfl,
            total_time = self.params.total_time,
            "rendering {} of {} steps to {}",
            steps.len(),
            self.grid.n_steps,
            self.layout.image_dir().display()
        );
        Ok(steps)
    }

    fn finish(&self, steps: &[usize], start_wall: std::time::Instant) -> RenderResult {
        let wall_time = start_wall.elapsed().as_secs_f64();
        let last_step = steps.last().copied();
        let result = RenderResult {
            n_frames: steps.len(),
            first_step: steps.first().copied(),
            last_step,
            final_time: last_step.map_or(0.0, |k| self.grid.time_at(k)),
            wall_time,
        };

        info!(
            frames = result.n_frames,
            wall_time_s = wall_time,
            "render complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{Snapshot, write_parameter_file, write_snapshot_file};

    // dx = 0.25, dt = 0.125, 4 grid points, 4 steps
    fn small_params() -> SimulationParameters {
        SimulationParameters::new(1.0, 25.0, 1.0, 0.5, 0.5)
    }

    fn bare_config() -> RenderConfig {
        RenderConfig::default().with_style(PlotStyle::bare().with_size(160, 125))
    }

    fn write_run(layout: &DataLayout, params: &SimulationParameters, n_steps: usize) {
        std::fs::create_dir_all(layout.csv_dir()).unwrap();
        write_parameter_file(&layout.parameter_file(), params).unwrap();
        for k in 0..n_steps {
            let snap = Snapshot::new(vec![0.0, 0.5, 1.0, 0.5]).with_label(format!("{}", k));
            write_snapshot_file(&layout.snapshot_path(k), &snap).unwrap();
        }
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.stride, 1);
        assert!(config.max_frames.is_none());
        assert!(config.label_column);
    }

    #[test]
    fn test_steps_with_stride_and_cap() {
        let renderer = FrameRenderer::new(DataLayout::new("unused"), small_params());
        assert_eq!(renderer.discretization().n_steps, 4);
        assert_eq!(renderer.steps(), vec![0, 1, 2, 3]);

        let renderer = renderer.with_stride(3);
        assert_eq!(renderer.steps(), vec![0, 3]);

        let renderer = renderer.with_stride(1).with_max_frames(2);
        assert_eq!(renderer.steps(), vec![0, 1]);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let renderer = FrameRenderer::new(layout, small_params())
            .with_config(bare_config())
            .with_stride(0);
        assert!(matches!(
            renderer.run_with_callback(|_, _, _| {}),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_writes_one_frame_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let params = small_params();
        write_run(&layout, &params, 4);

        let renderer = FrameRenderer::from_layout(&layout)
            .unwrap()
            .with_config(bare_config());

        let mut times = Vec::new();
        let result = renderer
            .run_with_callback(|_, t, path| {
                assert!(path.exists());
                times.push(t);
            })
            .unwrap();

        assert_eq!(result.n_frames, 4);
        assert_eq!(result.first_step, Some(0));
        assert_eq!(result.last_step, Some(3));
        assert!((result.final_time - 0.375).abs() < 1e-12);
        assert_eq!(times, vec![0.0, 0.125, 0.25, 0.375]);
        for k in 0..4 {
            assert!(layout.frame_path(k).exists());
        }
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let params = small_params();
        write_run(&layout, &params, 2);

        let renderer = FrameRenderer::new(layout, params).with_config(bare_config());
        let result = renderer.run_with_callback(|_, _, _| {});
        assert!(matches!(
            result,
            Err(RenderError::Snapshot { step: 2, .. })
        ));
    }

    #[test]
    fn test_long_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        std::fs::create_dir_all(layout.csv_dir()).unwrap();
        let snap = Snapshot::new(vec![0.0; 9]).with_label("0");
        write_snapshot_file(&layout.snapshot_path(0), &snap).unwrap();

        let renderer = FrameRenderer::new(layout, small_params()).with_config(bare_config());
        assert!(matches!(
            renderer.render_step(0),
            Err(RenderError::Snapshot {
                source: SnapshotError::LengthMismatch { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_row_without_last_point_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        std::fs::create_dir_all(layout.csv_dir()).unwrap();
        std::fs::create_dir_all(layout.image_dir()).unwrap();
        // Label plus three values on a four-point grid
        std::fs::write(layout.snapshot_path(0), "0.1,0.2,0.3,0.4\n").unwrap();

        let renderer = FrameRenderer::new(layout.clone(), small_params()).with_config(bare_config());
        let path = renderer.render_step(0).unwrap();
        assert_eq!(path, layout.frame_path(0));
    }

    #[test]
    fn test_short_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        std::fs::create_dir_all(layout.csv_dir()).unwrap();
        std::fs::write(layout.snapshot_path(0), "0.0,0.5\n").unwrap();

        let renderer = FrameRenderer::new(layout.clone(), small_params()).with_config(bare_config());
        assert!(matches!(
            renderer.render_step(0),
            Err(RenderError::Snapshot {
                step: 0,
                source: SnapshotError::LengthMismatch {
                    expected: 4,
                    found: 1
                },
                ..
            })
        ));
        assert!(!layout.frame_path(0).exists());
    }

    #[test]
    fn test_frame_title_uses_step_times_dt() {
        let renderer = FrameRenderer::new(DataLayout::new("unused"), small_params());
        assert_eq!(renderer.frame_title(0), "time = 0.0");
        assert_eq!(renderer.frame_title(3), "time = 0.375");

        // dt = 0.1: 3 * dt is not 0.3 in binary
        let params = SimulationParameters::new(1.0, 10.0, 1.0, 1.0, 1.0);
        let renderer = FrameRenderer::new(DataLayout::new("unused"), params);
        let dt = renderer.discretization().dt;
        assert_eq!(renderer.frame_title(3), format_time_title(3.0 * dt));
        assert_eq!(renderer.frame_title(3), "time = 0.30000000000000004");
        assert_eq!(renderer.frame_title(10), "time = 1.0");
    }

    #[test]
    fn test_small_time_step_title_uses_exponent() {
        // dx = dt = 1e-5
        let params = SimulationParameters::new(1.0, 0.001, 1.0, 1.0, 1.0);
        let renderer = FrameRenderer::new(DataLayout::new("unused"), params);
        assert!(renderer.frame_title(1).contains("e-05"));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_run_writes_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let params = small_params();
        write_run(&layout, &params, 4);

        let renderer = FrameRenderer::new(layout.clone(), params).with_config(bare_config());
        let result = renderer.run_parallel().unwrap();

        assert_eq!(result.n_frames, 4);
        assert_eq!(result.last_step, Some(3));
        for k in 0..4 {
            assert!(layout.frame_path(k).exists());
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_run_reports_lowest_failing_step() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        // dt = 0.125 -> 8 steps
        let params = SimulationParameters::new(1.0, 25.0, 1.0, 0.5, 1.0);
        write_run(&layout, &params, 8);
        std::fs::write(layout.snapshot_path(2), "0.25,0.1,bad,0.2\n").unwrap();
        std::fs::write(layout.snapshot_path(5), "0.625,0.1,bad,0.2\n").unwrap();

        let renderer = FrameRenderer::new(layout.clone(), params).with_config(bare_config());
        for _ in 0..5 {
            assert!(matches!(
                renderer.run_parallel(),
                Err(RenderError::Snapshot { step: 2, .. })
            ));
        }
        assert!(layout.frame_path(7).exists());
    }

    #[test]
    fn test_missing_parameter_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        assert!(matches!(
            FrameRenderer::from_layout(&layout),
            Err(RenderError::Parameters(_))
        ));
    }
}
