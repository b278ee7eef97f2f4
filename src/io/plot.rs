//! PNG rendering of a single snapshot.
//!
//! Each frame shows the wave amplitude against the grid as a black line,
//! dashed red markers at both periodic boundaries, a legend at the top
//! centre and the simulated time as title. The y-axis is fixed so frames
//! line up when stitched into a movie.
//!
//! # Example
//!
//! ```ignore
//! use wave_plot::io::{format_time_title, render_snapshot_png, PlotStyle};
//!
//! render_snapshot_png(
//!     Path::new("Images/time_0.png"),
//!     &grid,
//!     &snapshot.values,
//!     params.length,
//!     &format_time_title(0.0),
//!     &PlotStyle::default(),
//! )?;
//! ```

use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

/// Error type for frame rendering.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Drawing or encoding failed in the plotting backend
    #[error("Plot backend error: {0}")]
    Backend(String),

    /// Grid and values differ in length
    #[error("Grid has {grid} points but {values} values were given")]
    LengthMismatch { grid: usize, values: usize },

    /// Image size or axis range cannot be drawn
    #[error("Invalid plot style: {0}")]
    InvalidStyle(String),
}

fn backend_error<E: Display>(e: E) -> PlotError {
    PlotError::Backend(e.to_string())
}

/// Styling of a rendered frame.
#[derive(Clone, Debug)]
pub struct PlotStyle {
    /// Image width in pixels (default: 1920, a 6.4 in figure at 300 dpi)
    pub width: u32,
    /// Image height in pixels (default: 1500, 5 in at 300 dpi)
    pub height: u32,
    /// Fixed y-axis range (default: [-1, 2])
    pub y_range: (f64, f64),
    /// Fraction of the domain length added on each side of the x-axis
    pub x_margin: f64,
    /// Wave line width in pixels
    pub line_width: u32,
    /// Boundary marker line width in pixels
    pub boundary_width: u32,
    /// Number of dashes along a boundary marker
    pub boundary_dashes: usize,
    /// Legend label of the wave line
    pub wave_label: String,
    /// Legend label of the boundary markers
    pub boundary_label: String,
    /// Draw title, axes and legend. Frames without text need no system fonts.
    pub annotate: bool,
    /// Font size of the title in pixels
    pub title_font_size: u32,
    /// Font size of tick labels and legend in pixels
    pub label_font_size: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1500,
            y_range: (-1.0, 2.0),
            x_margin: 0.05,
            line_width: 6,
            boundary_width: 4,
            boundary_dashes: 24,
            wave_label: "Wave".to_string(),
            boundary_label: "Periodic boundary".to_string(),
            annotate: true,
            title_font_size: 60,
            label_font_size: 40,
        }
    }
}

impl PlotStyle {
    /// Plain frames: curve and boundary markers only.
    pub fn bare() -> Self {
        Self {
            annotate: false,
            ..Self::default()
        }
    }

    /// Set the image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the fixed y-axis range.
    pub fn with_y_range(mut self, y_min: f64, y_max: f64) -> Self {
        self.y_range = (y_min, y_max);
        self
    }

    /// Check that the style can be drawn.
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::InvalidStyle(format!(
                "image size {}x{}",
                self.width, self.height
            )));
        }
        let (y_min, y_max) = self.y_range;
        if !(y_min.is_finite() && y_max.is_finite() && y_max > y_min) {
            return Err(PlotError::InvalidStyle(format!(
                "y range [{}, {}]",
                y_min, y_max
            )));
        }
        if self.boundary_dashes == 0 {
            return Err(PlotError::InvalidStyle("zero boundary dashes".into()));
        }
        Ok(())
    }

    /// X-axis range for a domain of the given length.
    pub fn x_range(&self, length: f64) -> (f64, f64) {
        let pad = self.x_margin * length;
        (-pad, length + pad)
    }
}

/// Frame title for simulated time `t`.
///
/// Shortest round-trip digits. Whole numbers keep a trailing `.0`, and
/// magnitudes below 1e-4 or from 1e16 up use a signed two-digit exponent
/// (`5e-06`, `1e+16`).
pub fn format_time_title(t: f64) -> String {
    format!("time = {}", format_float(t))
}

fn format_float(t: f64) -> String {
    if t.is_nan() {
        return "nan".to_string();
    }
    if t.is_infinite() {
        return if t > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = t.abs();
    if t != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", t);
        if let Some((mantissa, exponent)) = sci.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
        return sci;
    }
    if t.fract() == 0.0 {
        format!("{:.1}", t)
    } else {
        format!("{}", t)
    }
}

/// Dash segments `(start, end)` covering `[y0, y1]`.
///
/// The span is cut into `n_dashes` equal periods, each drawn for its first
/// 60 percent.
pub fn dash_segments(y0: f64, y1: f64, n_dashes: usize) -> Vec<(f64, f64)> {
    if n_dashes == 0 || y1 <= y0 {
        return Vec::new();
    }
    let period = (y1 - y0) / n_dashes as f64;
    (0..n_dashes)
        .map(|i| {
            let start = y0 + i as f64 * period;
            (start, start + 0.6 * period)
        })
        .collect()
}

/// Split the curve into runs of finite points.
///
/// A non-finite amplitude breaks the line instead of being bridged.
pub fn finite_runs(grid: &[f64], values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&x, &v) in grid.iter().zip(values) {
        if v.is_finite() {
            current.push((x, v));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Render one snapshot to a PNG file.
///
/// # Arguments
/// * `path` - Output image path
/// * `grid` - Spatial sample points
/// * `values` - Amplitude at each sample point
/// * `length` - Domain length, position of the right boundary marker
/// * `title` - Frame title, see [`format_time_title`]
/// * `style` - Image size and decoration
///
/// Non-finite amplitudes leave gaps in the curve.
pub fn render_snapshot_png(
    path: &Path,
    grid: &[f64],
    values: &[f64],
    length: f64,
    title: &str,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    if grid.len() != values.len() {
        return Err(PlotError::LengthMismatch {
            grid: grid.len(),
            values: values.len(),
        });
    }
    style.validate()?;

    let (x_min, x_max) = style.x_range(length);
    let (y_min, y_max) = style.y_range;

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(backend_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(style.height / 30);
    if style.annotate {
        builder
            .caption(title, ("sans-serif", style.title_font_size))
            .x_label_area_size(style.height / 12)
            .y_label_area_size(style.width / 16);
    }
    let mut chart = builder
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(backend_error)?;

    if style.annotate {
        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(("sans-serif", style.label_font_size))
            .draw()
            .map_err(backend_error)?;
    }

    let wave_style = BLACK.stroke_width(style.line_width);
    let mut runs = finite_runs(grid, values);
    if runs.is_empty() {
        // Keeps the legend entry
        runs.push(Vec::new());
    }
    for (i, run) in runs.into_iter().enumerate() {
        let wave = chart
            .draw_series(LineSeries::new(run, wave_style))
            .map_err(backend_error)?;
        if style.annotate && i == 0 {
            wave.label(style.wave_label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], wave_style)
            });
        }
    }

    let boundary_style = RED.stroke_width(style.boundary_width);
    let dashes = dash_segments(y_min, y_max, style.boundary_dashes);
    for (i, x) in [0.0, length].into_iter().enumerate() {
        let markers = chart
            .draw_series(
                dashes
                    .iter()
                    .map(|&(a, b)| PathElement::new(vec![(x, a), (x, b)], boundary_style)),
            )
            .map_err(backend_error)?;
        // One legend entry for both markers
        if style.annotate && i == 0 {
            markers
                .label(style.boundary_label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 40, y)], boundary_style)
                });
        }
    }

    if style.annotate {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperMiddle)
            .label_font(("sans-serif", style.label_font_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(backend_error)?;
    }

    root.present().map_err(backend_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_format_time_title() {
        assert_eq!(format_time_title(0.0), "time = 0.0");
        assert_eq!(format_time_title(3.0), "time = 3.0");
        assert_eq!(format_time_title(0.005), "time = 0.005");
        assert_eq!(format_time_title(2.5), "time = 2.5");
        assert_eq!(format_time_title(0.0001), "time = 0.0001");
    }

    #[test]
    fn test_format_time_title_exponent_form() {
        assert_eq!(format_time_title(5e-6), "time = 5e-06");
        assert_eq!(format_time_title(1.5e-5), "time = 1.5e-05");
        assert_eq!(format_time_title(2.5e-7), "time = 2.5e-07");
        assert_eq!(format_time_title(1e16), "time = 1e+16");
        assert_eq!(format_time_title(1e15), "time = 1000000000000000.0");
        assert_eq!(format_time_title(f64::NAN), "time = nan");
    }

    #[test]
    fn test_finite_runs_break_at_gaps() {
        let grid = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let values = [0.0, 0.5, f64::NAN, f64::INFINITY, 0.25, 0.75];
        let runs = finite_runs(&grid, &values);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(0.0, 0.0), (1.0, 0.5)]);
        assert_eq!(runs[1], vec![(4.0, 0.25), (5.0, 0.75)]);

        assert_eq!(finite_runs(&grid, &[0.1; 6]).len(), 1);
        assert!(finite_runs(&[0.0, 1.0], &[f64::NAN, f64::NAN]).is_empty());
    }

    #[test]
    fn test_dash_segments_cover_span() {
        let dashes = dash_segments(-1.0, 2.0, 3);
        assert_eq!(dashes.len(), 3);
        assert!((dashes[0].0 + 1.0).abs() < TOL);
        assert!((dashes[0].1 + 0.4).abs() < TOL);
        assert!((dashes[2].0 - 1.0).abs() < TOL);
        assert!(dashes[2].1 < 2.0);
        assert!(dash_segments(1.0, 0.0, 4).is_empty());
        assert!(dash_segments(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_default_style() {
        let style = PlotStyle::default();
        assert_eq!((style.width, style.height), (1920, 1500));
        assert_eq!(style.y_range, (-1.0, 2.0));
        assert!(style.annotate);
        assert!(style.validate().is_ok());
        assert!(!PlotStyle::bare().annotate);
    }

    #[test]
    fn test_x_range_contains_both_boundaries() {
        let (lo, hi) = PlotStyle::default().x_range(10.0);
        assert!(lo < 0.0);
        assert!(hi > 10.0);
    }

    #[test]
    fn test_invalid_style() {
        let style = PlotStyle::default().with_size(0, 100);
        assert!(matches!(style.validate(), Err(PlotError::InvalidStyle(_))));

        let style = PlotStyle::default().with_y_range(1.0, 1.0);
        assert!(matches!(style.validate(), Err(PlotError::InvalidStyle(_))));
    }

    #[test]
    fn test_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_snapshot_png(
            &dir.path().join("frame.png"),
            &[0.0, 1.0, 2.0],
            &[0.0, 1.0],
            3.0,
            "time = 0.0",
            &PlotStyle::bare(),
        );
        assert!(matches!(
            result,
            Err(PlotError::LengthMismatch { grid: 3, values: 2 })
        ));
    }

    #[test]
    fn test_render_bare_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("time_0.png");
        let grid: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let values: Vec<f64> = grid.iter().map(|x| (x * 0.5).sin()).collect();

        let style = PlotStyle::bare().with_size(320, 250);
        render_snapshot_png(&path, &grid, &values, 10.0, "time = 0.0", &style).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_render_skips_non_finite_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nan.png");
        let grid = [0.0, 1.0, 2.0, 3.0];
        let values = [0.0, f64::NAN, f64::INFINITY, 0.5];

        let style = PlotStyle::bare().with_size(200, 150);
        render_snapshot_png(&path, &grid, &values, 4.0, "time = 1.0", &style).unwrap();
        assert!(path.exists());
    }

    #[test]
    #[ignore = "needs a sans-serif system font"]
    fn test_render_annotated_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.png");
        let grid: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();
        let values = vec![0.25; 50];

        let style = PlotStyle::default().with_size(640, 500);
        render_snapshot_png(&path, &grid, &values, 10.0, &format_time_title(0.005), &style).unwrap();
        assert!(path.exists());
    }
}
