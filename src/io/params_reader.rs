//! Reader for simulation parameter files.
//!
//! Parses the five-line parameter file shared by the wave solver and the
//! frame renderer.
//!
//! # File Format
//!
//! ```text
//! length 10.0
//! wavelength 2.0
//! wave_speed 1.0
//! cfl 0.5
//! total_time 4.0
//! ```
//!
//! Each line is `<name> <value>`. Lines are read by position, not by name:
//! line 1 is the domain length, then wavelength, wave speed, CFL number and
//! total simulated time. Lines after the fifth are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Number of positional lines in a parameter file.
pub const N_PARAMETER_LINES: usize = 5;

/// Default names written by [`write_parameter_file`].
pub const PARAMETER_NAMES: [&str; N_PARAMETER_LINES] =
    ["length", "wavelength", "wave_speed", "cfl", "total_time"];

/// Error type for parameter file parsing.
#[derive(Debug, Error)]
pub enum ParameterFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parse error with line number
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// File ended before all five parameters were read
    #[error("Parameter file has {found} lines, expected at least 5")]
    TooFewLines { found: usize },

    /// Value outside its physical range
    #[error("Invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },
}

/// Parameters of a 1D wave simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Domain length L
    pub length: f64,
    /// Wavelength of the initial pulse
    pub wavelength: f64,
    /// Wave propagation speed c
    pub wave_speed: f64,
    /// Courant number c * dt / dx
    pub cfl: f64,
    /// Total simulated time T
    pub total_time: f64,
}

impl SimulationParameters {
    /// Create a new parameter set.
    pub fn new(length: f64, wavelength: f64, wave_speed: f64, cfl: f64, total_time: f64) -> Self {
        Self {
            length,
            wavelength,
            wave_speed,
            cfl,
            total_time,
        }
    }

    /// Values in file order.
    pub fn as_array(&self) -> [f64; N_PARAMETER_LINES] {
        [
            self.length,
            self.wavelength,
            self.wave_speed,
            self.cfl,
            self.total_time,
        ]
    }

    /// Check that every value is finite and in its physical range.
    ///
    /// # Errors
    /// `InvalidValue` for the first offending parameter.
    pub fn validate(&self) -> Result<(), ParameterFileError> {
        let positive = [
            ("length", self.length),
            ("wavelength", self.wavelength),
            ("wave_speed", self.wave_speed),
            ("cfl", self.cfl),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterFileError::InvalidValue { name, value });
            }
        }
        if !self.total_time.is_finite() || self.total_time < 0.0 {
            return Err(ParameterFileError::InvalidValue {
                name: "total_time",
                value: self.total_time,
            });
        }

        // Leapfrog scheme is only stable for CFL <= 1
        if self.cfl > 1.0 {
            warn!(cfl = self.cfl, "CFL number above 1, solution will be unstable");
        }

        Ok(())
    }
}

/// Parse the value token of a single parameter line.
fn parse_line(line: &str, line_num: usize) -> Result<f64, ParameterFileError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(ParameterFileError::ParseError {
            line: line_num,
            message: "Expected: <name> <value>".into(),
        });
    }

    parts[1]
        .parse()
        .map_err(|_| ParameterFileError::ParseError {
            line: line_num,
            message: format!("Invalid value '{}' for '{}'", parts[1], parts[0]),
        })
}

fn from_lines<'a, I>(lines: I) -> Result<SimulationParameters, ParameterFileError>
where
    I: Iterator<Item = &'a str>,
{
    let mut values = [0.0; N_PARAMETER_LINES];
    let mut found = 0;

    for (i, line) in lines.take(N_PARAMETER_LINES).enumerate() {
        values[i] = parse_line(line, i + 1)?;
        found += 1;
    }

    if found < N_PARAMETER_LINES {
        return Err(ParameterFileError::TooFewLines { found });
    }

    let [length, wavelength, wave_speed, cfl, total_time] = values;
    Ok(SimulationParameters::new(
        length, wavelength, wave_speed, cfl, total_time,
    ))
}

/// Parse simulation parameters from a string.
///
/// Same format as file, useful for testing or embedded data. Values are not
/// range-checked; call [`SimulationParameters::validate`] for that.
pub fn parse_parameters(content: &str) -> Result<SimulationParameters, ParameterFileError> {
    from_lines(content.lines())
}

/// Read a simulation parameter file.
///
/// # Arguments
/// * `path` - Path to the parameter file
///
/// # Returns
/// * `Ok(SimulationParameters)` - Parsed and validated parameters
/// * `Err(ParameterFileError)` - If reading, parsing or validation fails
///
/// # Example
///
/// ```ignore
/// use wave_plot::io::read_parameter_file;
/// use std::path::Path;
///
/// let params = read_parameter_file(Path::new("data/simulation_Parameters.txt"))?;
/// println!("L = {}, T = {}", params.length, params.total_time);
/// ```
pub fn read_parameter_file(path: &Path) -> Result<SimulationParameters, ParameterFileError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::with_capacity(N_PARAMETER_LINES);
    for line in reader.lines().take(N_PARAMETER_LINES) {
        lines.push(line?);
    }

    let params = from_lines(lines.iter().map(String::as_str))?;
    params.validate()?;
    Ok(params)
}

/// Write simulation parameters in the positional `<name> <value>` format.
pub fn write_parameter_file(
    path: &Path,
    params: &SimulationParameters,
) -> Result<(), ParameterFileError> {
    let mut file = File::create(path)?;

    for (name, value) in PARAMETER_NAMES.iter().zip(params.as_array()) {
        writeln!(file, "{} {}", name, value)?;
    }

    Ok(())
}
