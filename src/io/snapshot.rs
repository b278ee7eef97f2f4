//! CSV snapshot files.
//!
//! One snapshot holds the wave amplitude at every grid point for a single
//! time step, stored as one comma-separated row:
//!
//! ```text
//! 0.05,0.0,0.0,0.0012,0.0345,0.2881,...
//! ```
//!
//! The first cell is a label (the simulated time when written by this crate)
//! and is discarded on read unless the reader is told otherwise. Blank cells
//! read as zero.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Error type for snapshot files.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Cell that is neither blank nor a float
    #[error("Invalid value '{cell}' in column {column}")]
    ParseError { column: usize, cell: String },

    /// No data row in the file
    #[error("Snapshot contains no data")]
    EmptyFile,

    /// Row length does not fit the grid
    #[error("Snapshot has {found} values but the grid has {expected} points")]
    LengthMismatch { expected: usize, found: usize },
}

/// Wave amplitudes at one time step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Label cell, if the row had one
    pub label: Option<String>,
    /// Amplitude per grid point
    pub values: Vec<f64>,
}

impl Snapshot {
    /// Create a snapshot without label.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            label: None,
            values,
        }
    }

    /// Set the label cell.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fit the values to a grid of `n_points`.
    ///
    /// A row holds either one value per grid point or one fewer, in which
    /// case the last point is zero. Any other length is `LengthMismatch`.
    pub fn align_to(&mut self, n_points: usize) -> Result<(), SnapshotError> {
        let found = self.values.len();
        if found != n_points && found + 1 != n_points {
            return Err(SnapshotError::LengthMismatch {
                expected: n_points,
                found,
            });
        }
        self.values.resize(n_points, 0.0);
        Ok(())
    }

    /// (min, max) of the values, or (0, 0) if empty.
    pub fn range(&self) -> (f64, f64) {
        if self.values.is_empty() {
            return (0.0, 0.0);
        }
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

fn parse_cell(cell: &str, column: usize) -> Result<f64, SnapshotError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.parse().map_err(|_| SnapshotError::ParseError {
        column,
        cell: cell.to_string(),
    })
}

/// Parse one snapshot row.
///
/// # Arguments
/// * `row` - Comma-separated cells
/// * `label_column` - Whether the first cell is a label to be discarded
pub fn parse_snapshot_row(row: &str, label_column: bool) -> Result<Snapshot, SnapshotError> {
    let mut cells = row.trim_end_matches(['\r', '\n']).split(',');
    let mut label = None;
    let mut offset = 0;

    if label_column {
        label = cells.next().map(|c| c.trim().to_string());
        offset = 1;
    }

    let values = cells
        .enumerate()
        .map(|(i, cell)| parse_cell(cell, i + offset))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(Snapshot { label, values })
}

/// Parse a snapshot from file content.
///
/// The first non-blank line is the data row; anything after it is ignored.
pub fn parse_snapshot(content: &str, label_column: bool) -> Result<Snapshot, SnapshotError> {
    let row = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or(SnapshotError::EmptyFile)?;
    parse_snapshot_row(row, label_column)
}

/// Read a snapshot file.
///
/// # Example
///
/// ```ignore
/// use wave_plot::io::read_snapshot_file;
/// use std::path::Path;
///
/// let snap = read_snapshot_file(Path::new("data/CSV_data/time_0.csv"), true)?;
/// let (lo, hi) = snap.range();
/// ```
pub fn read_snapshot_file(path: &Path, label_column: bool) -> Result<Snapshot, SnapshotError> {
    let reader = BufReader::new(File::open(path)?);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        return parse_snapshot_row(&line, label_column);
    }

    Err(SnapshotError::EmptyFile)
}

/// Write a snapshot as a single CSV row, label first if present.
pub fn write_snapshot_file(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let mut writer = BufWriter::new(File::create(path)?);

    let mut first = true;
    if let Some(ref label) = snapshot.label {
        write!(writer, "{}", label)?;
        first = false;
    }
    for v in &snapshot.values {
        if !first {
            write!(writer, ",")?;
        }
        write!(writer, "{}", v)?;
        first = false;
    }
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
