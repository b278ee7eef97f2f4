//! Working-directory layout shared by the solver and the renderer.
//!
//! ```text
//! data/
//! ├── simulation_Parameters.txt
//! ├── InitialConditions.csv
//! ├── CSV_data/
//! │   ├── time_0.csv
//! │   └── time_1.csv
//! └── Images/
//!     ├── time_0.png
//!     └── time_1.png
//! ```

use std::path::{Path, PathBuf};

/// Default working directory.
pub const DEFAULT_DATA_DIR: &str = "./data";
/// Parameter file name.
pub const PARAMETER_FILE: &str = "simulation_Parameters.txt";
/// Snapshot directory name.
pub const CSV_DIR: &str = "CSV_data";
/// Frame directory name.
pub const IMAGE_DIR: &str = "Images";
/// Initial condition file name.
pub const INITIAL_CONDITIONS_FILE: &str = "InitialConditions.csv";

/// File stem of step `k`: `time_<k>`.
pub fn frame_stem(k: usize) -> String {
    format!("time_{}", k)
}

/// Paths of one working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
    csv_dir: PathBuf,
    image_dir: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl DataLayout {
    /// Standard layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            csv_dir: root.join(CSV_DIR),
            image_dir: root.join(IMAGE_DIR),
            root,
        }
    }

    /// Read snapshots from another directory.
    pub fn with_csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.csv_dir = dir.into();
        self
    }

    /// Write frames to another directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Working directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot directory.
    pub fn csv_dir(&self) -> &Path {
        &self.csv_dir
    }

    /// Frame directory.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Parameter file.
    pub fn parameter_file(&self) -> PathBuf {
        self.root.join(PARAMETER_FILE)
    }

    /// Initial condition snapshot.
    pub fn initial_conditions_file(&self) -> PathBuf {
        self.root.join(INITIAL_CONDITIONS_FILE)
    }

    /// Snapshot of step `k`.
    pub fn snapshot_path(&self, k: usize) -> PathBuf {
        self.csv_dir.join(format!("{}.csv", frame_stem(k)))
    }

    /// Frame of step `k`.
    pub fn frame_path(&self, k: usize) -> PathBuf {
        self.image_dir.join(format!("{}.png", frame_stem(k)))
    }
}
