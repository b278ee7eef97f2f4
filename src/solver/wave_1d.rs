//! Explicit finite-difference solver for the 1D wave equation.
//!
//! Solves u_tt = c² u_xx on a periodic grid with the second-order leapfrog
//! scheme:
//!
//! ```text
//! u_i^{n+1} = 2 u_i^n - u_i^{n-1} + C² (u_{i+1}^n + u_{i-1}^n - 2 u_i^n)
//! ```
//!
//! where C = c dt / dx is the CFL number. Stable for C <= 1.
//!
//! The first step uses u^{-1} = u^0 (zero initial velocity).

/// Minimum grid size for the three-point stencil.
pub const MIN_POINTS: usize = 3;

/// Three time levels of the leapfrog scheme.
#[derive(Clone, Debug)]
pub struct WaveState1D {
    /// u^{n-1}
    pub past: Vec<f64>,
    /// u^n
    pub present: Vec<f64>,
    /// u^{n+1}
    pub future: Vec<f64>,
}

impl WaveState1D {
    /// All three levels set to `initial`.
    pub fn at_rest(initial: Vec<f64>) -> Self {
        Self {
            past: initial.clone(),
            present: initial.clone(),
            future: initial,
        }
    }

    /// Number of grid points.
    pub fn n_points(&self) -> usize {
        self.present.len()
    }

    /// Rotate levels: past <- present <- future.
    ///
    /// Buffers are swapped, not copied; the old past becomes scratch space
    /// for the next future.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.past, &mut self.present);
        std::mem::swap(&mut self.present, &mut self.future);
    }
}

/// One leapfrog update with periodic wrap.
///
/// Writes u^{n+1} into `future` from `present` (u^n) and `past` (u^{n-1}).
pub fn leapfrog_periodic(present: &[f64], past: &[f64], future: &mut [f64], cfl_sq: f64) {
    let n = present.len();
    debug_assert!(n >= MIN_POINTS);
    debug_assert_eq!(past.len(), n);
    debug_assert_eq!(future.len(), n);

    for i in 1..n - 1 {
        future[i] = 2.0 * present[i] - past[i]
            + cfl_sq * (present[i + 1] + present[i - 1] - 2.0 * present[i]);
    }

    // Periodic ends
    future[0] =
        2.0 * present[0] - past[0] + cfl_sq * (present[1] + present[n - 1] - 2.0 * present[0]);
    future[n - 1] = 2.0 * present[n - 1] - past[n - 1]
        + cfl_sq * (present[0] + present[n - 2] - 2.0 * present[n - 1]);
}

/// Leapfrog time stepper for the periodic 1D wave equation.
#[derive(Clone, Debug)]
pub struct WaveSolver1D {
    cfl_sq: f64,
    state: WaveState1D,
    n_steps: usize,
}

impl WaveSolver1D {
    /// Create a solver starting at rest from `initial`.
    ///
    /// # Panics
    ///
    /// Panics if `initial` has fewer than three points.
    pub fn new(initial: Vec<f64>, cfl: f64) -> Self {
        assert!(
            initial.len() >= MIN_POINTS,
            "Need at least {} grid points, got {}",
            MIN_POINTS,
            initial.len()
        );
        Self {
            cfl_sq: cfl * cfl,
            state: WaveState1D::at_rest(initial),
            n_steps: 0,
        }
    }

    /// Advance one step and return the new present level.
    ///
    /// The returned slice is the snapshot of this step; u^{n+1} is
    /// computed ahead for the following call.
    pub fn step(&mut self) -> &[f64] {
        self.state.rotate();
        let WaveState1D {
            past,
            present,
            future,
        } = &mut self.state;
        leapfrog_periodic(&present[..], &past[..], &mut future[..], self.cfl_sq);
        self.n_steps += 1;
        &self.state.present
    }

    /// Current level u^n.
    pub fn present(&self) -> &[f64] {
        &self.state.present
    }

    /// All three levels.
    pub fn state(&self) -> &WaveState1D {
        &self.state
    }

    /// Steps taken so far.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Sum of the present level.
    pub fn total_amplitude(&self) -> f64 {
        self.state.present.iter().sum()
    }

    /// Largest absolute value of the present level.
    pub fn max_amplitude(&self) -> f64 {
        self.state
            .present
            .iter()
            .fold(0.0_f64, |m, &v| m.max(v.abs()))
    }
}
