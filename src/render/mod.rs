//! Snapshot-to-frame rendering.
//!
//! Ties together:
//! - The parameter file and the derived discretization
//! - Per-step snapshot reading
//! - PNG frame output
//!
//! # Example
//! ```ignore
//! use wave_plot::layout::DataLayout;
//! use wave_plot::render::FrameRenderer;
//!
//! let layout = DataLayout::new("./data");
//! let result = FrameRenderer::from_layout(&layout)?
//!     .with_stride(5)
//!     .run_with_callback(|step, t, _path| println!("step {} t = {:.3}", step, t))?;
//! ```

mod runner;

pub use runner::{FrameRenderer, RenderConfig, RenderError, RenderResult};
