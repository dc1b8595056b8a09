#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod sampler;

// Building blocks – public so each stage is usable on its own.
pub mod energy;
pub mod filters;
pub mod grid;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline + results.
pub use crate::error::{PipelineError, Result};
pub use crate::pipeline::{run_pipeline, run_pipeline_observed, PipelineParams, PipelineResult};
pub use crate::sampler::{PixelArt, SampleMode};

// Stage timing surfaced to observers and reports.
pub use crate::diagnostics::{StageObserver, StageTiming, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pixel_grid::prelude::*;
///
/// # fn main() {
/// let (w, h) = (64usize, 64usize);
/// let rgba = vec![0u8; w * h * 4];
/// let image = RgbaView::new(w, h, &rgba).expect("valid buffer");
///
/// let result = run_pipeline(image, &PipelineParams::default()).expect("pipeline");
/// println!(
///     "cell size {} -> {} x {} cells",
///     result.detected_pixel_size,
///     result.all_x_lines.len().saturating_sub(1),
///     result.all_y_lines.len().saturating_sub(1),
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::image::RgbaView;
    pub use crate::{run_pipeline, PipelineParams, PipelineResult, SampleMode};
}
