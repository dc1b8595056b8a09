//! Grid recovery: cell-size estimation and line placement.
//!
//! Components
//! - `profiles`: 1-D marginal sums of the heatmap.
//! - `pixel_size`: autocorrelation scoring of candidate cell periods.
//! - `peaks`: thresholded local-max detection with gap-constrained chaining.
//! - `lines`: per-axis detection, interior interpolation, border completion.
pub mod lines;
pub mod peaks;
pub mod pixel_size;
pub mod profiles;

pub use lines::{complete_edges, detect_grid_lines, interpolate_lines, regular_grid, GridLines};
pub use peaks::detect_peaks_1d;
pub use pixel_size::detect_pixel_size;
pub use profiles::{column_profile, row_profile};
