//! Grid-line detection on both axes, interpolation of missing interior
//! lines, and completion out to the image borders.

use super::peaks::detect_peaks_1d;
use super::profiles::{column_profile, row_profile};
use crate::filters::box_smooth_1d;
use crate::image::ImageU8;
use log::debug;
use serde::Serialize;

/// Raw line detections on both axes, sorted ascending.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLines {
    pub x_lines: Vec<u32>,
    pub y_lines: Vec<u32>,
}

/// Detect grid lines on both axes of the heatmap.
///
/// Marginal profiles are box-smoothed with width `smooth` before peak
/// detection; `min_energy` is a ratio in [0, 1] against the smoothed
/// profile maximum.
pub fn detect_grid_lines(
    heatmap: &ImageU8,
    cell_size: u32,
    gap_tolerance: u32,
    min_energy: f32,
    smooth: u32,
    window_size: u32,
) -> GridLines {
    let px = box_smooth_1d(&column_profile(heatmap), smooth.max(1) as usize);
    let py = box_smooth_1d(&row_profile(heatmap), smooth.max(1) as usize);
    let x_lines = detect_peaks_1d(&px, cell_size, gap_tolerance, min_energy, window_size);
    let y_lines = detect_peaks_1d(&py, cell_size, gap_tolerance, min_energy, window_size);
    debug!(
        "grid lines: {} on x, {} on y (cell size {cell_size})",
        x_lines.len(),
        y_lines.len()
    );
    GridLines { x_lines, y_lines }
}

/// Median of consecutive gaps, or `None` when it degenerates to zero.
fn typical_gap(lines: &[u32]) -> Option<f32> {
    if lines.len() < 2 {
        return None;
    }
    let mut gaps: Vec<u32> = lines.windows(2).map(|w| w[1] - w[0]).collect();
    gaps.sort_unstable();
    let m = gaps.len();
    let median = if m % 2 == 1 {
        gaps[m / 2] as f32
    } else {
        (gaps[m / 2 - 1] + gaps[m / 2]) as f32 * 0.5
    };
    (median > 0.0 && median.is_finite()).then_some(median)
}

/// Insert missing interior lines where a gap spans multiple typical gaps.
///
/// The typical gap is the median of consecutive differences; when that
/// degenerates (zero), `fallback_gap` takes its place. Inputs with fewer
/// than two lines pass through unchanged.
pub fn interpolate_lines(lines: &[u32], limit: u32, fallback_gap: u32) -> Vec<u32> {
    if lines.len() < 2 {
        return lines.to_vec();
    }
    let gap = typical_gap(lines).unwrap_or(fallback_gap.max(1) as f32);

    let mut all: Vec<u32> = lines.to_vec();
    for pair in lines.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = (b - a) as f32;
        if span > 1.5 * gap {
            let missing = (span / gap).round() as u32 - 1;
            for k in 1..=missing {
                let pos = a as f32 + span * k as f32 / (missing + 1) as f32;
                all.push(pos.round() as u32);
            }
        }
    }
    finalize(all, limit)
}

/// Extend a line sequence to the image borders.
///
/// When the first (or last) line sits farther than `typical_gap -
/// gap_tolerance` from its border, evenly spaced lines stepping by
/// `typical_gap` fill the margin. The terminal boundaries 0 and `limit` are
/// always present in the output.
pub fn complete_edges(
    lines: &[u32],
    limit: u32,
    typical_gap: u32,
    gap_tolerance: u32,
) -> Vec<u32> {
    let step = typical_gap.max(1) as i64;
    let margin = typical_gap.saturating_sub(gap_tolerance);

    let mut all: Vec<u32> = lines.to_vec();
    if let Some(&first) = lines.first() {
        if first > margin {
            let mut pos = first as i64 - step;
            while pos >= 0 {
                all.push(pos as u32);
                pos -= step;
            }
        }
    }
    if let Some(&last) = lines.last() {
        if limit.saturating_sub(last) > margin {
            let mut pos = last as i64 + step;
            while pos <= limit as i64 {
                all.push(pos as u32);
                pos += step;
            }
        }
    }
    all.push(0);
    all.push(limit);
    finalize(all, limit)
}

/// Full regular grid with the given step, including both borders.
pub fn regular_grid(limit: u32, step: u32) -> Vec<u32> {
    let step = step.max(1);
    let mut lines: Vec<u32> = (0..limit).step_by(step as usize).collect();
    lines.push(limit);
    finalize(lines, limit)
}

fn finalize(mut lines: Vec<u32>, limit: u32) -> Vec<u32> {
    for v in &mut lines {
        *v = (*v).min(limit);
    }
    lines.sort_unstable();
    lines.dedup();
    lines
}
