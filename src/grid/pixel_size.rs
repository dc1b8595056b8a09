//! Autocorrelation-based estimation of the hidden cell period.

use super::profiles::{column_profile, row_profile};
use crate::error::{PipelineError, Result};
use crate::image::ImageU8;
use log::debug;

/// Estimate the integer cell size of the hidden grid.
///
/// Both marginal profiles of the heatmap are reduced to zero-mean signals and
/// scored with an unbiased autocorrelation at every candidate lag in
/// `[min_size, max_size]`; the lag with the highest combined score wins, ties
/// going to the smaller period. A constant image scores zero everywhere and
/// falls back to `min_size`.
///
/// Requires `1 <= min_size <= max_size <= min(W, H) / 2`.
pub fn detect_pixel_size(
    heatmap: &ImageU8,
    min_size: u32,
    max_size: u32,
) -> Result<u32> {
    let cap = (heatmap.w.min(heatmap.h) / 2) as u32;
    if min_size == 0 || min_size > max_size {
        return Err(PipelineError::InvalidDimensions(format!(
            "pixel size search range [{min_size}, {max_size}] is empty"
        )));
    }
    if max_size > cap {
        return Err(PipelineError::InvalidDimensions(format!(
            "max pixel size {max_size} exceeds half the smaller image side ({cap})"
        )));
    }

    let px = zero_mean(column_profile(heatmap));
    let py = zero_mean(row_profile(heatmap));

    let mut best_size = min_size;
    let mut best_score = f64::NEG_INFINITY;
    for candidate in min_size..=max_size {
        let score = autocorrelation(&px, candidate as usize)
            + autocorrelation(&py, candidate as usize);
        if score > best_score {
            best_score = score;
            best_size = candidate;
        }
    }
    debug!("detected pixel size {best_size} (score {best_score:.3})");
    Ok(best_size)
}

fn zero_mean(mut profile: Vec<f32>) -> Vec<f32> {
    if profile.is_empty() {
        return profile;
    }
    let mean = profile.iter().map(|&v| v as f64).sum::<f64>() / profile.len() as f64;
    for v in &mut profile {
        *v = (*v as f64 - mean) as f32;
    }
    profile
}

/// Unbiased autocorrelation of a zero-mean signal at the given lag.
fn autocorrelation(signal: &[f32], lag: usize) -> f64 {
    if signal.len() <= lag {
        return 0.0;
    }
    let n = signal.len() - lag;
    let mut acc = 0.0f64;
    for i in 0..n {
        acc += signal[i] as f64 * signal[i + lag] as f64;
    }
    acc / n as f64
}
