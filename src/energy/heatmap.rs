//! Quantile-based normalization of the energy map to 8 bits.

use crate::image::{ImageF32, ImageU8, ImageView};

const HISTOGRAM_BINS: usize = 1024;

/// Approximate quantile of `values` via a 1024-bin histogram over the
/// observed [min, max] range, linearly interpolated within the bin.
///
/// Runs in O(N). Non-finite samples are ignored; an empty or constant input
/// returns its minimum (or 0 when there are no finite samples).
pub fn quantile_approx(values: &[f32], q: f32) -> f32 {
    let q = q.clamp(0.0, 1.0);
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut count = 0usize;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    if max <= min {
        return min;
    }

    let mut bins = [0u32; HISTOGRAM_BINS];
    let scale = HISTOGRAM_BINS as f32 / (max - min);
    for &v in values {
        if v.is_finite() {
            let idx = (((v - min) * scale) as usize).min(HISTOGRAM_BINS - 1);
            bins[idx] += 1;
        }
    }

    let target = q as f64 * count as f64;
    let bin_width = (max - min) / HISTOGRAM_BINS as f32;
    let mut cumulative = 0.0f64;
    for (i, &bin_count) in bins.iter().enumerate() {
        let next = cumulative + bin_count as f64;
        if next >= target && bin_count > 0 {
            let frac = ((target - cumulative) / bin_count as f64).clamp(0.0, 1.0) as f32;
            return min + (i as f32 + frac) * bin_width;
        }
        cumulative = next;
    }
    max
}

/// Render an energy map as an 8-bit heatmap using robust normalization.
///
/// The 2% and 98% quantiles bound the mapped range so isolated outliers do
/// not wash out the contrast. A constant map (hi <= lo) produces all zeros.
pub fn to_heatmap_u8(energy: &ImageF32) -> ImageU8 {
    let mut out = ImageU8::new(energy.w, energy.h);
    to_heatmap_u8_into(energy, &mut out);
    out
}

/// In-place variant of [`to_heatmap_u8`] writing into caller scratch.
pub fn to_heatmap_u8_into(energy: &ImageF32, out: &mut ImageU8) {
    assert_eq!(out.w, energy.w, "output width must match the source");
    assert_eq!(out.h, energy.h, "output height must match the source");
    let lo = quantile_approx(energy.as_slice(), 0.02);
    let hi = quantile_approx(energy.as_slice(), 0.98);
    if hi <= lo {
        out.data.fill(0);
        return;
    }
    let scale = 1.0 / (hi - lo);
    for (dst, &v) in out.data.iter_mut().zip(energy.as_slice()) {
        let normalized = ((v - lo) * scale).clamp(0.0, 1.0);
        *dst = (normalized * 255.0).round() as u8;
    }
}
