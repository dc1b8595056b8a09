//! 1-D marginal energy profiles of the heatmap.

use crate::image::{ImageU8, ImageView};

/// Column profile: `Px[x] = Σ_y heatmap[x, y]`.
pub fn column_profile(heatmap: &ImageU8) -> Vec<f32> {
    let mut profile = vec![0.0f32; heatmap.w];
    for y in 0..heatmap.h {
        for (acc, &v) in profile.iter_mut().zip(heatmap.row(y)) {
            *acc += v as f32;
        }
    }
    profile
}

/// Row profile: `Py[y] = Σ_x heatmap[x, y]`.
pub fn row_profile(heatmap: &ImageU8) -> Vec<f32> {
    let mut profile = vec![0.0f32; heatmap.h];
    for (y, acc) in profile.iter_mut().enumerate() {
        *acc = heatmap.row(y).iter().map(|&v| v as f32).sum();
    }
    profile
}
