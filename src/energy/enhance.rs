//! Directional enhancement of the energy map.

use crate::filters::{convolve_separable, gaussian_kernel_1d, sobel};
use crate::image::{ImageF32, ImageView};

/// Amplify horizontal and vertical edge structure in an energy map.
///
/// A lightly blurred copy of the energy is probed with the 3×3 Sobel
/// operators; the absolute `gx` response serves as the horizontal structure
/// signal and the absolute `gy` response as the vertical one. Both are
/// max-normalized to [0, 1] and blended back multiplicatively:
///
/// `out[i] = energy[i] * (1 + (h_factor - 1) * h_norm[i] + (v_factor - 1) * v_norm[i])`
///
/// With both factors at 1 the output equals the input exactly; factors above
/// 1 raise edges of that orientation.
pub fn enhance_energy_directional(energy: &ImageF32, h_factor: f32, v_factor: f32) -> ImageF32 {
    let mut out = energy.clone();
    if h_factor == 1.0 && v_factor == 1.0 {
        return out;
    }

    let blurred = convolve_separable(energy, &gaussian_kernel_1d(1.0));
    let grads = sobel(&blurred);

    let h_max = grads
        .gx
        .as_slice()
        .iter()
        .fold(0.0f32, |m, &v| m.max(v.abs()));
    let v_max = grads
        .gy
        .as_slice()
        .iter()
        .fold(0.0f32, |m, &v| m.max(v.abs()));
    let h_scale = if h_max > 0.0 { 1.0 / h_max } else { 0.0 };
    let v_scale = if v_max > 0.0 { 1.0 / v_max } else { 0.0 };

    let h_gain = h_factor - 1.0;
    let v_gain = v_factor - 1.0;
    for ((dst, &gx), &gy) in out
        .data
        .iter_mut()
        .zip(grads.gx.as_slice())
        .zip(grads.gy.as_slice())
    {
        let h_norm = gx.abs() * h_scale;
        let v_norm = gy.abs() * v_scale;
        *dst *= 1.0 + h_gain * h_norm + v_gain * v_norm;
    }
    out
}
