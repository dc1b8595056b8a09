//! Gradient-energy computation and its 8-bit rendering.
//!
//! Components
//! - `gray`: RGBA bytes → luminance in [0, 1].
//! - `grad_energy`: Gaussian pre-blur, Sobel, per-pixel gradient magnitude.
//! - `enhance`: optional directional amplification of the energy map.
//! - `heatmap`: robust quantile normalization to `u8`.
pub mod enhance;
pub mod gray;
pub mod heatmap;

pub use enhance::enhance_energy_directional;
pub use gray::{rgba_to_gray01, rgba_to_gray01_into};
pub use heatmap::{quantile_approx, to_heatmap_u8, to_heatmap_u8_into};

use crate::filters::{convolve_separable_into, gaussian_kernel_1d, sobel_into};
use crate::image::ImageF32;

/// Per-pixel gradient magnitude of a Gaussian-blurred grayscale image.
///
/// The blur sigma controls how much sub-cell texture is suppressed before
/// the Sobel operators respond to cell boundaries.
pub fn grad_energy(gray: &ImageF32, sigma: f32) -> ImageF32 {
    let mut scratch = EnergyScratch::new(gray.w, gray.h);
    let mut energy = ImageF32::new(gray.w, gray.h);
    grad_energy_into(gray, sigma, &mut scratch, &mut energy);
    energy
}

/// Scratch buffers reused across [`grad_energy_into`] invocations.
pub struct EnergyScratch {
    pub(crate) tmp: ImageF32,
    pub(crate) blurred: ImageF32,
    pub(crate) gx: ImageF32,
    pub(crate) gy: ImageF32,
}

impl EnergyScratch {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            tmp: ImageF32::new(w, h),
            blurred: ImageF32::new(w, h),
            gx: ImageF32::new(w, h),
            gy: ImageF32::new(w, h),
        }
    }
}

/// In-place variant of [`grad_energy`] writing into caller scratch.
pub fn grad_energy_into(
    gray: &ImageF32,
    sigma: f32,
    scratch: &mut EnergyScratch,
    energy: &mut ImageF32,
) {
    let kernel = gaussian_kernel_1d(sigma);
    convolve_separable_into(gray, &kernel, &mut scratch.tmp, &mut scratch.blurred);
    sobel_into(&scratch.blurred, &mut scratch.gx, &mut scratch.gy);
    for ((dst, &gx), &gy) in energy
        .data
        .iter_mut()
        .zip(&scratch.gx.data)
        .zip(&scratch.gy.data)
    {
        *dst = (gx * gx + gy * gy).sqrt();
    }
}
