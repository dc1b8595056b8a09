//! 1-D Gaussian kernels and separable convolution with clamp-to-edge borders.

use crate::image::{ImageF32, ImageView, ImageViewMut};
use rayon::prelude::*;

/// Build a normalized 1-D Gaussian kernel for the given sigma.
///
/// The radius is `max(1, ceil(3 * sigma))`, so the kernel length is
/// `2 * radius + 1` and the taps sum to 1. A non-positive sigma collapses to
/// the identity kernel `[1]`.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil().max(1.0) as usize;
    let size = 2 * radius + 1;
    let denom = 2.0 * sigma as f64 * sigma as f64;
    let mut kernel = vec![0.0f32; size];
    let mut sum = 0.0f64;
    for (i, tap) in kernel.iter_mut().enumerate() {
        let d = i as f64 - radius as f64;
        let v = (-(d * d) / denom).exp();
        *tap = v as f32;
        sum += v;
    }
    for tap in &mut kernel {
        *tap = (*tap as f64 / sum) as f32;
    }
    kernel
}

#[inline]
fn clamp_index(idx: isize, upper: usize) -> usize {
    if idx < 0 {
        0
    } else if idx as usize >= upper {
        upper - 1
    } else {
        idx as usize
    }
}

/// Convolve one row with `kernel`, replicating border samples.
fn convolve_row(src: &[f32], dst: &mut [f32], kernel: &[f32], radius: usize) {
    let width = src.len();
    for (x, out) in dst.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (k, &tap) in kernel.iter().enumerate() {
            let sx = clamp_index(x as isize + k as isize - radius as isize, width);
            acc += tap * src[sx];
        }
        *out = acc;
    }
}

/// Apply `kernel` along x then along y with clamp-to-edge boundary handling.
///
/// Output has the same dimensions as the input. Rows are processed
/// independently, so the passes run row-parallel with deterministic results.
pub fn convolve_separable(src: &ImageF32, kernel: &[f32]) -> ImageF32 {
    let mut tmp = ImageF32::new(src.w, src.h);
    let mut dst = ImageF32::new(src.w, src.h);
    convolve_separable_into(src, kernel, &mut tmp, &mut dst);
    dst
}

/// In-place variant of [`convolve_separable`] writing into caller scratch.
///
/// `tmp` and `dst` must match the source dimensions.
pub fn convolve_separable_into(
    src: &ImageF32,
    kernel: &[f32],
    tmp: &mut ImageF32,
    dst: &mut ImageF32,
) {
    assert_eq!(tmp.w, src.w, "scratch width must match the source");
    assert_eq!(tmp.h, src.h, "scratch height must match the source");
    assert_eq!(dst.w, src.w, "output width must match the source");
    assert_eq!(dst.h, src.h, "output height must match the source");
    assert!(kernel.len() % 2 == 1, "kernel length must be odd");

    if kernel.len() == 1 && kernel[0] == 1.0 {
        dst.as_mut_slice().copy_from_slice(src.as_slice());
        return;
    }

    let radius = kernel.len() / 2;
    let width = src.w;
    let height = src.h;

    // Horizontal pass: each output row depends on its source row only.
    tmp.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, dst_row)| {
            convolve_row(src.row(y), dst_row, kernel, radius);
        });

    // Vertical pass: each output row reads a clamped window of tmp rows.
    let tmp_ref = &*tmp;
    dst.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, dst_row)| {
            dst_row.fill(0.0);
            for (k, &tap) in kernel.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - radius as isize, height);
                let src_row = tmp_ref.row(sy);
                for (out, &v) in dst_row.iter_mut().zip(src_row) {
                    *out += tap * v;
                }
            }
        });
}
