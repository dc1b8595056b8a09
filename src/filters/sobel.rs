//! 3×3 Sobel gradients with clamp-to-edge borders.

use crate::image::{ImageF32, ImageView, ImageViewMut};
use rayon::prelude::*;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Horizontal and vertical Sobel responses of one image.
#[derive(Clone, Debug)]
pub struct SobelGradients {
    pub gx: ImageF32,
    pub gy: ImageF32,
}

/// Compute both Sobel responses. Border pixels use clamped neighbors.
pub fn sobel(src: &ImageF32) -> SobelGradients {
    let mut gx = ImageF32::new(src.w, src.h);
    let mut gy = ImageF32::new(src.w, src.h);
    sobel_into(src, &mut gx, &mut gy);
    SobelGradients { gx, gy }
}

/// In-place variant of [`sobel`] writing into caller scratch buffers.
pub fn sobel_into(src: &ImageF32, gx: &mut ImageF32, gy: &mut ImageF32) {
    assert_eq!(gx.w, src.w, "gx width must match the source");
    assert_eq!(gx.h, src.h, "gx height must match the source");
    assert_eq!(gy.w, src.w, "gy width must match the source");
    assert_eq!(gy.h, src.h, "gy height must match the source");

    let w = src.w;
    let h = src.h;

    let gx_data = gx.as_mut_slice();
    let gy_data = gy.as_mut_slice();

    gx_data
        .par_chunks_mut(w)
        .zip(gy_data.par_chunks_mut(w))
        .enumerate()
        .for_each(|(y, (gx_row, gy_row))| {
            let rows = [
                src.row(y.saturating_sub(1)),
                src.row(y),
                src.row((y + 1).min(h - 1)),
            ];
            for x in 0..w {
                let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
                let mut sum_x = 0.0f32;
                let mut sum_y = 0.0f32;
                for (ky, row) in rows.iter().enumerate() {
                    for (kx, &xx) in x_idx.iter().enumerate() {
                        let sample = row[xx];
                        sum_x += sample * SOBEL_KERNEL_X[ky][kx];
                        sum_y += sample * SOBEL_KERNEL_Y[ky][kx];
                    }
                }
                gx_row[x] = sum_x;
                gy_row[x] = sum_y;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_has_zero_gradients() {
        let mut img = ImageF32::new(8, 8);
        img.fill(0.7);
        let grads = sobel(&img);
        assert!(grads.gx.data.iter().all(|&v| v == 0.0));
        assert!(grads.gy.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn vertical_step_responds_in_gx_only() {
        let mut img = ImageF32::new(8, 8);
        for y in 0..8 {
            for x in 4..8 {
                img.set(x, y, 1.0);
            }
        }
        let grads = sobel(&img);
        // Interior pixels adjacent to the step see the full ±4 response.
        assert!((grads.gx.get(3, 4) - 4.0).abs() < 1e-6);
        assert_eq!(grads.gy.get(3, 4), 0.0);
        // Far away from the step both responses vanish.
        assert_eq!(grads.gx.get(1, 4), 0.0);
    }

    #[test]
    fn borders_clamp_instead_of_wrapping() {
        let mut img = ImageF32::new(4, 4);
        img.set(3, 0, 1.0);
        let grads = sobel(&img);
        // The top-left corner only sees replicated zeros, not the far corner.
        assert_eq!(grads.gx.get(0, 0), 0.0);
        assert_eq!(grads.gy.get(0, 0), 0.0);
    }
}
