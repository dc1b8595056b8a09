//! RGBA to normalized luminance conversion.

use crate::image::{ImageF32, ImageViewMut, RgbaView};

/// Rec.601 luma weights applied to 8-bit channels.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Convert straight-alpha RGBA bytes to luminance in [0, 1], ignoring alpha.
pub fn rgba_to_gray01(rgba: RgbaView<'_>) -> ImageF32 {
    let mut out = ImageF32::new(rgba.width(), rgba.height());
    rgba_to_gray01_into(rgba, &mut out);
    out
}

/// In-place variant of [`rgba_to_gray01`] writing into caller scratch.
pub fn rgba_to_gray01_into(rgba: RgbaView<'_>, out: &mut ImageF32) {
    assert_eq!(out.w, rgba.width(), "output width must match the source");
    assert_eq!(out.h, rgba.height(), "output height must match the source");
    for y in 0..rgba.height() {
        let src = rgba.row_bytes(y);
        let dst = out.row_mut(y);
        for (px, dst_px) in src.chunks_exact(4).zip(dst.iter_mut()) {
            let luma = LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32;
            *dst_px = (luma / 255.0).clamp(0.0, 1.0);
        }
    }
}
