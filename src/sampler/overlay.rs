//! Cell-boundary overlay on upscaled pixel-art output.

use super::PixelArt;

/// Draw cell boundaries onto an upscaled bitmap.
///
/// A line is drawn on the last pixel column/row of every cell, so the
/// overlay marks the seams between logical pixels. At 1× there is nothing
/// between cells to draw on and the bitmap is left untouched.
pub fn overlay_grid(art: &mut PixelArt, color: [u8; 3]) {
    let factor = art.upscale_factor as usize;
    if factor <= 1 {
        return;
    }
    let w = art.width;
    let h = art.height;

    let mut paint = |x: usize, y: usize| {
        let p3 = (y * w + x) * 3;
        art.rgb[p3..p3 + 3].copy_from_slice(&color);
        let p4 = (y * w + x) * 4;
        art.rgba[p4..p4 + 3].copy_from_slice(&color);
        art.rgba[p4 + 3] = 255;
    };

    for x in (factor - 1..w).step_by(factor) {
        for y in 0..h {
            paint(x, y);
        }
    }
    for y in (factor - 1..h).step_by(factor) {
        for x in 0..w {
            paint(x, y);
        }
    }
}
