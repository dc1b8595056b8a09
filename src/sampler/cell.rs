//! Per-cell color reduction.

use super::SampleMode;
use crate::image::RgbaView;

/// Euclidean length of the RGB cube diagonal, used to normalize color
/// distances into [0, 1].
const RGB_DIAGONAL: f32 = 441.672_94; // sqrt(3) * 255

/// Collapse the cell `[x0, x1) × [y0, y1)` to a single RGBA color.
///
/// Callers guarantee a non-empty, in-bounds span.
pub(crate) fn sample_cell(
    src: RgbaView<'_>,
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    mode: SampleMode,
    weight_ratio: f32,
) -> [u8; 4] {
    match mode {
        SampleMode::Center => {
            let cx = ((x0 + x1) / 2).min(src.width() - 1);
            let cy = ((y0 + y1) / 2).min(src.height() - 1);
            src.pixel(cx, cy)
        }
        SampleMode::Average | SampleMode::Direct => average_cell(src, x0, x1, y0, y1),
        SampleMode::Weighted => weighted_cell(src, x0, x1, y0, y1, weight_ratio),
    }
}

fn average_cell(src: RgbaView<'_>, x0: usize, x1: usize, y0: usize, y1: usize) -> [u8; 4] {
    let mut sums = [0.0f64; 4];
    let mut count = 0usize;
    for y in y0..y1 {
        let row = src.row_bytes(y);
        for px in row[x0 * 4..x1 * 4].chunks_exact(4) {
            for (acc, &c) in sums.iter_mut().zip(px) {
                *acc += c as f64;
            }
            count += 1;
        }
    }
    let inv = 1.0 / count as f64;
    [
        (sums[0] * inv).round() as u8,
        (sums[1] * inv).round() as u8,
        (sums[2] * inv).round() as u8,
        (sums[3] * inv).round() as u8,
    ]
}

/// Two-phase mean: pixels near the plain RGB mean pull harder, so small
/// contaminations (anti-aliasing bleed, grid-line remnants) lose influence.
fn weighted_cell(
    src: RgbaView<'_>,
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
    weight_ratio: f32,
) -> [u8; 4] {
    let plain = average_cell(src, x0, x1, y0, y1);
    let mean = [plain[0] as f32, plain[1] as f32, plain[2] as f32];

    let gain = weight_ratio - 1.0;
    let mut sums = [0.0f64; 3];
    let mut weight_total = 0.0f64;
    let mut alpha_sum = 0.0f64;
    let mut count = 0usize;
    for y in y0..y1 {
        let row = src.row_bytes(y);
        for px in row[x0 * 4..x1 * 4].chunks_exact(4) {
            let dr = px[0] as f32 - mean[0];
            let dg = px[1] as f32 - mean[1];
            let db = px[2] as f32 - mean[2];
            let dist = (dr * dr + dg * dg + db * db).sqrt() / RGB_DIAGONAL;
            let weight = (1.0 + gain * (1.0 - dist.clamp(0.0, 1.0))) as f64;
            sums[0] += px[0] as f64 * weight;
            sums[1] += px[1] as f64 * weight;
            sums[2] += px[2] as f64 * weight;
            weight_total += weight;
            alpha_sum += px[3] as f64;
            count += 1;
        }
    }
    let inv = 1.0 / weight_total;
    [
        (sums[0] * inv).round() as u8,
        (sums[1] * inv).round() as u8,
        (sums[2] * inv).round() as u8,
        (alpha_sum / count as f64).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone_cell() -> Vec<u8> {
        // 8x8 cell: 49 gray pixels, 15 red pixels.
        let mut buf = Vec::with_capacity(8 * 8 * 4);
        for i in 0..64 {
            if i < 15 {
                buf.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                buf.extend_from_slice(&[128, 128, 128, 255]);
            }
        }
        buf
    }

    #[test]
    fn center_mode_picks_the_middle_pixel() {
        let buf = two_tone_cell();
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let c = sample_cell(src, 0, 8, 0, 8, SampleMode::Center, 1.0);
        assert_eq!(c, [128, 128, 128, 255]);
    }

    #[test]
    fn average_mode_blends_everything() {
        let buf = two_tone_cell();
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let c = sample_cell(src, 0, 8, 0, 8, SampleMode::Average, 1.0);
        // 15/64 red pixels drag red up and green/blue down.
        assert!(c[0] > 128 && c[1] < 128 && c[2] < 128);
        assert_eq!(c[3], 255);
    }

    #[test]
    fn weighted_mode_suppresses_the_minority_color() {
        let buf = two_tone_cell();
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let plain = sample_cell(src, 0, 8, 0, 8, SampleMode::Average, 1.0);
        let weighted = sample_cell(src, 0, 8, 0, 8, SampleMode::Weighted, 4.0);
        let gray = [128.0f32, 128.0, 128.0];
        let d = |c: [u8; 4]| {
            let dr = c[0] as f32 - gray[0];
            let dg = c[1] as f32 - gray[1];
            let db = c[2] as f32 - gray[2];
            (dr * dr + dg * dg + db * db).sqrt()
        };
        assert!(
            d(weighted) < d(plain),
            "weighted {weighted:?} should sit closer to gray than {plain:?}"
        );
    }

    #[test]
    fn weighted_ratio_of_one_matches_average() {
        let buf = two_tone_cell();
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let plain = sample_cell(src, 0, 8, 0, 8, SampleMode::Average, 1.0);
        let weighted = sample_cell(src, 0, 8, 0, 8, SampleMode::Weighted, 1.0);
        for (a, b) in plain.iter().zip(&weighted) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }
}
