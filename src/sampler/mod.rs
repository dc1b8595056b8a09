//! Cell sampler: collapse detected (or regular) grid cells into pixels.
//!
//! Components
//! - `cell`: per-cell color reduction for the four sampling modes.
//! - `overlay`: optional cell-boundary rendering on upscaled output.
//!
//! The sampler consumes the source RGBA view plus the completed line sets
//! (or a regular step in direct mode) and produces packed RGB and RGBA
//! buffers, optionally tiled by an integer upscale factor.
mod cell;
pub mod overlay;

pub use overlay::overlay_grid;

use crate::error::{check_alloc, PipelineError, Result};
use crate::image::RgbaView;
use cell::sample_cell;
use serde::{Deserialize, Serialize};

/// How one grid cell is reduced to a single output color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// Regular-grid resampling with per-cell averaging, no detection.
    Direct,
    /// Color of the pixel at the geometric cell center.
    Center,
    /// Arithmetic mean over all cell pixels.
    Average,
    /// Distance-weighted mean that favors pixels near the plain mean.
    Weighted,
}

impl SampleMode {
    /// Integer encoding used at the external boundary.
    pub fn tag(self) -> u8 {
        match self {
            SampleMode::Direct => 0,
            SampleMode::Center => 1,
            SampleMode::Average => 2,
            SampleMode::Weighted => 3,
        }
    }

    /// Decode the external integer encoding.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SampleMode::Direct),
            1 => Some(SampleMode::Center),
            2 => Some(SampleMode::Average),
            3 => Some(SampleMode::Weighted),
            _ => None,
        }
    }
}

impl std::str::FromStr for SampleMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(SampleMode::Direct),
            "center" => Ok(SampleMode::Center),
            "average" => Ok(SampleMode::Average),
            "weighted" => Ok(SampleMode::Weighted),
            other => Err(format!(
                "Unknown sample mode '{other}'. Use direct|center|average|weighted."
            )),
        }
    }
}

/// Output bitmap of the sampler.
///
/// `width`/`height` describe the actual buffers, i.e. the cell counts
/// multiplied by `upscale_factor`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelArt {
    pub width: usize,
    pub height: usize,
    /// Packed RGB bytes, `width * height * 3`.
    #[serde(skip)]
    pub rgb: Vec<u8>,
    /// Packed RGBA bytes, `width * height * 4`.
    #[serde(skip)]
    pub rgba: Vec<u8>,
    pub upscale_factor: u32,
}

/// Sample pixel art over detected grid lines.
///
/// Consecutive entries of `all_x`/`all_y` bound the cells. Both must hold at
/// least two strictly increasing positions within the image; `upscale` tiles
/// each cell unless `native_res` forces 1×.
pub fn sample_pixel_art(
    src: RgbaView<'_>,
    all_x: &[u32],
    all_y: &[u32],
    mode: SampleMode,
    weight_ratio: f32,
    upscale: u32,
    native_res: bool,
) -> Result<PixelArt> {
    if all_x.len() < 2 {
        return Err(PipelineError::EmptyDetection { axis: "x" });
    }
    if all_y.len() < 2 {
        return Err(PipelineError::EmptyDetection { axis: "y" });
    }
    validate_weight_ratio(mode, weight_ratio)?;

    let cells_x: Vec<(usize, usize)> = cell_bounds(all_x, src.width());
    let cells_y: Vec<(usize, usize)> = cell_bounds(all_y, src.height());
    render(src, &cells_x, &cells_y, mode, weight_ratio, upscale, native_res)
}

/// Sample pixel art on a regular `target_w × target_h` grid.
///
/// Used by direct mode: cells evenly divide the image and no detection is
/// involved.
pub fn sample_pixel_art_direct(
    src: RgbaView<'_>,
    target_w: usize,
    target_h: usize,
    mode: SampleMode,
    weight_ratio: f32,
    upscale: u32,
    native_res: bool,
) -> Result<PixelArt> {
    if target_w == 0 || target_h == 0 {
        return Err(PipelineError::InvalidDimensions(format!(
            "target grid {target_w}x{target_h} must be positive"
        )));
    }
    if target_w > src.width() || target_h > src.height() {
        return Err(PipelineError::InvalidDimensions(format!(
            "target grid {target_w}x{target_h} exceeds the {}x{} source",
            src.width(),
            src.height()
        )));
    }
    validate_weight_ratio(mode, weight_ratio)?;

    let cells_x: Vec<(usize, usize)> = (0..target_w)
        .map(|i| (i * src.width() / target_w, (i + 1) * src.width() / target_w))
        .collect();
    let cells_y: Vec<(usize, usize)> = (0..target_h)
        .map(|j| (j * src.height() / target_h, (j + 1) * src.height() / target_h))
        .collect();
    render(src, &cells_x, &cells_y, mode, weight_ratio, upscale, native_res)
}

fn validate_weight_ratio(mode: SampleMode, weight_ratio: f32) -> Result<()> {
    if mode == SampleMode::Weighted && !(weight_ratio >= 1.0) {
        return Err(PipelineError::InvalidParameter(format!(
            "sample weight ratio must be >= 1, got {weight_ratio}"
        )));
    }
    Ok(())
}

/// Convert line positions to half-open cell spans with a 1-pixel minimum.
fn cell_bounds(lines: &[u32], limit: usize) -> Vec<(usize, usize)> {
    lines
        .windows(2)
        .filter_map(|w| {
            let a = (w[0] as usize).min(limit.saturating_sub(1));
            let b = (w[1] as usize).min(limit);
            if b <= a {
                // Degenerate span collapses to a single pixel.
                let b = (a + 1).min(limit);
                (b > a).then_some((a, b))
            } else {
                Some((a, b))
            }
        })
        .collect()
}

fn render(
    src: RgbaView<'_>,
    cells_x: &[(usize, usize)],
    cells_y: &[(usize, usize)],
    mode: SampleMode,
    weight_ratio: f32,
    upscale: u32,
    native_res: bool,
) -> Result<PixelArt> {
    let factor = if native_res { 1 } else { upscale.max(1) as usize };
    let out_w = cells_x.len() * factor;
    let out_h = cells_y.len() * factor;
    check_alloc(out_w as u64 * out_h as u64 * 4)?;

    let mut rgb = vec![0u8; out_w * out_h * 3];
    let mut rgba = vec![0u8; out_w * out_h * 4];

    for (j, &(y0, y1)) in cells_y.iter().enumerate() {
        for (i, &(x0, x1)) in cells_x.iter().enumerate() {
            let color = sample_cell(src, x0, x1, y0, y1, mode, weight_ratio);
            for dy in 0..factor {
                let oy = j * factor + dy;
                for dx in 0..factor {
                    let ox = i * factor + dx;
                    let p3 = (oy * out_w + ox) * 3;
                    rgb[p3..p3 + 3].copy_from_slice(&color[..3]);
                    let p4 = (oy * out_w + ox) * 4;
                    rgba[p4..p4 + 4].copy_from_slice(&color);
                }
            }
        }
    }

    Ok(PixelArt {
        width: out_w,
        height: out_h,
        rgb,
        rgba,
        upscale_factor: factor as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard_rgba(size: usize, cell: usize) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size * size * 4);
        for y in 0..size {
            for x in 0..size {
                let on = ((x / cell) + (y / cell)) % 2 == 0;
                let v = if on { 0u8 } else { 255u8 };
                buf.extend_from_slice(&[v, v, v, 255]);
            }
        }
        buf
    }

    #[test]
    fn grid_sampler_reduces_cells_to_pixels() {
        let buf = checkerboard_rgba(16, 4);
        let src = RgbaView::new(16, 16, &buf).unwrap();
        let lines: Vec<u32> = vec![0, 4, 8, 12, 16];
        let art =
            sample_pixel_art(src, &lines, &lines, SampleMode::Center, 1.0, 1, false).unwrap();
        assert_eq!((art.width, art.height), (4, 4));
        assert_eq!(&art.rgb[0..3], &[0, 0, 0]);
        assert_eq!(&art.rgb[3..6], &[255, 255, 255]);
        assert_eq!(art.rgba.len(), 4 * 4 * 4);
    }

    #[test]
    fn missing_grid_surfaces_empty_detection() {
        let buf = checkerboard_rgba(8, 2);
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let err =
            sample_pixel_art(src, &[4], &[0, 4, 8], SampleMode::Average, 1.0, 1, false)
                .unwrap_err();
        assert_eq!(err, PipelineError::EmptyDetection { axis: "x" });
    }

    #[test]
    fn upscale_tiles_each_cell() {
        let buf = checkerboard_rgba(8, 4);
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let lines: Vec<u32> = vec![0, 4, 8];
        let one_x =
            sample_pixel_art(src, &lines, &lines, SampleMode::Average, 1.0, 1, false).unwrap();
        let four_x =
            sample_pixel_art(src, &lines, &lines, SampleMode::Average, 1.0, 4, false).unwrap();
        assert_eq!((four_x.width, four_x.height), (8, 8));
        for j in 0..one_x.height {
            for i in 0..one_x.width {
                let base = (j * one_x.width + i) * 3;
                for dy in 0..4 {
                    for dx in 0..4 {
                        let up = ((j * 4 + dy) * four_x.width + i * 4 + dx) * 3;
                        assert_eq!(four_x.rgb[up..up + 3], one_x.rgb[base..base + 3]);
                    }
                }
            }
        }
    }

    #[test]
    fn native_res_overrides_upscale() {
        let buf = checkerboard_rgba(8, 4);
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let lines: Vec<u32> = vec![0, 4, 8];
        let art =
            sample_pixel_art(src, &lines, &lines, SampleMode::Average, 1.0, 6, true).unwrap();
        assert_eq!((art.width, art.height), (2, 2));
        assert_eq!(art.upscale_factor, 1);
    }

    #[test]
    fn direct_sampler_divides_evenly() {
        let buf = checkerboard_rgba(30, 10);
        let src = RgbaView::new(30, 30, &buf).unwrap();
        let art =
            sample_pixel_art_direct(src, 3, 3, SampleMode::Direct, 1.0, 1, false).unwrap();
        assert_eq!((art.width, art.height), (3, 3));
        // Constant 10x10 cells survive averaging exactly.
        assert_eq!(&art.rgb[0..3], &[0, 0, 0]);
        assert_eq!(&art.rgb[3..6], &[255, 255, 255]);
    }

    #[test]
    fn direct_sampler_rejects_oversized_targets() {
        let buf = checkerboard_rgba(8, 4);
        let src = RgbaView::new(8, 8, &buf).unwrap();
        let err =
            sample_pixel_art_direct(src, 16, 4, SampleMode::Direct, 1.0, 1, false).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDimensions(_)));
    }

    #[test]
    fn transparent_input_propagates_averaged_alpha() {
        let mut buf = checkerboard_rgba(4, 2);
        for px in buf.chunks_exact_mut(4) {
            px[3] = 128;
        }
        let src = RgbaView::new(4, 4, &buf).unwrap();
        let lines: Vec<u32> = vec![0, 2, 4];
        let art =
            sample_pixel_art(src, &lines, &lines, SampleMode::Average, 1.0, 1, false).unwrap();
        assert!(art.rgba.chunks_exact(4).all(|px| px[3] == 128));
    }
}
