//! Pipeline orchestrating grid recovery end to end.
//!
//! The stages form a straight-line compute graph evaluated per invocation:
//! grayscale → gradient energy → optional directional enhancement →
//! 8-bit heatmap → cell-size estimation → per-axis line detection →
//! interpolation → border completion → cell sampling. Direct mode bypasses
//! detection entirely and resamples on a regular grid.
//!
//! Every invocation is a pure function of `(image, params)`: scratch
//! buffers are sized once at entry, owned by the invocation, and released
//! on return.
//!
//! Typical usage:
//! ```no_run
//! use pixel_grid::{run_pipeline, PipelineParams};
//! use pixel_grid::image::RgbaView;
//!
//! # fn example(rgba: &[u8]) {
//! let image = RgbaView::new(64, 64, rgba).expect("valid buffer");
//! let result = run_pipeline(image, &PipelineParams::default()).expect("pipeline");
//! println!("cell size: {}", result.detected_pixel_size);
//! # }
//! ```

pub mod params;

pub use params::PipelineParams;

use crate::diagnostics::{StageObserver, StageTiming, TimingBreakdown};
use crate::energy::{
    enhance_energy_directional, grad_energy_into, rgba_to_gray01_into, to_heatmap_u8_into,
    EnergyScratch,
};
use crate::error::{PipelineError, Result};
use crate::grid::{
    complete_edges, detect_grid_lines, detect_pixel_size, interpolate_lines, regular_grid,
};
use crate::image::{ImageF32, ImageU8, RgbaView};
use crate::sampler::{sample_pixel_art, sample_pixel_art_direct, PixelArt, SampleMode};
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Cell size assumed when direct mode is requested without one.
const DIRECT_DEFAULT_PIXEL_SIZE: u32 = 8;

/// Everything one invocation produces.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Echo of the input width.
    pub width: usize,
    /// Echo of the input height.
    pub height: usize,
    /// Cell size used downstream, detected or supplied.
    pub detected_pixel_size: u32,
    /// Quantized energy heatmap (all zeros in direct mode).
    #[serde(skip)]
    pub energy_u8: ImageU8,
    /// Raw x-axis detections (empty in direct mode).
    pub x_lines: Vec<u32>,
    /// Raw y-axis detections (empty in direct mode).
    pub y_lines: Vec<u32>,
    /// X lines after interpolation and border completion.
    pub all_x_lines: Vec<u32>,
    /// Y lines after interpolation and border completion.
    pub all_y_lines: Vec<u32>,
    /// Sampler output when sampling was requested.
    pub pixel_art: Option<PixelArt>,
    /// Per-stage timing trace.
    pub timing: TimingBreakdown,
}

/// Run the full pipeline without an observer.
pub fn run_pipeline(image: RgbaView<'_>, params: &PipelineParams) -> Result<PipelineResult> {
    run_pipeline_observed(image, params, None)
}

/// Run the full pipeline, reporting per-stage timings to an optional
/// observer between stages.
pub fn run_pipeline_observed(
    image: RgbaView<'_>,
    params: &PipelineParams,
    mut observer: Option<StageObserver<'_>>,
) -> Result<PipelineResult> {
    params.validate()?;
    let total_start = Instant::now();
    let mut timing = TimingBreakdown::default();

    let mut result = if params.sample_mode == SampleMode::Direct {
        run_direct(image, params, &mut timing, &mut observer)?
    } else {
        run_detected(image, params, &mut timing, &mut observer)?
    };

    timing.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    result.timing = timing;
    Ok(result)
}

/// Direct-mode contract: no detection, zero heatmap, regular grid.
fn run_direct(
    image: RgbaView<'_>,
    params: &PipelineParams,
    timing: &mut TimingBreakdown,
    observer: &mut Option<StageObserver<'_>>,
) -> Result<PipelineResult> {
    let (w, h) = (image.width(), image.height());
    let pixel_size = if params.pixel_size == 0 {
        DIRECT_DEFAULT_PIXEL_SIZE
    } else {
        params.pixel_size
    };
    let target_w = w / pixel_size as usize;
    let target_h = h / pixel_size as usize;

    let pixel_art = if params.sample {
        let stage_start = Instant::now();
        let art = sample_pixel_art_direct(
            image,
            target_w,
            target_h,
            params.sample_mode,
            params.sample_weight_ratio,
            resolve_upscale(params, pixel_size),
            params.native_res,
        )?;
        record_stage(timing, observer, "sample", stage_start);
        Some(art)
    } else {
        None
    };

    Ok(PipelineResult {
        width: w,
        height: h,
        detected_pixel_size: pixel_size,
        energy_u8: ImageU8::new(w, h),
        x_lines: Vec::new(),
        y_lines: Vec::new(),
        all_x_lines: Vec::new(),
        all_y_lines: Vec::new(),
        pixel_art,
        timing: TimingBreakdown::default(),
    })
}

/// Detection path: the full energy → heatmap → lines → sampler graph.
fn run_detected(
    image: RgbaView<'_>,
    params: &PipelineParams,
    timing: &mut TimingBreakdown,
    observer: &mut Option<StageObserver<'_>>,
) -> Result<PipelineResult> {
    let (w, h) = (image.width(), image.height());

    // All scratch is sized here, once.
    let mut gray = ImageF32::new(w, h);
    let mut energy = ImageF32::new(w, h);
    let mut scratch = EnergyScratch::new(w, h);
    let mut heatmap = ImageU8::new(w, h);

    let stage_start = Instant::now();
    rgba_to_gray01_into(image, &mut gray);
    record_stage(timing, observer, "grayscale", stage_start);

    let stage_start = Instant::now();
    grad_energy_into(&gray, params.sigma, &mut scratch, &mut energy);
    record_stage(timing, observer, "energy", stage_start);

    if params.enhance_energy {
        let stage_start = Instant::now();
        let (h_factor, v_factor) = params.enhancement_factors();
        energy = enhance_energy_directional(&energy, h_factor, v_factor);
        record_stage(timing, observer, "enhance", stage_start);
    }

    let stage_start = Instant::now();
    to_heatmap_u8_into(&energy, &mut heatmap);
    record_stage(timing, observer, "quantize", stage_start);

    let pixel_size = if params.pixel_size > 0 {
        params.pixel_size
    } else {
        let stage_start = Instant::now();
        let cap = (w.min(h) / 2) as u32;
        let max_size = params.max_size.min(cap);
        if params.min_size > max_size {
            return Err(PipelineError::InvalidDimensions(format!(
                "pixel size search range [{}, {max_size}] is empty for a {w}x{h} image",
                params.min_size
            )));
        }
        let detected = detect_pixel_size(&heatmap, params.min_size, max_size)?;
        record_stage(timing, observer, "pixel-size", stage_start);
        detected
    };

    let stage_start = Instant::now();
    let lines = detect_grid_lines(
        &heatmap,
        pixel_size,
        params.gap_tolerance,
        params.min_energy,
        params.smooth,
        params.window_size,
    );
    record_stage(timing, observer, "grid-lines", stage_start);

    let stage_start = Instant::now();
    let all_x = assemble_axis(&lines.x_lines, w as u32, pixel_size, params);
    let all_y = assemble_axis(&lines.y_lines, h as u32, pixel_size, params);
    record_stage(timing, observer, "complete", stage_start);
    debug!(
        "completed grid: {}x{} cells",
        all_x.len().saturating_sub(1),
        all_y.len().saturating_sub(1)
    );

    let pixel_art = if params.sample {
        require_grid(&lines.x_lines, &all_x, params, "x")?;
        require_grid(&lines.y_lines, &all_y, params, "y")?;
        let stage_start = Instant::now();
        let art = sample_pixel_art(
            image,
            &all_x,
            &all_y,
            params.sample_mode,
            params.sample_weight_ratio,
            resolve_upscale(params, pixel_size),
            params.native_res,
        )?;
        record_stage(timing, observer, "sample", stage_start);
        Some(art)
    } else {
        None
    };

    Ok(PipelineResult {
        width: w,
        height: h,
        detected_pixel_size: pixel_size,
        energy_u8: heatmap,
        x_lines: lines.x_lines,
        y_lines: lines.y_lines,
        all_x_lines: all_x,
        all_y_lines: all_y,
        pixel_art,
        timing: TimingBreakdown::default(),
    })
}

/// Interpolate and complete one axis.
///
/// A caller-supplied cell size is trusted: when detection finds nothing the
/// axis falls back to the full regular grid. Auto-detected sizes leave the
/// axis empty instead, so the sampler can surface the failure.
fn assemble_axis(detected: &[u32], limit: u32, cell_size: u32, params: &PipelineParams) -> Vec<u32> {
    if detected.is_empty() {
        if params.pixel_size > 0 {
            return regular_grid(limit, cell_size);
        }
        return Vec::new();
    }
    let interpolated = interpolate_lines(detected, limit, cell_size);
    complete_edges(&interpolated, limit, cell_size, params.gap_tolerance)
}

/// Gate the sampler on a usable grid for one axis.
fn require_grid(
    detected: &[u32],
    completed: &[u32],
    params: &PipelineParams,
    axis: &'static str,
) -> Result<()> {
    if completed.len() >= 2 && (detected.len() >= 2 || params.pixel_size > 0) {
        return Ok(());
    }
    Err(PipelineError::EmptyDetection { axis })
}

fn resolve_upscale(params: &PipelineParams, pixel_size: u32) -> u32 {
    if params.upscale == 0 {
        pixel_size
    } else {
        params.upscale
    }
}

fn record_stage(
    timing: &mut TimingBreakdown,
    observer: &mut Option<StageObserver<'_>>,
    label: &str,
    start: Instant,
) {
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let stage = StageTiming::new(label, elapsed_ms);
    if let Some(callback) = observer.as_mut() {
        callback(&stage);
    }
    timing.stages.push(stage);
}
