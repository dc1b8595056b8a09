//! Parameter record configuring the pipeline stages.
//!
//! Defaults aim for AI-upscaled pixel art at common resolutions; the
//! detection thresholds are the usual first knobs to loosen when a grid is
//! missed.

use crate::error::{PipelineError, Result};
use crate::sampler::SampleMode;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters, validated once at entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineParams {
    /// Gaussian sigma applied before the Sobel gradients (> 0).
    pub sigma: f32,
    /// Enables directional enhancement of the energy map.
    pub enhance_energy: bool,
    /// When false (and enhancement is on), both factors default to 1.5.
    pub enhance_directional: bool,
    /// Horizontal enhancement factor (>= 1).
    pub enhance_horizontal: f32,
    /// Vertical enhancement factor (>= 1).
    pub enhance_vertical: f32,
    /// Known cell size; 0 enables autocorrelation detection.
    pub pixel_size: u32,
    /// Smallest candidate cell size for detection.
    pub min_size: u32,
    /// Largest candidate cell size for detection (clamped to half the
    /// smaller image side).
    pub max_size: u32,
    /// Allowed deviation around the expected line spacing, in pixels.
    pub gap_tolerance: u32,
    /// Peak threshold as a ratio of the smoothed profile maximum, in [0, 1].
    pub min_energy: f32,
    /// Box width applied to the marginal profiles (odd, >= 1).
    pub smooth: u32,
    /// Local-max window used by peak detection (odd, >= 1).
    pub window_size: u32,
    /// Run the sampler after detection.
    pub sample: bool,
    /// Cell reduction rule.
    pub sample_mode: SampleMode,
    /// Weight ratio for `weighted` sampling (>= 1).
    pub sample_weight_ratio: f32,
    /// Output tiling factor; 0 picks the cell size automatically.
    pub upscale: u32,
    /// Force 1× output regardless of `upscale`.
    pub native_res: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            enhance_energy: false,
            enhance_directional: false,
            enhance_horizontal: 1.5,
            enhance_vertical: 1.5,
            pixel_size: 0,
            min_size: 4,
            max_size: 32,
            gap_tolerance: 2,
            min_energy: 0.15,
            smooth: 3,
            window_size: 5,
            sample: true,
            sample_mode: SampleMode::Center,
            sample_weight_ratio: 2.0,
            upscale: 1,
            native_res: false,
        }
    }
}

impl PipelineParams {
    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(PipelineError::InvalidParameter(format!(
                "sigma must be positive and finite, got {}",
                self.sigma
            )));
        }
        if !(0.0..=1.0).contains(&self.min_energy) {
            return Err(PipelineError::InvalidParameter(format!(
                "min energy must lie in [0, 1], got {}",
                self.min_energy
            )));
        }
        if !(self.sample_weight_ratio >= 1.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "sample weight ratio must be >= 1, got {}",
                self.sample_weight_ratio
            )));
        }
        if self.enhance_energy && self.enhance_directional {
            for (label, factor) in [
                ("horizontal", self.enhance_horizontal),
                ("vertical", self.enhance_vertical),
            ] {
                if !(factor >= 1.0) || !factor.is_finite() {
                    return Err(PipelineError::InvalidParameter(format!(
                        "{label} enhancement factor must be >= 1, got {factor}"
                    )));
                }
            }
        }
        for (label, window) in [("smooth", self.smooth), ("window size", self.window_size)] {
            if window == 0 || window % 2 == 0 {
                return Err(PipelineError::InvalidParameter(format!(
                    "{label} must be an odd positive width, got {window}"
                )));
            }
        }
        if self.min_size == 0 || self.min_size > self.max_size {
            return Err(PipelineError::InvalidDimensions(format!(
                "pixel size search range [{}, {}] is empty",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }

    /// Enhancement factors after applying the non-directional default.
    pub(crate) fn enhancement_factors(&self) -> (f32, f32) {
        if self.enhance_directional {
            (self.enhance_horizontal, self.enhance_vertical)
        } else {
            (1.5, 1.5)
        }
    }
}
