//! Separable filtering primitives.
//!
//! Components
//! - `gaussian`: 1-D Gaussian kernels and separable convolution with
//!   clamp-to-edge borders (stable up to radius 32).
//! - `sobel`: standard 3×3 Sobel gradients with clamped borders.
//! - `smooth`: box smoothing for 1-D marginal profiles.
pub mod gaussian;
pub mod smooth;
pub mod sobel;

pub use gaussian::{convolve_separable, convolve_separable_into, gaussian_kernel_1d};
pub use smooth::box_smooth_1d;
pub use sobel::{sobel, sobel_into, SobelGradients};
