//! Typed errors shared by the pipeline and its building blocks.
//!
//! Validation errors are reported synchronously at entry with no side
//! effects; runtime errors abort the invocation and return no partial
//! buffers.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors produced by the pipeline entry points and building blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Zero width/height, a buffer whose length disagrees with the declared
    /// dimensions, or an empty search range (`min_size > max_size`).
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A parameter outside its documented domain (non-positive sigma,
    /// threshold ratio outside [0, 1], weight ratio below 1, even smoothing
    /// windows).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Peak detection produced fewer than two lines on an axis while the
    /// sampler required a grid. Retry with looser thresholds or switch to
    /// direct mode.
    #[error("grid detection produced fewer than two lines on the {axis} axis")]
    EmptyDetection {
        /// Axis label, `"x"` or `"y"`.
        axis: &'static str,
    },

    /// A requested buffer exceeds the implementation limit.
    #[error("allocation of {requested} elements exceeds the limit of {limit}")]
    AllocationFailure {
        /// Number of elements requested.
        requested: u64,
        /// Maximum number of elements a single buffer may hold.
        limit: u64,
    },
}

/// Largest element count a single pipeline buffer may hold.
pub const MAX_BUFFER_ELEMS: u64 = 1 << 28;

/// Checks an element count against [`MAX_BUFFER_ELEMS`].
pub(crate) fn check_alloc(requested: u64) -> Result<()> {
    if requested > MAX_BUFFER_ELEMS {
        return Err(PipelineError::AllocationFailure {
            requested,
            limit: MAX_BUFFER_ELEMS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_check_rejects_oversized_requests() {
        assert!(check_alloc(MAX_BUFFER_ELEMS).is_ok());
        let err = check_alloc(MAX_BUFFER_ELEMS + 1).unwrap_err();
        assert!(matches!(err, PipelineError::AllocationFailure { .. }));
    }

    #[test]
    fn errors_format_with_context() {
        let err = PipelineError::EmptyDetection { axis: "x" };
        assert!(err.to_string().contains("x axis"));
    }
}
