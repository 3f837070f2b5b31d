use canny_image::ImageError;

/// Errors raised by the edge detection stages.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EdgeError {
    /// Error related to the image container.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// A scalar argument is outside its valid domain.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending argument.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Paired grids, or a grid and a kernel, do not have compatible shapes.
    #[error("Dimension mismatch: expected ({0}x{1}), got ({2}x{3})")]
    DimensionMismatch(usize, usize, usize, usize),

    /// The input cannot be processed, e.g. an all-zero gradient grid.
    #[error("Degenerate input: {0}")]
    DegenerateInput(&'static str),
}

impl EdgeError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        EdgeError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Check that a scalar argument lies in `[0, 1]`.
pub(crate) fn ensure_unit_interval(name: &'static str, value: f32) -> Result<(), EdgeError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EdgeError::invalid_parameter(
            name,
            format!("must be in [0, 1], got {value}"),
        ));
    }
    Ok(())
}

/// Check that a grid has the expected size.
pub(crate) fn ensure_same_size(
    expected: canny_image::ImageSize,
    actual: canny_image::ImageSize,
) -> Result<(), EdgeError> {
    if expected != actual {
        return Err(EdgeError::DimensionMismatch(
            expected.width,
            expected.height,
            actual.width,
            actual.height,
        ));
    }
    Ok(())
}
