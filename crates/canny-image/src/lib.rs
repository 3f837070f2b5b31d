#![deny(missing_docs)]
//! Image types for the edge detection pipeline.

/// image representation for edge detection purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image pixel type conversion operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
