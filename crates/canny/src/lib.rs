#![deny(missing_docs)]
//! Canny edge detection on grayscale images.
//!
//! The crate chains the stages of [`canny_imgproc`] into a single call and
//! exposes them with value semantics, each stage returning a fresh image:
//!
//! ```
//! use canny::{blur, gradient, suppress, threshold};
//! use canny::image::{Image, ImageSize};
//!
//! let mut image = Image::<f32, 1>::from_size_val(ImageSize { width: 7, height: 7 }, 0.0).unwrap();
//! image.set_pixel(3, 3, 0, 1.0).unwrap();
//!
//! let blurred = blur(&image, 1.0).unwrap();
//! let (magnitude, orientation) = gradient(&blurred).unwrap();
//! let suppressed = suppress(&magnitude, &orientation).unwrap();
//! let edges = threshold(&suppressed, 0.1, 0.5).unwrap();
//!
//! assert!(edges.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
//! ```

#[doc(inline)]
pub use canny_image as image;

#[doc(inline)]
pub use canny_imgproc as imgproc;

mod config;
mod pipeline;

pub use canny_imgproc::EdgeError;
pub use config::{CannyConfig, Thresholds};
pub use pipeline::{
    auto_threshold, blur, canny, canny_with_intermediates, edges_to_mask, gradient,
    image_from_gray8, suppress, threshold, CannyOutput, CannyStages,
};
