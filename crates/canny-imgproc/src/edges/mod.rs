//! Edge thinning and binarization
//!
//! The stages that turn a gradient magnitude into a binary edge map: non
//! maximum suppression and hysteresis thresholding, the latter with explicit
//! or proportion based thresholds.

mod auto_threshold;
mod hysteresis;
mod labeling;
mod non_max;

pub use auto_threshold::{auto_thresholds, check_proportions, hysteresis_threshold_auto};
pub use hysteresis::{check_thresholds, hysteresis_threshold, quantize};
pub use non_max::{non_maximum_suppression, suppress_pixel, Direction};
