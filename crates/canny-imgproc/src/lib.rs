#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image basic operations module.
pub mod core;

/// edge thinning and thresholding module.
pub mod edges;

/// error types for the edge detection stages.
pub mod error;

/// image filtering module.
pub mod filter;

/// image padding module.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

pub use error::EdgeError;
