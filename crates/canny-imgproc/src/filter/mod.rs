//! Filter operations
//!
//! This module provides the kernels and the border-aware correlation used to
//! smooth images and estimate their gradients.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;
