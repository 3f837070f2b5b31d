use canny_imgproc::{
    edges::{check_proportions, check_thresholds},
    filter::kernels::check_sigma,
    EdgeError,
};

/// How the hysteresis thresholds are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Thresholds {
    /// Fixed thresholds on the normalized edge strength.
    Manual {
        /// Weak edge threshold in `[0, 1]`.
        low: f32,
        /// Strong edge threshold in `[low, 1]`.
        high: f32,
    },
    /// Thresholds chosen so that a proportion of the pixels lie above them.
    Auto {
        /// Proportion of pixels above the low threshold, in `[0, 1]`.
        low_prop: f32,
        /// Proportion of pixels above the high threshold, at most `low_prop`.
        high_prop: f32,
    },
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds::Auto {
            low_prop: CannyConfig::DEFAULT_LOW_PROP,
            high_prop: CannyConfig::DEFAULT_HIGH_PROP,
        }
    }
}

/// Configuration of the edge detection pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CannyConfig {
    /// Standard deviation of the gaussian blur.
    pub sigma: f32,
    /// Hysteresis thresholds.
    pub thresholds: Thresholds,
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            sigma: Self::DEFAULT_SIGMA,
            thresholds: Thresholds::default(),
        }
    }
}

impl CannyConfig {
    /// Default standard deviation of the gaussian blur.
    pub const DEFAULT_SIGMA: f32 = 1.4;
    /// Default proportion of pixels above the low threshold.
    pub const DEFAULT_LOW_PROP: f32 = 0.10;
    /// Default proportion of pixels above the high threshold.
    pub const DEFAULT_HIGH_PROP: f32 = 0.05;

    /// Creates a configuration with fixed thresholds.
    pub fn manual(sigma: f32, low: f32, high: f32) -> Self {
        Self {
            sigma,
            thresholds: Thresholds::Manual { low, high },
        }
    }

    /// Creates a configuration with proportion based thresholds.
    pub fn auto(sigma: f32, low_prop: f32, high_prop: f32) -> Self {
        Self {
            sigma,
            thresholds: Thresholds::Auto {
                low_prop,
                high_prop,
            },
        }
    }

    /// Sets the standard deviation of the gaussian blur.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Uses fixed thresholds.
    pub fn with_thresholds(mut self, low: f32, high: f32) -> Self {
        self.thresholds = Thresholds::Manual { low, high };
        self
    }

    /// Uses thresholds derived from pixel proportions.
    pub fn with_proportions(mut self, low_prop: f32, high_prop: f32) -> Self {
        self.thresholds = Thresholds::Auto {
            low_prop,
            high_prop,
        };
        self
    }

    /// Checks the parameters before running the pipeline.
    ///
    /// The proportions are only range checked; their order is enforced by the
    /// thresholds they produce.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EdgeError> {
        check_sigma(self.sigma)?;
        match self.thresholds {
            Thresholds::Manual { low, high } => check_thresholds(low, high),
            Thresholds::Auto {
                low_prop,
                high_prop,
            } => check_proportions(low_prop, high_prop),
        }
    }
}
