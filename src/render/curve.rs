//! Nonlinear weighting applied to popularity before colour mapping.

use crate::source::RenderConfig;
use std::f64::consts::PI;

/// Weighting derived from the log-density of a normal distribution.
///
/// The curve only bends the colour ramp; it does not model the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightingCurve {
    mean: f64,
    std_dev: f64,
}

impl WeightingCurve {
    /// Creates a curve. `std_dev` must be finite and positive.
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Natural log of the normal probability density at `x`.
    pub fn ln_pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std_dev;
        -0.5 * z * z - self.std_dev.ln() - 0.5 * (2.0 * PI).ln()
    }

    /// `1 - ln_pdf(popularity)`.
    pub fn weight(&self, popularity: f64) -> f64 {
        1.0 - self.ln_pdf(popularity)
    }
}

impl Default for WeightingCurve {
    fn default() -> Self {
        Self::new(0.5, 3.0)
    }
}

impl From<&RenderConfig> for WeightingCurve {
    fn from(config: &RenderConfig) -> Self {
        Self::new(config.curve_mean, config.curve_std_dev)
    }
}
