//! Heatmap and unchanged-mask rendering.
//!
//! Runs once, after the last frame, reading the final counters.

mod curve;
mod heatmap;
mod ramp;

pub use curve::WeightingCurve;
pub use heatmap::{HeatmapRenderer, Heatmaps, RenderError};
pub use ramp::{ramp_color, slide, RAMP_MAX};
