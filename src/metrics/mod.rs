//! Prometheus metrics for change-tracking runs.
//!
//! The registry is filled once from the differ's final state and written
//! out in Prometheus text format, so batch runs can be scraped from a
//! file by a node exporter or diffed between runs.
//!
//! # Metrics Exposed
//!
//! - `pixel_churn_frames_processed` - Frames accepted by the differ
//! - `pixel_churn_changed_positions` - Positions that changed at least once
//! - `pixel_churn_max_changes` - Largest change count at any position
//! - `pixel_churn_saturated` - Whether every position has changed (1/0)
//! - `pixel_churn_saturation_frame` - Frame at which saturation occurred
//! - `pixel_churn_palette_changes{bucket,color}` - Changes per palette entry
//!
//! # Example
//!
//! ```no_run
//! use pixel_churn::metrics::{MetricsRegistry, MetricsSnapshot};
//! use pixel_churn::tracking::FrameDiffer;
//!
//! let differ = FrameDiffer::new();
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&MetricsSnapshot::from_differ(&differ));
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
