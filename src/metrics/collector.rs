//! Metrics collection and registry.

use crate::tracking::{FrameDiffer, PALETTE_LEN};
use prometheus::{Encoder, IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of run state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames accepted by the differ.
    pub frames_processed: u64,
    /// Positions that changed at least once.
    pub changed_positions: usize,
    /// Largest per-position change count.
    pub max_changes: u32,
    /// Frame at which every position had changed, if reached.
    pub saturated_at: Option<u64>,
    /// Changes per palette entry, with the entry's `#rrggbb` label.
    pub palette_changes: Vec<(String, u64)>,
}

/// Prometheus metrics registry for a change-tracking run.
pub struct MetricsRegistry {
    registry: Registry,

    frames_processed: IntCounter,
    changed_positions: IntGauge,
    max_changes: IntGauge,
    saturated: IntGauge,
    saturation_frame: IntGauge,
    palette_changes: IntGaugeVec,
}

impl MetricsRegistry {
    /// Creates a new registry with all run metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_processed = IntCounter::new(
            "pixel_churn_frames_processed",
            "Frames accepted by the differ",
        )?;
        let changed_positions = IntGauge::new(
            "pixel_churn_changed_positions",
            "Positions that changed at least once",
        )?;
        let max_changes = IntGauge::new(
            "pixel_churn_max_changes",
            "Largest change count at any position",
        )?;
        let saturated = IntGauge::new(
            "pixel_churn_saturated",
            "Whether every position has changed (1=yes, 0=no)",
        )?;
        let saturation_frame = IntGauge::new(
            "pixel_churn_saturation_frame",
            "Frame at which every position had changed (0 if never)",
        )?;
        let palette_changes = IntGaugeVec::new(
            Opts::new(
                "pixel_churn_palette_changes",
                "Changes whose new color matched a palette entry",
            ),
            &["bucket", "color"],
        )?;

        registry.register(Box::new(frames_processed.clone()))?;
        registry.register(Box::new(changed_positions.clone()))?;
        registry.register(Box::new(max_changes.clone()))?;
        registry.register(Box::new(saturated.clone()))?;
        registry.register(Box::new(saturation_frame.clone()))?;
        registry.register(Box::new(palette_changes.clone()))?;

        Ok(Self {
            registry,
            frames_processed,
            changed_positions,
            max_changes,
            saturated,
            saturation_frame,
            palette_changes,
        })
    }

    /// Updates all metrics from a snapshot of run state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // For counters, we need to increment by the difference
        let current_frames = self.frames_processed.get();
        if snapshot.frames_processed > current_frames {
            self.frames_processed
                .inc_by(snapshot.frames_processed - current_frames);
        }

        self.changed_positions.set(snapshot.changed_positions as i64);
        self.max_changes.set(i64::from(snapshot.max_changes));
        self.saturated
            .set(if snapshot.saturated_at.is_some() { 1 } else { 0 });
        self.saturation_frame
            .set(snapshot.saturated_at.unwrap_or(0) as i64);

        for (bucket, (color, count)) in snapshot.palette_changes.iter().enumerate() {
            let bucket = bucket.to_string();
            self.palette_changes
                .with_label_values(&[bucket.as_str(), color.as_str()])
                .set(*count as i64);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the differ's current state.
    pub fn from_differ(differ: &FrameDiffer) -> Self {
        let palette = differ.palette();
        let mut palette_changes = Vec::with_capacity(PALETTE_LEN);
        for (index, count) in differ.buckets().iter() {
            palette_changes.push((format!("#{:06x}", palette.rgb(index)), count));
        }

        Self {
            frames_processed: differ.frames_processed(),
            changed_positions: differ.changed_positions(),
            max_changes: differ.changes().max(),
            saturated_at: match differ.state() {
                crate::tracking::DifferState::Saturated { frame } => Some(frame),
                _ => None,
            },
            palette_changes,
        }
    }
}
