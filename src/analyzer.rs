//! Drives a frame source through the differ and renders the result.
//!
//! The diff step is a strictly ordered fold over the source; frames are
//! pulled one at a time and never reordered.

use crate::render::{HeatmapRenderer, Heatmaps};
use crate::source::{FrameSource, SourceError};
use crate::tracking::{DiffError, FrameDiffer, Progress};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Why frame processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// The source ran out of frames.
    Exhausted,
    /// Every position had changed by `frame`; remaining frames were skipped.
    Saturated { frame: u64 },
    /// The interrupt flag was raised after `frame` frames.
    Interrupted { frame: u64 },
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub termination: Termination,
    pub frames_processed: u64,
    pub heatmaps: Heatmaps,
}

/// Owns the differ for one run.
pub struct Analyzer {
    differ: FrameDiffer,
    renderer: HeatmapRenderer,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Analyzer {
    pub fn new(renderer: HeatmapRenderer) -> Self {
        Self {
            differ: FrameDiffer::new(),
            renderer,
            interrupt: None,
        }
    }

    /// Checks `flag` between frames and stops once it is set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn differ(&self) -> &FrameDiffer {
        &self.differ
    }

    /// Feeds the whole source, then renders from whatever state was reached.
    pub fn run<S>(&mut self, source: &mut S) -> Result<AnalysisOutcome, AnalyzerError>
    where
        S: FrameSource + ?Sized,
    {
        let termination = self.feed(source)?;
        let heatmaps = self.render();

        tracing::info!(
            frames = self.differ.frames_processed(),
            changed_positions = self.differ.changed_positions(),
            max_changes = heatmaps.max_changes,
            ?termination,
            "Run finished"
        );

        Ok(AnalysisOutcome {
            termination,
            frames_processed: self.differ.frames_processed(),
            heatmaps,
        })
    }

    /// Pulls frames until the source is exhausted, the differ saturates,
    /// or the interrupt flag is raised.
    pub fn feed<S>(&mut self, source: &mut S) -> Result<Termination, AnalyzerError>
    where
        S: FrameSource + ?Sized,
    {
        loop {
            if self.interrupted() {
                let frame = self.differ.frames_processed();
                tracing::warn!(frame, "Interrupted, stopping early");
                return Ok(Termination::Interrupted { frame });
            }

            let Some(frame) = source.next_frame()? else {
                return Ok(Termination::Exhausted);
            };

            if let Progress::Saturated { frame } = self.differ.process(frame)? {
                tracing::warn!(
                    frame,
                    skipped = ?source.remaining(),
                    "Saturation reached, remaining frames skipped"
                );
                return Ok(Termination::Saturated { frame });
            }
        }
    }

    /// Renders the current counters.
    pub fn render(&self) -> Heatmaps {
        self.renderer.render(self.differ.changes())
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(HeatmapRenderer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Frame, MemorySource, SIZE};
    use image::Rgba;

    const GREY: [u8; 4] = [0xe4, 0xe4, 0xe4, 0xff];
    const ORANGE: [u8; 4] = [0xea, 0x7e, 0x35, 0xff];

    #[test]
    fn test_identical_frames_render_white_mask() {
        let mut source = MemorySource::new([
            Frame::solid(SIZE, SIZE, GREY, 1),
            Frame::solid(SIZE, SIZE, GREY, 2),
        ]);
        let mut analyzer = Analyzer::default();
        let outcome = analyzer.run(&mut source).unwrap();

        assert_eq!(outcome.termination, Termination::Exhausted);
        assert_eq!(outcome.frames_processed, 2);
        assert!(outcome
            .heatmaps
            .unchanged
            .pixels()
            .all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_saturation_skips_remaining_frames() {
        let mut source = MemorySource::new([
            Frame::solid(SIZE, SIZE, GREY, 1),
            Frame::solid(SIZE, SIZE, ORANGE, 2),
            Frame::solid(SIZE, SIZE, GREY, 3),
        ]);
        let mut analyzer = Analyzer::default();
        let outcome = analyzer.run(&mut source).unwrap();

        assert_eq!(outcome.termination, Termination::Saturated { frame: 2 });
        assert_eq!(source.remaining(), Some(1));
        assert!(outcome
            .heatmaps
            .unchanged
            .pixels()
            .all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_interrupt_stops_before_next_frame() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut source = MemorySource::new([Frame::solid(SIZE, SIZE, GREY, 1)]);
        let mut analyzer = Analyzer::default().with_interrupt(flag);

        let outcome = analyzer.run(&mut source).unwrap();
        assert_eq!(outcome.termination, Termination::Interrupted { frame: 0 });
        assert_eq!(source.remaining(), Some(1));
    }

    #[test]
    fn test_unknown_color_aborts() {
        let mut bad = Frame::solid(SIZE, SIZE, GREY, 2);
        bad.set_pixel(3, 4, [0x12, 0x34, 0x56, 0xff]);
        let mut source = MemorySource::new([Frame::solid(SIZE, SIZE, GREY, 1), bad]);

        let err = Analyzer::default().run(&mut source).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Diff(DiffError::UnknownColor { frame: 2, x: 3, y: 4, .. })
        ));
    }

    #[test]
    fn test_wrong_size_aborts() {
        let mut source = MemorySource::new([Frame::solid(64, 64, GREY, 1)]);
        let err = Analyzer::default().run(&mut source).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Diff(DiffError::DimensionMismatch { .. })
        ));
    }
}
