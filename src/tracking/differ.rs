//! Change accumulation over consecutive frames.
//!
//! Each frame after the first is compared against the one before it.
//! A position counts as changed when any of its four channel samples
//! differs; it is counted at most once per frame transition.

use super::counters::{linear, BucketCounters, ChangeCounters};
use super::palette::{Palette, PaletteIndex};
use crate::source::{Frame, CHANNELS, SIZE};
use thiserror::Error;

/// Errors raised by [`FrameDiffer::process`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("frame {frame} is {width}x{height}, expected {size}x{size}", size = SIZE)]
    DimensionMismatch { frame: u64, width: u32, height: u32 },

    #[error("frame {frame} holds {actual} bytes, expected {expected}")]
    MalformedFrame {
        frame: u64,
        expected: usize,
        actual: usize,
    },

    #[error(
        "unknown color #{:02x}{:02x}{:02x}{:02x} at ({x}, {y}) in frame {frame}",
        .color[0], .color[1], .color[2], .color[3]
    )]
    UnknownColor {
        frame: u64,
        x: u32,
        y: u32,
        color: [u8; 4],
    },

    #[error("every position changed by frame {frame}; no further frames accepted")]
    Saturated { frame: u64 },
}

/// Lifecycle of the differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferState {
    /// No frame seen yet.
    AwaitingFirstFrame,
    /// At least one frame held for comparison.
    Accumulating,
    /// Every position has changed at least once. Terminal.
    Saturated { frame: u64 },
}

/// Result of feeding one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// First frame stored; nothing to compare against yet.
    Primed,
    /// Frame compared; `changed` positions differed from the previous frame.
    Compared { changed: usize },
    /// This frame made the last unchanged position change. Processing
    /// stopped at that pixel and the differ accepts no more frames.
    Saturated { frame: u64 },
}

/// Accumulates per-position change counts across a frame sequence.
#[derive(Debug)]
pub struct FrameDiffer {
    palette: Palette,
    /// Only one previous frame is ever alive; it is replaced, never merged.
    previous: Option<Frame>,
    /// Frames accepted so far.
    frame: u64,
    changes: ChangeCounters,
    buckets: BucketCounters,
    /// Positions whose counter is non-zero.
    changed_positions: usize,
    saturated_at: Option<u64>,
}

impl FrameDiffer {
    pub fn new() -> Self {
        Self::with_palette(Palette::standard())
    }

    /// Creates a differ that classifies changes against `palette`.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            palette,
            previous: None,
            frame: 0,
            changes: ChangeCounters::new(),
            buckets: BucketCounters::new(),
            changed_positions: 0,
            saturated_at: None,
        }
    }

    /// Feeds the next frame in arrival order.
    ///
    /// On error nothing is mutated: the counters, the held frame and the
    /// frame counter stay as they were before the call.
    pub fn process(&mut self, frame: Frame) -> Result<Progress, DiffError> {
        if let Some(at) = self.saturated_at {
            return Err(DiffError::Saturated { frame: at });
        }

        let number = self.frame + 1;
        check_shape(&frame, number)?;

        let Some(previous) = self.previous.as_ref() else {
            self.previous = Some(frame);
            self.frame = number;
            tracing::debug!(frame = number, "Differ primed");
            return Ok(Progress::Primed);
        };

        let transitions = self.transitions(previous, &frame, number)?;
        let changed = transitions.len();

        for (position, bucket) in transitions {
            self.buckets.record(bucket);

            if self.changes.increment(position) == 0 {
                self.changed_positions += 1;

                if self.changed_positions == self.changes.len() {
                    self.frame = number;
                    self.saturated_at = Some(number);
                    tracing::info!(frame = number, "Every position has changed");
                    return Ok(Progress::Saturated { frame: number });
                }
            }
        }

        self.previous = Some(frame);
        self.frame = number;

        tracing::debug!(
            frame = number,
            changed,
            changed_positions = self.changed_positions,
            "Frame compared"
        );

        Ok(Progress::Compared { changed })
    }

    /// Lists changed positions with the palette entry of their new colour.
    ///
    /// Scans column by column. Fails on the first changed pixel whose new
    /// colour is outside the palette.
    fn transitions(
        &self,
        previous: &Frame,
        current: &Frame,
        number: u64,
    ) -> Result<Vec<(usize, PaletteIndex)>, DiffError> {
        let mut transitions = Vec::new();

        for x in 0..SIZE {
            for y in 0..SIZE {
                let before = previous.channels(x, y);
                let after = current.channels(x, y);

                // First differing channel decides; the rest are not inspected.
                if !before.iter().zip(after).any(|(a, b)| a != b) {
                    continue;
                }

                let color = current.pixel(x, y);
                let bucket = self
                    .palette
                    .classify(color)
                    .ok_or_else(|| DiffError::UnknownColor {
                        frame: number,
                        x,
                        y,
                        color,
                    })?;

                transitions.push((linear(x, y), bucket));
            }
        }

        Ok(transitions)
    }

    pub fn state(&self) -> DifferState {
        match (self.saturated_at, &self.previous) {
            (Some(frame), _) => DifferState::Saturated { frame },
            (None, Some(_)) => DifferState::Accumulating,
            (None, None) => DifferState::AwaitingFirstFrame,
        }
    }

    /// Frames accepted so far, including the first one.
    pub fn frames_processed(&self) -> u64 {
        self.frame
    }

    pub fn changes(&self) -> &ChangeCounters {
        &self.changes
    }

    pub fn buckets(&self) -> &BucketCounters {
        &self.buckets
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Positions that have changed at least once.
    pub fn changed_positions(&self) -> usize {
        self.changed_positions
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated_at.is_some()
    }

    /// Drops all accumulated state, keeping the palette.
    pub fn reset(&mut self) {
        *self = Self::with_palette(self.palette.clone());
        tracing::info!("Differ reset");
    }
}

impl Default for FrameDiffer {
    fn default() -> Self {
        Self::new()
    }
}

fn check_shape(frame: &Frame, number: u64) -> Result<(), DiffError> {
    if frame.width() != SIZE || frame.height() != SIZE {
        return Err(DiffError::DimensionMismatch {
            frame: number,
            width: frame.width(),
            height: frame.height(),
        });
    }
    if !frame.is_valid() {
        return Err(DiffError::MalformedFrame {
            frame: number,
            expected: frame.pixel_count() * CHANNELS,
            actual: frame.pixels().len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [u8; 4] = [0xe4, 0xe4, 0xe4, 0xff];
    const ORANGE: [u8; 4] = [0xea, 0x7e, 0x35, 0xff];

    fn base(sequence: u64) -> Frame {
        Frame::solid(SIZE, SIZE, BASE, sequence)
    }

    #[test]
    fn test_first_frame_primes() {
        let mut differ = FrameDiffer::new();
        assert_eq!(differ.state(), DifferState::AwaitingFirstFrame);

        assert_eq!(differ.process(base(1)), Ok(Progress::Primed));
        assert_eq!(differ.state(), DifferState::Accumulating);
        assert_eq!(differ.frames_processed(), 1);
        assert_eq!(differ.changes().max(), 0);
    }

    #[test]
    fn test_identical_frames_change_nothing() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        assert_eq!(
            differ.process(base(2)),
            Ok(Progress::Compared { changed: 0 })
        );
        assert!(differ.changes().iter().all(|c| c == 0));
        assert_eq!(differ.buckets().total(), 0);
        assert_eq!(differ.frames_processed(), 2);
    }

    #[test]
    fn test_single_pixel_change() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        let mut next = base(2);
        next.set_pixel(10, 10, ORANGE);
        assert_eq!(differ.process(next), Ok(Progress::Compared { changed: 1 }));

        let changes = differ.changes();
        assert_eq!(changes.get(10 * 256 + 10), 1);
        assert_eq!(changes.iter().sum::<u32>(), 1);

        let orange = PaletteIndex::new(1).unwrap();
        assert_eq!(differ.buckets().get(orange), 1);
        assert_eq!(differ.buckets().total(), 1);
        assert_eq!(differ.changed_positions(), 1);
    }

    #[test]
    fn test_change_back_counts_again() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        let mut changed = base(2);
        changed.set_pixel(0, 5, ORANGE);
        differ.process(changed).unwrap();
        differ.process(base(3)).unwrap();

        assert_eq!(differ.changes().get_xy(0, 5), 2);
        assert_eq!(differ.changed_positions(), 1);
        let grey = PaletteIndex::new(0).unwrap();
        assert_eq!(differ.buckets().get(grey), 1);
    }

    #[test]
    fn test_alpha_only_change_is_unknown_color() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        let mut next = base(2);
        next.set_pixel(1, 2, [0xe4, 0xe4, 0xe4, 0x00]);
        assert_eq!(
            differ.process(next),
            Err(DiffError::UnknownColor {
                frame: 2,
                x: 1,
                y: 2,
                color: [0xe4, 0xe4, 0xe4, 0x00],
            })
        );
    }

    #[test]
    fn test_unknown_color_mutates_nothing() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        let mut next = base(2);
        next.set_pixel(0, 0, ORANGE);
        next.set_pixel(7, 7, [0x12, 0x34, 0x56, 0xff]);

        let err = differ.process(next).unwrap_err();
        assert!(matches!(err, DiffError::UnknownColor { frame: 2, x: 7, y: 7, .. }));
        assert_eq!(err.to_string(), "unknown color #123456ff at (7, 7) in frame 2");

        assert_eq!(differ.changes().max(), 0);
        assert_eq!(differ.buckets().total(), 0);
        assert_eq!(differ.frames_processed(), 1);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut differ = FrameDiffer::new();
        let err = differ
            .process(Frame::solid(128, 256, BASE, 1))
            .unwrap_err();

        assert_eq!(
            err,
            DiffError::DimensionMismatch {
                frame: 1,
                width: 128,
                height: 256
            }
        );
        assert_eq!(differ.state(), DifferState::AwaitingFirstFrame);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut differ = FrameDiffer::new();
        let frame = Frame::new(vec![0; 16], SIZE, SIZE, 1);
        assert!(matches!(
            differ.process(frame),
            Err(DiffError::MalformedFrame { actual: 16, .. })
        ));
    }

    #[test]
    fn test_saturation_fires_once() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        let mut almost = Frame::solid(SIZE, SIZE, ORANGE, 2);
        almost.set_pixel(200, 100, BASE);
        assert_eq!(
            differ.process(almost),
            Ok(Progress::Compared {
                changed: 65535
            })
        );
        assert!(!differ.is_saturated());

        let full = Frame::solid(SIZE, SIZE, ORANGE, 3);
        assert_eq!(differ.process(full), Ok(Progress::Saturated { frame: 3 }));
        assert_eq!(differ.state(), DifferState::Saturated { frame: 3 });
        assert_eq!(differ.changed_positions(), 65536);
        assert_eq!(differ.frames_processed(), 3);

        assert_eq!(
            differ.process(base(4)),
            Err(DiffError::Saturated { frame: 3 })
        );
        assert_eq!(differ.frames_processed(), 3);
    }

    #[test]
    fn test_saturation_stops_mid_frame() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();

        // Column-major scan: (0, 0) is visited first, (255, 255) last.
        let mut almost = Frame::solid(SIZE, SIZE, ORANGE, 2);
        almost.set_pixel(0, 0, BASE);
        differ.process(almost).unwrap();

        // Changes (0, 0) for the first time and flips everything else back.
        let mut last = base(3);
        last.set_pixel(0, 0, ORANGE);
        assert_eq!(differ.process(last), Ok(Progress::Saturated { frame: 3 }));

        assert_eq!(differ.changes().get_xy(0, 0), 1);
        assert_eq!(differ.changes().get_xy(255, 255), 1);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut differ = FrameDiffer::new();
        differ.process(base(1)).unwrap();
        let mut next = base(2);
        next.set_pixel(3, 3, ORANGE);
        differ.process(next).unwrap();

        differ.reset();
        assert_eq!(differ.state(), DifferState::AwaitingFirstFrame);
        assert_eq!(differ.frames_processed(), 0);
        assert_eq!(differ.changes().max(), 0);
    }
}
