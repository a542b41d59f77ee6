//! Change tracking across consecutive frames.
//!
//! This module turns an ordered frame sequence into a per-position
//! change histogram. Changed pixels are also bucketed by their new
//! colour against a closed palette; those bucket counts are diagnostic
//! only and never feed the rendered output.

mod counters;
mod differ;
mod palette;

pub use counters::{linear, BucketCounters, ChangeCounters};
pub use differ::{DiffError, DifferState, FrameDiffer, Progress};
pub use palette::{pack_argb, Palette, PaletteIndex, PALETTE_LEN};
