//! Per-position and per-bucket change counters.

use super::palette::{PaletteIndex, PALETTE_LEN};
use crate::source::SIZE;

/// Linear index of `(x, y)` in the fixed grid.
#[inline]
pub fn linear(x: u32, y: u32) -> usize {
    (y as usize) * (SIZE as usize) + (x as usize)
}

/// How often each grid position changed colour.
///
/// Dense storage: positions that never changed read as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCounters {
    counts: Vec<u32>,
}

impl ChangeCounters {
    /// Creates zeroed counters for the full `SIZE`×`SIZE` grid.
    pub fn new() -> Self {
        Self {
            counts: vec![0; (SIZE as usize) * (SIZE as usize)],
        }
    }

    /// Count at a linear position.
    #[inline]
    pub fn get(&self, position: usize) -> u32 {
        self.counts[position]
    }

    /// Count at `(x, y)`.
    #[inline]
    pub fn get_xy(&self, x: u32, y: u32) -> u32 {
        self.get(linear(x, y))
    }

    /// Adds one change and returns the count before it.
    #[inline]
    pub fn increment(&mut self, position: usize) -> u32 {
        let slot = &mut self.counts[position];
        let previous = *slot;
        *slot = previous.saturating_add(1);
        previous
    }

    /// Largest count across all positions, zero if nothing changed.
    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Number of positions in the grid.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Positions that have changed at least once.
    pub fn changed(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Counts in linear order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.iter().copied()
    }

    /// Counts as a slice in linear order.
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }
}

impl Default for ChangeCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Changes attributed to each palette entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketCounters {
    counts: [u64; PALETTE_LEN],
}

impl BucketCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, index: PaletteIndex) -> u64 {
        self.counts[index.get()]
    }

    #[inline]
    pub fn record(&mut self, index: PaletteIndex) {
        self.counts[index.get()] += 1;
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterates `(index, count)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PaletteIndex, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter_map(|(i, &count)| PaletteIndex::new(i).map(|index| (index, count)))
    }
}
