//! Closed colour palette used to classify changed pixels.

use std::fmt;

/// Number of entries in the palette.
pub const PALETTE_LEN: usize = 16;

/// The sixteen known colours as 24-bit RGB, in index order.
const STANDARD_COLORS: [u32; PALETTE_LEN] = [
    0xe4e4e4, 0xea7e35, 0xbe49c9, 0x6387d2, 0xc2b51c, 0x39ba2e, 0xd98199, 0x414141,
    0xa0a7a7, 0x267191, 0x7e34bf, 0x253193, 0x56331c, 0x364b18, 0x9e2b27, 0x181414,
];

/// Stable index of a palette entry, always below [`PALETTE_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaletteIndex(u8);

impl PaletteIndex {
    /// Returns the index if it addresses a palette entry.
    pub fn new(index: usize) -> Option<Self> {
        (index < PALETTE_LEN).then(|| Self(index as u8))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PaletteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Packs an RGBA sample as `0xAARRGGBB`.
#[inline]
pub fn pack_argb(rgba: [u8; 4]) -> u32 {
    let [r, g, b, a] = rgba;
    u32::from_be_bytes([a, r, g, b])
}

/// Closed-world mapping from exact opaque colours to palette indices.
///
/// Lookup goes through a table sorted by packed ARGB value, so a colour
/// that is not listed, or is not fully opaque, is simply not found.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [u32; PALETTE_LEN],
    lookup: [(u32, PaletteIndex); PALETTE_LEN],
}

impl Palette {
    /// The fixed sixteen-colour palette.
    pub fn standard() -> Self {
        Self::from_rgb(STANDARD_COLORS)
    }

    fn from_rgb(colors: [u32; PALETTE_LEN]) -> Self {
        let mut lookup = [(0, PaletteIndex(0)); PALETTE_LEN];
        for (i, (slot, rgb)) in lookup.iter_mut().zip(colors).enumerate() {
            *slot = (0xff00_0000 | rgb, PaletteIndex(i as u8));
        }
        lookup.sort_unstable_by_key(|&(argb, _)| argb);

        Self { colors, lookup }
    }

    /// Classifies a pixel, returning `None` for colours outside the palette.
    pub fn classify(&self, rgba: [u8; 4]) -> Option<PaletteIndex> {
        let argb = pack_argb(rgba);
        self.lookup
            .binary_search_by_key(&argb, |&(key, _)| key)
            .ok()
            .map(|pos| self.lookup[pos].1)
    }

    /// Returns the opaque RGBA colour of an entry.
    pub fn color(&self, index: PaletteIndex) -> [u8; 4] {
        let [_, r, g, b] = self.colors[index.get()].to_be_bytes();
        [r, g, b, 0xff]
    }

    /// Returns the 24-bit RGB value of an entry.
    pub fn rgb(&self, index: PaletteIndex) -> u32 {
        self.colors[index.get()]
    }

    /// Iterates entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PaletteIndex, [u8; 4])> + '_ {
        (0..PALETTE_LEN).map(move |i| {
            let index = PaletteIndex(i as u8);
            (index, self.color(index))
        })
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}
