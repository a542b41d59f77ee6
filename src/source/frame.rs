//! Frame type representing one decoded raster in the input sequence.

use image::RgbaImage;

/// Edge length of every frame in a run.
pub const SIZE: u32 = 256;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A single decoded frame.
///
/// Pixels are stored row-major as non-premultiplied RGBA8, the same
/// layout `image::RgbaImage` uses.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw RGBA samples.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Position of the frame in its source, starting at 1.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            sequence,
        }
    }

    /// Wraps a decoded RGBA image without copying its samples.
    pub fn from_rgba(image: RgbaImage, sequence: u64) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, sequence)
    }

    /// Creates a frame where every pixel has the same colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4], sequence: u64) -> Self {
        let count = (width as usize) * (height as usize);
        let pixels = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::new(pixels, width, height, sequence)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
    }

    /// Returns the four channel samples at `(x, y)`.
    ///
    /// Panics if the coordinate lies outside the frame.
    #[inline]
    pub fn channels(&self, x: u32, y: u32) -> &[u8] {
        let i = self.offset(x, y);
        &self.pixels[i..i + CHANNELS]
    }

    /// Returns the RGBA colour at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let c = self.channels(x, y);
        [c[0], c[1], c[2], c[3]]
    }

    /// Overwrites the RGBA colour at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count() * CHANNELS
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 640 * 480 * CHANNELS];
        let frame = Frame::new(pixels, 640, 480, 1);

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 640 * 480]; // one byte per pixel
        let frame = Frame::new(pixels, 640, 480, 1);

        assert!(!frame.is_valid());
    }

    #[test]
    fn test_solid_and_set_pixel() {
        let mut frame = Frame::solid(4, 3, [1, 2, 3, 255], 7);
        assert!(frame.is_valid());
        assert_eq!(frame.pixel(3, 2), [1, 2, 3, 255]);

        frame.set_pixel(2, 1, [9, 8, 7, 6]);
        assert_eq!(frame.pixel(2, 1), [9, 8, 7, 6]);
        assert_eq!(frame.channels(2, 1), &[9, 8, 7, 6]);
        assert_eq!(frame.pixel(1, 2), [1, 2, 3, 255]);
    }

    #[test]
    fn test_from_rgba_keeps_layout() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(1, 1, image::Rgba([10, 20, 30, 40]));

        let frame = Frame::from_rgba(image, 2);
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert_eq!(frame.pixel(1, 1), [10, 20, 30, 40]);
        assert_eq!(frame.offset(1, 1), (3 + 1) * CHANNELS);
    }
}
