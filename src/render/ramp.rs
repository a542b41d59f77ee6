//! Blue → green → red colour ramp.

use image::Rgba;

/// One colour channel's worth of ramp.
const BAND: i64 = 255;

/// Top of the ramp; `slide` values are clamped into `[0, RAMP_MAX]`.
pub const RAMP_MAX: u16 = (BAND * 4) as u16;

/// Position on the ramp for a weighted popularity.
///
/// Truncates toward zero. NaN lands on zero.
pub fn slide(weight: f64, popularity: f64) -> u16 {
    let raw = (f64::from(RAMP_MAX) * weight * popularity) as i64;
    raw.clamp(0, i64::from(RAMP_MAX)) as u16
}

/// Colour at a ramp position: cold blue at 0, green at 510, hot red at 1020.
pub fn ramp_color(slide: u16) -> Rgba<u8> {
    let slide = i64::from(slide);
    let red = slide - 2 * BAND;
    let green = if slide < 2 * BAND {
        slide
    } else {
        4 * BAND - slide
    };
    let blue = 2 * BAND - slide;

    Rgba([channel(red), channel(green), channel(blue), 255])
}

#[inline]
fn channel(value: i64) -> u8 {
    value.clamp(0, BAND) as u8
}
