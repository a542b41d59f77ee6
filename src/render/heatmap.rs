//! Rendering of the accumulated change histogram.

use super::curve::WeightingCurve;
use super::ramp::{ramp_color, slide};
use crate::source::SIZE;
use crate::tracking::ChangeCounters;
use image::{Rgba, RgbaImage};
use std::path::Path;
use thiserror::Error;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Errors that can occur while writing rendered images.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: std::path::PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The two rendered artifacts.
#[derive(Debug, Clone)]
pub struct Heatmaps {
    /// Change intensity, blue (cold) to red (hot).
    pub changes: RgbaImage,
    /// White where a position never changed, black elsewhere.
    pub unchanged: RgbaImage,
    /// Largest per-position change count.
    pub max_changes: u32,
}

impl Heatmaps {
    /// Encodes both images as PNG.
    pub fn save(
        &self,
        changes: impl AsRef<Path>,
        unchanged: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        save_png(&self.changes, changes.as_ref())?;
        save_png(&self.unchanged, unchanged.as_ref())
    }
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| RenderError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), "Wrote image");
    Ok(())
}

/// Turns change counters into a heatmap and an unchanged-mask.
///
/// Popularity is normalised against half of the maximum count (floor
/// division), so positions at or above half the peak sit at the hot end.
#[derive(Debug, Clone, Default)]
pub struct HeatmapRenderer {
    curve: WeightingCurve,
}

impl HeatmapRenderer {
    pub fn new(curve: WeightingCurve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &WeightingCurve {
        &self.curve
    }

    /// Renders both images from the final counters.
    ///
    /// When half the maximum is zero (no change at all, or a peak of one)
    /// there is nothing to normalise against: the heatmap is the cold end
    /// of the ramp everywhere, and the mask is still per position.
    pub fn render(&self, counters: &ChangeCounters) -> Heatmaps {
        let max_changes = counters.max();
        let half_max = max_changes / 2;

        tracing::info!(max_changes, half_max, "Rendering heatmaps");

        let mut changes = RgbaImage::new(SIZE, SIZE);
        let mut unchanged = RgbaImage::new(SIZE, SIZE);

        for y in 0..SIZE {
            for x in 0..SIZE {
                let curr = counters.get_xy(x, y);

                changes.put_pixel(x, y, ramp_color(self.slide(curr, half_max)));
                unchanged.put_pixel(x, y, if curr == 0 { WHITE } else { BLACK });
            }
        }

        Heatmaps {
            changes,
            unchanged,
            max_changes,
        }
    }

    /// Ramp position for a single count.
    pub fn slide(&self, curr: u32, half_max: u32) -> u16 {
        if half_max == 0 {
            return 0;
        }
        let popularity = f64::from(curr) / f64::from(half_max);
        slide(self.curve.weight(popularity), popularity)
    }
}
