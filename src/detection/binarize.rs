use image::GrayImage;
use imageproc::contrast::otsu_level;
use tracing::debug;

use crate::config::{BinarizeConfig, Polarity};
use crate::error::PipelineError;
use crate::models::BinaryMask;

/// Splits a grayscale image into ink and background.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binarizer {
    config: BinarizeConfig,
}

impl Binarizer {
    pub fn new(config: BinarizeConfig) -> Self {
        Self { config }
    }

    pub fn binarize(&self, gray: &GrayImage) -> Result<BinaryMask, PipelineError> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::UnreadableImage(format!(
                "image has zero area ({width}x{height})"
            )));
        }

        // A single tone has no second population to separate.
        let (lo, hi) = intensity_range(gray);
        if self.config.threshold.is_none() && lo == hi {
            debug!(tone = lo, "uniform image, no ink");
            return Ok(BinaryMask::from_fn(width, height, |_, _| false));
        }

        let threshold = self.config.threshold.unwrap_or_else(|| otsu_level(gray));
        let dark_ink = match self.config.polarity {
            Polarity::DarkInk => true,
            Polarity::LightInk => false,
            Polarity::Auto => {
                // Background is the majority class.
                let bright = gray.pixels().filter(|p| p[0] > threshold).count();
                bright * 2 >= width as usize * height as usize
            }
        };
        debug!(threshold, dark_ink, "binarization threshold chosen");

        Ok(BinaryMask::from_fn(width, height, |x, y| {
            let v = gray.get_pixel(x, y)[0];
            if dark_ink { v <= threshold } else { v > threshold }
        }))
    }
}

fn intensity_range(gray: &GrayImage) -> (u8, u8) {
    gray.pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])))
}
