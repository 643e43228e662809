use image::GrayImage;
use image::imageops::{self, FilterType};

use crate::config::{CanonicalConfig, InputContract};
use crate::models::{CanonicalDigitImage, Region};

/// Turns one region of the ink image into the classifier's fixed input shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer {
    config: CanonicalConfig,
    contract: InputContract,
}

impl Canonicalizer {
    pub fn new(config: CanonicalConfig, contract: InputContract) -> Self {
        Self { config, contract }
    }

    /// `ink` must be white-on-black and share coordinates with `region`.
    pub fn canonicalize(&self, ink: &GrayImage, region: &Region) -> CanonicalDigitImage {
        let bbox = region.bbox();
        let cropped = imageops::crop_imm(ink, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
        let (cropped_w, cropped_h) = cropped.dimensions();

        let (scaled_w, scaled_h) = self.scaled_dimensions(cropped_w, cropped_h);
        // CatmullRom widens its support when shrinking, so downscales are
        // area-weighted rather than aliased.
        let scaled = if (scaled_w, scaled_h) == (cropped_w, cropped_h) {
            cropped
        } else {
            imageops::resize(&cropped, scaled_w, scaled_h, FilterType::CatmullRom)
        };

        let size = self.config.canvas_size;
        let mut canvas = GrayImage::new(size, size);
        let offset_x = (size - scaled_w) / 2;
        let offset_y = (size - scaled_h) / 2;
        imageops::overlay(&mut canvas, &scaled, offset_x.into(), offset_y.into());

        CanonicalDigitImage::new(canvas, self.contract)
    }

    /// Longer side maps to `target_size`; the shorter one scales with it,
    /// rounded to the nearest pixel and never below 1.
    pub fn scaled_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let target = self.config.target_size;
        let proportional = |short: u32, long: u32| -> u32 {
            let num = u64::from(target) * u64::from(short);
            let rounded = (2 * num + u64::from(long)) / (2 * u64::from(long));
            (rounded as u32).clamp(1, target)
        };
        if width >= height {
            (target, proportional(height, width))
        } else {
            (proportional(width, height), target)
        }
    }
}
