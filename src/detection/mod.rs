pub mod binarize;
pub mod canonical;
pub mod filter;
pub mod regions;

use image::GrayImage;
use tracing::{debug, info};

pub use binarize::Binarizer;
pub use canonical::Canonicalizer;
pub use filter::RegionFilter;
pub use regions::RegionExtractor;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::models::{BinaryMask, CanonicalDigitImage, Region};

/// Everything segmentation produced for one image, in left-to-right order.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub mask: BinaryMask,
    pub regions: Vec<Region>,
    pub digits: Vec<CanonicalDigitImage>,
}

/// Binarize, label, filter, order and canonicalize, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    binarizer: Binarizer,
    extractor: RegionExtractor,
    filter: RegionFilter,
    canonicalizer: Canonicalizer,
}

impl Segmenter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            binarizer: Binarizer::new(config.binarize),
            extractor: RegionExtractor::new(config.regions),
            filter: RegionFilter::new(config.area),
            canonicalizer: Canonicalizer::new(config.canonical, config.contract),
        }
    }

    pub fn segment(&self, gray: &GrayImage) -> Result<Segmentation, PipelineError> {
        let mask = self.binarizer.binarize(gray)?;
        debug!(ink_pixels = mask.ink_count(), "mask ready");

        let all_regions = self.extractor.extract(&mask);
        let found = all_regions.len();
        for region in all_regions.iter().take(10) {
            debug!(
                label = region.label,
                x = region.min_x,
                y = region.min_y,
                width = region.width(),
                height = region.height(),
                area = region.area(),
                "component"
            );
        }

        let regions = self.filter.filter_and_order(all_regions);
        info!(found, kept = regions.len(), "components filtered");

        let ink = mask.to_ink_image();
        let digits = regions
            .iter()
            .map(|region| self.canonicalizer.canonicalize(&ink, region))
            .collect();

        Ok(Segmentation {
            mask,
            regions,
            digits,
        })
    }
}
