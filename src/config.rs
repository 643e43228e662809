use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Which side of the threshold counts as ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    /// Treat the minority population as ink, whichever tone it is.
    #[default]
    Auto,
    /// Dark strokes on light paper.
    DarkInk,
    /// Light strokes on a dark background.
    LightInk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BinarizeConfig {
    pub polarity: Polarity,
    /// Fixed threshold; `None` computes one per image with Otsu's method.
    pub threshold: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Connectivity {
    Four,
    #[default]
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionConfig {
    pub connectivity: Connectivity,
}

/// Inclusive pixel-area band a component must fall in to count as a digit.
///
/// The defaults are calibrated for drawing canvases of a few hundred pixels
/// per side and do not transfer to other resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBand {
    pub min_area: u32,
    pub max_area: u32,
}

impl Default for AreaBand {
    fn default() -> Self {
        Self {
            min_area: 10,
            max_area: 20_000,
        }
    }
}

impl AreaBand {
    pub fn contains(&self, area: u32) -> bool {
        area >= self.min_area && area <= self.max_area
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalConfig {
    /// Side of the square canvas handed to the classifier.
    pub canvas_size: u32,
    /// Side of the box the longer region dimension is scaled to.
    pub target_size: u32,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            canvas_size: 28,
            target_size: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InputRange {
    /// f32 intensities divided by 255.
    #[default]
    UnitFloat,
    /// Raw 0-255 intensities.
    RawByte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TensorLayout {
    /// `[batch, height, width, channels]`
    #[default]
    Nhwc,
    /// `[batch, channels, height, width]`
    Nchw,
}

/// What the classifier declares it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputContract {
    pub range: InputRange,
    pub layout: TensorLayout,
}

/// Consumer-side polling budget. Only the waiting side reads it; the
/// producer never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl ExchangeConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_attempts == 0 {
            return Err(PipelineError::InvalidConfig(
                "exchange needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything one recognition run needs, passed explicitly into each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub binarize: BinarizeConfig,
    pub regions: RegionConfig,
    pub area: AreaBand,
    pub canonical: CanonicalConfig,
    pub contract: InputContract,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.area.min_area > self.area.max_area {
            return Err(PipelineError::InvalidConfig(format!(
                "min_area {} exceeds max_area {}",
                self.area.min_area, self.area.max_area
            )));
        }
        let CanonicalConfig {
            canvas_size,
            target_size,
        } = self.canonical;
        if target_size == 0 || target_size > canvas_size {
            return Err(PipelineError::InvalidConfig(format!(
                "target_size {target_size} must be between 1 and canvas_size {canvas_size}"
            )));
        }
        Ok(())
    }
}
