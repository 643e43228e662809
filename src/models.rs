use std::fmt;

use image::{GrayImage, Luma};

use crate::config::{InputContract, InputRange, TensorLayout};

/// Number of digit classes the classifier scores.
pub const DIGIT_CLASSES: usize = 10;

/// Foreground/background grid derived from a grayscale image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl BinaryMask {
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut ink = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                ink.push(f(x, y));
            }
        }
        Self { width, height, ink }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-bounds coordinates read as background.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.ink[self.index(x, y)]
    }

    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|&&v| v).count()
    }

    /// Render as white ink on black, the tone convention the classifier was trained on.
    pub fn to_ink_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.is_ink(x, y) { Luma([255u8]) } else { Luma([0u8]) }
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Bounding box in source-image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One connected group of ink pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Extraction label, unique within one run. Labels follow raster order
    /// of each component's first pixel.
    pub label: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
}

impl Region {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn area(&self) -> u32 {
        self.pixel_count
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            x: self.min_x,
            y: self.min_y,
            width: self.width(),
            height: self.height(),
        }
    }
}

/// Fixed-size single-digit image in the form the classifier accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDigitImage {
    pixels: GrayImage,
    contract: InputContract,
}

impl CanonicalDigitImage {
    pub(crate) fn new(pixels: GrayImage, contract: InputContract) -> Self {
        Self { pixels, contract }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw 0-255 canvas, white ink on black.
    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn contract(&self) -> InputContract {
        self.contract
    }

    /// Row-major intensities in the contract's numeric range.
    ///
    /// With a single channel, NHWC and NCHW share the same element order;
    /// only [`shape`](Self::shape) differs.
    pub fn values(&self) -> Vec<f32> {
        let scale = match self.contract.range {
            InputRange::UnitFloat => 1.0 / 255.0,
            InputRange::RawByte => 1.0,
        };
        self.pixels.as_raw().iter().map(|&v| v as f32 * scale).collect()
    }

    /// Tensor shape including the batch dimension of 1.
    pub fn shape(&self) -> [usize; 4] {
        let (w, h) = (self.width() as usize, self.height() as usize);
        match self.contract.layout {
            TensorLayout::Nhwc => [1, h, w, 1],
            TensorLayout::Nchw => [1, 1, h, w],
        }
    }
}

/// Per-class scores for one canonical image.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub scores: Vec<f32>,
}

impl ClassificationResult {
    pub fn new(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    /// Index of the highest score; ties go to the lowest index and NaN never wins.
    pub fn arg_max(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((idx, score)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// The single result of one recognition run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Recognized(String),
    NoDigitsFound,
    Failed(String),
}

pub(crate) const RECOGNIZED_PREFIX: &str = "Número Previsto: ";
pub(crate) const NO_DIGITS_LINE: &str = "Nenhum dígito detectado.";
pub(crate) const FAILED_PREFIX: &str = "Erro: ";

impl PipelineOutcome {
    /// Build a `Recognized` outcome, refusing empty digit strings.
    pub fn recognized(digits: impl Into<String>) -> Option<Self> {
        let digits = digits.into();
        (!digits.is_empty()).then_some(Self::Recognized(digits))
    }

    pub fn failed(detail: impl fmt::Display) -> Self {
        let flat = detail
            .to_string()
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self::Failed(flat)
    }

    pub fn digits(&self) -> Option<&str> {
        match self {
            Self::Recognized(digits) => Some(digits),
            _ => None,
        }
    }
}

/// The artifact line, without its trailing newline.
impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized(digits) => write!(f, "{RECOGNIZED_PREFIX}{digits}"),
            Self::NoDigitsFound => f.write_str(NO_DIGITS_LINE),
            Self::Failed(detail) => write!(f, "{FAILED_PREFIX}{detail}"),
        }
    }
}
