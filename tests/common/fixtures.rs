use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use digitseq::models::DIGIT_CLASSES;
use digitseq::{CanonicalDigitImage, ClassificationResult, DigitClassifier, PipelineError};
use image::{GrayImage, Luma};
use tempfile::NamedTempFile;

/// Ink rectangle as (x, y, width, height).
pub type Blob = (u32, u32, u32, u32);

/// White paper with solid black rectangles drawn on it.
pub fn paper_with_blobs(width: u32, height: u32, blobs: &[Blob]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let inked = blobs
            .iter()
            .any(|&(bx, by, bw, bh)| x >= bx && x < bx + bw && y >= by && y < by + bh);
        if inked { Luma([0u8]) } else { Luma([255u8]) }
    })
}

/// Saves the image as a temporary PNG that is removed on drop.
pub fn save_png(img: &GrayImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

pub fn one_hot(class: usize) -> ClassificationResult {
    let mut scores = vec![0.01; DIGIT_CLASSES];
    scores[class] = 0.91;
    ClassificationResult::new(scores)
}

/// Answers with `classes` in call order and can be told to fail on one call.
pub struct ScriptedClassifier {
    classes: Vec<usize>,
    fail_at: Option<usize>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(classes: &[usize]) -> Self {
        Self {
            classes: classes.to_vec(),
            fail_at: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DigitClassifier for ScriptedClassifier {
    fn classify(
        &self,
        _image: &CanonicalDigitImage,
    ) -> Result<ClassificationResult, PipelineError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail_at == Some(call) {
            return Err(PipelineError::ClassifierUnavailable("stub offline".to_string()));
        }
        Ok(one_hot(self.classes[call % self.classes.len()]))
    }
}

/// Dies in the middle of a run, the way a killed process would.
pub struct PanickingClassifier;

impl DigitClassifier for PanickingClassifier {
    fn classify(
        &self,
        _image: &CanonicalDigitImage,
    ) -> Result<ClassificationResult, PipelineError> {
        panic!("classifier crashed");
    }
}

/// Says 7 for content wider than tall and 1 otherwise, so answers depend on
/// which image is shown rather than on call order.
pub struct ShapeClassifier;

impl DigitClassifier for ShapeClassifier {
    fn classify(&self, image: &CanonicalDigitImage) -> Result<ClassificationResult, PipelineError> {
        let (w, h) = content_size(image.pixels()).unwrap_or((0, 0));
        Ok(one_hot(if w > h { 7 } else { 1 }))
    }
}

/// Width and height of the non-black content of a canvas.
pub fn content_size(img: &GrayImage) -> Option<(u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in img.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x1 - x0 + 1, y1 - y0 + 1))
}
