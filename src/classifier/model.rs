use std::path::Path;

use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use tracing::info;

use super::DigitClassifier;
use crate::error::PipelineError;
use crate::models::{CanonicalDigitImage, ClassificationResult};

/// Digit classifier backed by an `.rten` model file.
///
/// The model takes one `[1, 28, 28, 1]` (or `[1, 1, 28, 28]`) f32 tensor and
/// returns ten scores. Input range and layout come from each image's contract.
pub struct RtenClassifier {
    model: Model,
}

impl RtenClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::ClassifierUnavailable(format!(
                "model not found at {}",
                path.display()
            )));
        }

        let model = Model::load_file(path).map_err(|err| {
            PipelineError::ClassifierUnavailable(format!(
                "failed to load {}: {err}",
                path.display()
            ))
        })?;
        info!(path = %path.display(), "digit model loaded");

        Ok(Self { model })
    }
}

impl DigitClassifier for RtenClassifier {
    fn classify(&self, image: &CanonicalDigitImage) -> Result<ClassificationResult, PipelineError> {
        let input = NdTensor::from_data(image.shape(), image.values());

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|err| {
                PipelineError::ClassifierUnavailable(format!("inference failed: {err}"))
            })?;
        let scores = Tensor::<f32>::try_from(output).map_err(|err| {
            PipelineError::ClassifierUnavailable(format!("unexpected model output: {err}"))
        })?;

        Ok(ClassificationResult::new(scores.iter().copied().collect()))
    }
}
