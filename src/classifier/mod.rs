#[cfg(feature = "rten")]
pub mod model;

use tracing::debug;

use crate::error::PipelineError;
use crate::models::{CanonicalDigitImage, ClassificationResult, DIGIT_CLASSES};

#[cfg(feature = "rten")]
pub use self::model::RtenClassifier;

/// Anything that can score a canonical digit image over the ten digit classes.
pub trait DigitClassifier {
    fn classify(&self, image: &CanonicalDigitImage) -> Result<ClassificationResult, PipelineError>;
}

impl<C: DigitClassifier + ?Sized> DigitClassifier for &C {
    fn classify(&self, image: &CanonicalDigitImage) -> Result<ClassificationResult, PipelineError> {
        (**self).classify(image)
    }
}

impl<C: DigitClassifier + ?Sized> DigitClassifier for Box<C> {
    fn classify(&self, image: &CanonicalDigitImage) -> Result<ClassificationResult, PipelineError> {
        (**self).classify(image)
    }
}

/// Classify each image in order and concatenate the winning digits.
///
/// The first failure aborts the whole sequence; no partial number is returned.
pub fn classify_sequence<C: DigitClassifier + ?Sized>(
    classifier: &C,
    digits: &[CanonicalDigitImage],
) -> Result<String, PipelineError> {
    let mut number = String::with_capacity(digits.len());
    for (position, image) in digits.iter().enumerate() {
        let result = classifier.classify(image)?;
        let digit = predicted_digit(&result, position)?;
        debug!(position, digit = %digit, "digit classified");
        number.push(digit);
    }
    Ok(number)
}

fn predicted_digit(result: &ClassificationResult, position: usize) -> Result<char, PipelineError> {
    if result.scores.len() != DIGIT_CLASSES {
        return Err(PipelineError::ClassifierUnavailable(format!(
            "expected {DIGIT_CLASSES} scores for digit {position}, got {}",
            result.scores.len()
        )));
    }
    result
        .arg_max()
        .and_then(|class| char::from_digit(class as u32, 10))
        .ok_or_else(|| {
            PipelineError::ClassifierUnavailable(format!("no usable score for digit {position}"))
        })
}
