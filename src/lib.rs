pub mod classifier;
pub mod config;
pub mod detection;
pub mod error;
pub mod exchange;
pub mod models;
pub mod pipeline;

pub use classifier::{DigitClassifier, classify_sequence};
pub use config::PipelineConfig;
pub use detection::{Segmentation, Segmenter};
pub use error::{ExchangeError, PipelineError};
pub use exchange::{PredictionReport, ResultReader, ResultWriter};
pub use models::{
    BinaryMask, BoundingBox, CanonicalDigitImage, ClassificationResult, PipelineOutcome, Region,
};
pub use pipeline::{DebugConfig, DigitPipeline, load_image, produce};

#[cfg(feature = "rten")]
pub use classifier::RtenClassifier;
