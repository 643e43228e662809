mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from digitseq for tests
pub use digitseq::config::{AreaBand, ExchangeConfig, PipelineConfig};
pub use digitseq::{DigitPipeline, ExchangeError, PipelineOutcome, ResultReader, ResultWriter};
