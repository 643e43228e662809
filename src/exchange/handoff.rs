use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::classifier::DigitClassifier;
use crate::error::ExchangeError;
use crate::models::PipelineOutcome;
use crate::pipeline::DigitPipeline;

/// An outcome being computed on a worker thread.
///
/// Giving up on it does not stop the worker; its late result is dropped.
pub struct PendingOutcome {
    receiver: Receiver<PipelineOutcome>,
}

impl PendingOutcome {
    pub fn wait(self, timeout: Duration) -> Result<PipelineOutcome, ExchangeError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Ok(outcome),
            Err(RecvTimeoutError::Timeout) => Err(ExchangeError::Elapsed(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(ExchangeError::Disconnected),
        }
    }
}

/// Run one recognition on its own thread, for callers in the same process.
pub fn spawn_recognition<C>(
    pipeline: DigitPipeline,
    classifier: C,
    image_path: impl Into<PathBuf>,
) -> PendingOutcome
where
    C: DigitClassifier + Send + 'static,
{
    let image_path = image_path.into();
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let outcome = pipeline.recognize_file(&image_path, &classifier);
        if sender.send(outcome).is_err() {
            debug!(path = %image_path.display(), "caller stopped waiting, outcome dropped");
        }
    });

    PendingOutcome { receiver }
}
