use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ExchangeError;
use crate::models::PipelineOutcome;

/// Producer side of the artifact handshake.
///
/// At most one run may target a given path at a time.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    path: PathBuf,
}

impl ResultWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave an empty artifact behind, creating it if needed.
    ///
    /// Must run before each recognition so that a crash mid-run reads as
    /// "no result yet" instead of the previous run's answer.
    pub fn clear(&self) -> Result<(), ExchangeError> {
        self.ensure_parent()?;
        File::create(&self.path)?.sync_all()?;
        debug!(path = %self.path.display(), "artifact cleared");
        Ok(())
    }

    /// Replace the artifact's content with the outcome line.
    pub fn publish(&self, outcome: &PipelineOutcome) -> Result<(), ExchangeError> {
        self.ensure_parent()?;
        let mut file = File::create(&self.path)?;
        file.write_all(format!("{outcome}\n").as_bytes())?;
        file.sync_all()?;
        info!(path = %self.path.display(), line = %outcome, "result published");
        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), ExchangeError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
