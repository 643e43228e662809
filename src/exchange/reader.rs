use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info, warn};

use super::parse_outcome;
use crate::config::ExchangeConfig;
use crate::error::ExchangeError;
use crate::models::PipelineOutcome;

/// Consumer side of the artifact handshake.
#[derive(Debug, Clone)]
pub struct ResultReader {
    path: PathBuf,
    config: ExchangeConfig,
}

impl ResultReader {
    pub fn new(path: impl Into<PathBuf>, config: ExchangeConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Poll until the artifact has content, then parse it at once.
    ///
    /// Waits `retry_delay` between attempts, up to `max_attempts` reads. A
    /// missing or empty artifact after the last attempt is a
    /// [`ExchangeError::Timeout`]: the run may still be going or may have died.
    pub fn poll(&self) -> Result<PipelineOutcome, ExchangeError> {
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.read_line() {
                Ok(Some(line)) => {
                    info!(attempt, line = %line, "result read");
                    return parse_outcome(&line);
                }
                Ok(None) => {
                    debug!(attempt, path = %self.path.display(), "artifact empty or missing");
                }
                Err(err) => {
                    warn!(attempt, error = %err, "failed to read artifact");
                }
            }
            if attempt < attempts {
                thread::sleep(self.config.retry_delay);
            }
        }

        warn!(attempts, path = %self.path.display(), "gave up waiting for result");
        Err(ExchangeError::Timeout {
            path: self.path.clone(),
            attempts,
        })
    }

    fn read_line(&self) -> std::io::Result<Option<String>> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {}
            Ok(_) => return Ok(None),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        }
        let content = fs::read_to_string(&self.path)?;
        let line = content.trim();
        Ok((!line.is_empty()).then(|| line.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn quick() -> ExchangeConfig {
        ExchangeConfig {
            max_attempts: 3,
            retry_delay: Duration::from_millis(10),
        }
    }

    #[test]
    fn reads_present_content_on_first_attempt() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "Número Previsto: 42\n")?;

        let slow = ExchangeConfig {
            max_attempts: 3,
            retry_delay: Duration::from_secs(10),
        };
        let started = Instant::now();
        let outcome = ResultReader::new(&path, slow).poll()?;
        assert_eq!(outcome, PipelineOutcome::Recognized("42".into()));
        assert!(started.elapsed() < Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn missing_artifact_times_out() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let reader = ResultReader::new(dir.path().join("never.txt"), quick());
        match reader.poll() {
            Err(ExchangeError::Timeout { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected timeout, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn whitespace_only_counts_as_empty() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "\n")?;
        assert!(matches!(
            ResultReader::new(&path, quick()).poll(),
            Err(ExchangeError::Timeout { .. })
        ));
        Ok(())
    }

    #[test]
    fn garbage_is_malformed_not_timeout() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("out.txt");
        fs::write(&path, "Formato inesperado\n")?;
        assert!(matches!(
            ResultReader::new(&path, quick()).poll(),
            Err(ExchangeError::Malformed(_))
        ));
        Ok(())
    }
}
