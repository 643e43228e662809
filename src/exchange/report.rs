use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::models::PipelineOutcome;

/// JSON payload handed to the upload front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictionReport {
    fn prediction(text: impl Into<String>) -> Self {
        Self {
            success: true,
            prediction: Some(text.into()),
            message: None,
        }
    }

    fn failure(text: impl Into<String>) -> Self {
        Self {
            success: false,
            prediction: None,
            message: Some(text.into()),
        }
    }

    pub fn from_outcome(outcome: &PipelineOutcome) -> Self {
        match outcome {
            PipelineOutcome::Recognized(digits) => Self::prediction(digits.clone()),
            PipelineOutcome::NoDigitsFound => {
                Self::prediction("Nenhum dígito detectado na imagem.")
            }
            PipelineOutcome::Failed(detail) => Self::failure(format!("Erro no script: {detail}")),
        }
    }

    /// Transport failures are reported apart from pipeline failures: the run's
    /// real outcome is unknown.
    pub fn from_poll(result: &Result<PipelineOutcome, ExchangeError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome),
            Err(ExchangeError::Timeout { attempts, .. }) => Self::failure(format!(
                "Erro: O arquivo de resultado não pôde ser lido ou estava vazio após {attempts} tentativas."
            )),
            Err(ExchangeError::Malformed(_)) => {
                Self::failure("Formato de resultado inesperado do script.")
            }
            Err(err) => Self::failure(format!("Erro interno: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn recognized_serializes_prediction_only() -> anyhow::Result<()> {
        let report = PredictionReport::from_outcome(&PipelineOutcome::Recognized("37".into()));
        assert_eq!(
            serde_json::to_string(&report)?,
            r#"{"success":true,"prediction":"37"}"#
        );
        Ok(())
    }

    #[test]
    fn timeout_is_not_a_prediction() {
        let report = PredictionReport::from_poll(&Err(ExchangeError::Timeout {
            path: PathBuf::from("out.txt"),
            attempts: 5,
        }));
        assert!(!report.success);
        assert!(report.prediction.is_none());
        assert!(report.message.unwrap().contains("5 tentativas"));
    }

    #[test]
    fn pipeline_failure_carries_detail() {
        let report =
            PredictionReport::from_outcome(&PipelineOutcome::Failed("unreadable image: x".into()));
        assert!(!report.success);
        assert_eq!(report.message.as_deref(), Some("Erro no script: unreadable image: x"));
    }
}
