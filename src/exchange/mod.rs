//! Hands a run's [`PipelineOutcome`] to whoever started it.
//!
//! Across processes the medium is a one-line text artifact:
//!
//! | Outcome      | Line                          |
//! |--------------|-------------------------------|
//! | Recognized   | `Número Previsto: <digits>`   |
//! | No digits    | `Nenhum dígito detectado.`    |
//! | Failure      | `Erro: <message>`             |
//!
//! The producer ([`ResultWriter`]) empties the artifact before every run and
//! writes the whole line in one shot when the run ends. The consumer
//! ([`ResultReader`]) polls a bounded number of times for non-empty content.
//! Within one process, [`handoff`] replaces the file with a channel.

pub mod handoff;
pub mod reader;
pub mod report;
pub mod writer;

use std::str::FromStr;

pub use handoff::{PendingOutcome, spawn_recognition};
pub use reader::ResultReader;
pub use report::PredictionReport;
pub use writer::ResultWriter;

use crate::error::ExchangeError;
use crate::models::{FAILED_PREFIX, NO_DIGITS_LINE, PipelineOutcome, RECOGNIZED_PREFIX};

/// Parse one artifact line.
///
/// Markers are located anywhere in the line, so lines carrying a leading
/// `IMAGEM: '<path>' -> ` tag are accepted too. The earliest marker decides
/// the outcome; anything after it is payload, even if it looks like a marker.
pub fn parse_outcome(line: &str) -> Result<PipelineOutcome, ExchangeError> {
    let line = line.trim();
    let first = [RECOGNIZED_PREFIX, NO_DIGITS_LINE, FAILED_PREFIX]
        .into_iter()
        .filter_map(|marker| line.find(marker).map(|idx| (idx, marker)))
        .min_by_key(|&(idx, _)| idx);

    match first {
        Some((idx, RECOGNIZED_PREFIX)) => {
            let digits = line[idx + RECOGNIZED_PREFIX.len()..].trim();
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                Ok(PipelineOutcome::Recognized(digits.to_string()))
            } else {
                Err(ExchangeError::Malformed(line.to_string()))
            }
        }
        Some((_, NO_DIGITS_LINE)) => Ok(PipelineOutcome::NoDigitsFound),
        Some((idx, _)) => {
            let detail = line[idx + FAILED_PREFIX.len()..].trim();
            Ok(PipelineOutcome::Failed(detail.to_string()))
        }
        None => Err(ExchangeError::Malformed(line.to_string())),
    }
}

impl FromStr for PipelineOutcome {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_outcome(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_outcome_line() {
        for outcome in [
            PipelineOutcome::Recognized("37".into()),
            PipelineOutcome::NoDigitsFound,
            PipelineOutcome::Failed("classifier unavailable: boom".into()),
        ] {
            let line = format!("{outcome}\n");
            assert_eq!(line.parse::<PipelineOutcome>().unwrap(), outcome);
        }
    }

    #[test]
    fn accepts_image_tagged_lines() {
        assert_eq!(
            parse_outcome("IMAGEM: 'meus_digitos.png' -> Número Previsto: 105").unwrap(),
            PipelineOutcome::Recognized("105".into())
        );
        assert_eq!(
            parse_outcome("IMAGEM: 'x.png' -> Nenhum dígito detectado.").unwrap(),
            PipelineOutcome::NoDigitsFound
        );
        assert_eq!(
            parse_outcome("IMAGEM: 'x.png' -> Erro: cannot identify image").unwrap(),
            PipelineOutcome::Failed("cannot identify image".into())
        );
    }

    #[test]
    fn failure_detail_may_quote_other_markers() {
        let err = crate::error::PipelineError::UnreadableImage(
            "/tmp/Nenhum dígito detectado..png: No such file or directory".into(),
        );
        let outcome = PipelineOutcome::failed(err);
        assert_eq!(format!("{outcome}").parse::<PipelineOutcome>().unwrap(), outcome);

        assert_eq!(
            parse_outcome("Erro: bad path /x/Número Previsto: 12.png").unwrap(),
            PipelineOutcome::Failed("bad path /x/Número Previsto: 12.png".into())
        );
    }

    #[test]
    fn rejects_unknown_or_empty_digit_lines() {
        assert!(matches!(parse_outcome("hello"), Err(ExchangeError::Malformed(_))));
        assert!(matches!(
            parse_outcome("Número Previsto: "),
            Err(ExchangeError::Malformed(_))
        ));
        assert!(matches!(
            parse_outcome("Número Previsto: 3a"),
            Err(ExchangeError::Malformed(_))
        ));
    }
}
