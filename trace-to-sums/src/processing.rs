//! Converts lines of input text into lines of output sums.
use adc_sum_aggregation::{InvalidSampleError, Output, Session};
use adc_sum_common::{
    Sample,
    metrics::{
        failures::{self, FailureKind},
        names::{FAILURES, SAMPLES_RECEIVED, SUMS_EMITTED, TRIGGERS},
    },
};
use metrics::counter;
use std::num::ParseIntError;
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Debug, Error)]
pub(crate) enum LineError {
    #[error("Cannot parse sample {line:?}: {source}")]
    Parse { line: String, source: ParseIntError },
    #[error(transparent)]
    Sample(#[from] InvalidSampleError),
}

impl LineError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Parse { .. } => FailureKind::UnableToParseSample,
            Self::Sample(_) => FailureKind::SampleOutOfRange,
        }
    }
}

/// Feeds the sample on one line of input to the session.
pub(crate) fn process_line(
    session: &mut Session,
    line: &str,
) -> Result<Option<Output>, LineError> {
    let line = line.trim();
    let sample: Sample = line.parse().map_err(|source| LineError::Parse {
        line: line.to_owned(),
        source,
    })?;
    Ok(session.push(sample)?)
}

/// Renders an emitted sum as one line of output, appending the trigger marker when one fired.
pub(crate) fn format_output(output: &Output) -> String {
    match output.trigger {
        Some(_) => format!("{},trigger\n", output.sum),
        None => format!("{}\n", output.sum),
    }
}

/// Processes one line, recording metrics and logging failures.
///
/// Blank lines carry no sample and are ignored without being counted. Failed lines are
/// skipped, so the session continues with the next sample.
pub(crate) fn handle_line(session: &mut Session, line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    match process_line(session, line) {
        Ok(output) => {
            counter!(SAMPLES_RECEIVED).increment(1);
            let output = output?;
            counter!(SUMS_EMITTED).increment(1);
            if let Some(trigger) = output.trigger {
                trace!("Trigger at sample {}: {trigger:?}", output.sample_index);
                counter!(TRIGGERS).increment(1);
            }
            Some(format_output(&output))
        }
        Err(e) => {
            warn!("{e}");
            counter!(FAILURES, &[failures::get_label(e.kind())]).increment(1);
            None
        }
    }
}
