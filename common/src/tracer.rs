//! Tracing subscriber initialisation.
//!
//! Log output goes to stderr, as stdout is reserved for the data stream.
use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::ParseError, fmt, prelude::*};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("Global tracing subscriber already set: {0}")]
    AlreadySet(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a formatting subscriber filtered by the given directives.
/// # Parameters
/// - filter: directives in [EnvFilter] syntax, e.g. `"info,adc_sum_aggregation=trace"`.
pub fn init_tracing(filter: &str) -> Result<(), TracerError> {
    let filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}
