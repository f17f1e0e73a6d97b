//! Errors raised when configuring a session or feeding it samples.
use adc_sum_common::Sample;
use std::path::PathBuf;
use thiserror::Error;

/// Raised at configuration time. A session which fails to configure never starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Downsample factor must be at least 1")]
    ZeroDownsampleNum,
    #[error("Downsample factor {value} exceeds the maximum of {max}")]
    DownsampleNumTooLarge { value: usize, max: usize },
    #[error("Window width must be at least 1")]
    ZeroWindowWidth,
    #[error("Window width {value} exceeds the buffer capacity of {max}")]
    WindowWidthTooLarge { value: usize, max: usize },
    #[error("Edge count per trigger must be at least 1")]
    ZeroEdgeNum,
    #[error("Edge trigger threshold must be finite, got {0}")]
    NonFiniteThreshold(f32),
}

/// Raised when a producer delivers a code wider than the configured sample width.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Sample {sample} is outside the range 0..={max}")]
pub struct InvalidSampleError {
    pub sample: Sample,
    pub max: Sample,
}

/// Raised while loading a session description.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cannot read session file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed session description: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
