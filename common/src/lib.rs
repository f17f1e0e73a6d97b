//! Types, constants and observability plumbing shared by every component of the workspace.
pub mod metrics;
pub mod tracer;

use clap::Args;
use std::net::SocketAddr;

pub use git_version;

/// A single digitiser code, `W` bits wide with `W <= 16`.
pub type Sample = u16;

/// A sum of rectified samples.
///
/// Components size their maximum window or downsample factor so that this type cannot wrap.
pub type SampleSum = u32;

/// Position of a sample (or of an emitted sum) in a stream, counted from the start of the session.
pub type SampleIndex = u64;

/// Width of a digitiser code in the default deployment.
pub const SAMPLE_BITS: u32 = 10;

/// Largest window the moving-sum component is built to hold in the default deployment.
pub const MAX_WINDOW_WIDTH: usize = 128;

/// Largest downsample factor the decimation component accepts in the default deployment.
pub const MAX_DOWNSAMPLE_NUM: usize = 255;

/// Expands to the crate version, suffixed with the git description when available.
#[macro_export]
macro_rules! version {
    () => {
        $crate::git_version::git_version!(
            args = ["--tags", "--always", "--dirty=-modified"],
            fallback = "unknown"
        )
    };
}

/// Command line options common to every component.
#[derive(Clone, Debug, Args)]
pub struct CommonObservabilityOpts {
    /// If set, OpenMetrics flavour metrics are served on this endpoint
    #[clap(long, env)]
    pub observability_address: Option<SocketAddr>,

    /// Filter directives for log output, in `tracing_subscriber::EnvFilter` syntax
    #[clap(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}
