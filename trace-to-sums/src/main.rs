//! # Trace to Sums
//!
//! The Trace to Sums component performs the following functions:
//! * Reads digitiser samples, one decimal code per line, from a file or stdin.
//! * Rectifies each sample if configured, and aggregates it with either the decimation
//!   accumulator or the moving sum.
//! * Writes each emitted sum as a line to stdout, marking those which complete an edge trigger.
//! * Runs until the input ends or the process is interrupted, then flushes its output.
//!
mod parameters;
mod processing;

use adc_sum_aggregation::{FoldPolicy, Session};
use adc_sum_common::{
    CommonObservabilityOpts,
    metrics::{
        component_info_metric,
        names::{FAILURES, SAMPLES_RECEIVED, SUMS_EMITTED, TRIGGERS},
    },
    tracer::init_tracing,
};
use clap::Parser;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use miette::IntoDiagnostic;
use parameters::{EdgeTriggerParameters, Mode};
use std::path::PathBuf;
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter},
    select,
    signal::unix::{SignalKind, signal},
};
use tracing::{info, instrument};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = adc_sum_common::version!(), about)]
struct Cli {
    #[clap(flatten)]
    common_observability_options: CommonObservabilityOpts,

    /// File to read samples from, one per line. If not set, samples are read from stdin
    #[clap(long)]
    input: Option<PathBuf>,

    /// Fold samples below the midpoint of the sample range before aggregating
    #[clap(long)]
    absolute_value: bool,

    /// How samples below the midpoint are folded
    #[clap(long, default_value = "reflect")]
    fold_policy: FoldPolicy,

    #[clap(flatten)]
    edge_trigger: EdgeTriggerParameters,

    #[command(subcommand)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = Cli::parse();

    init_tracing(&args.common_observability_options.log_filter).into_diagnostic()?;

    // Install exporter and register metrics
    if let Some(address) = args.common_observability_options.observability_address {
        PrometheusBuilder::new()
            .with_http_listener(address)
            .install()
            .into_diagnostic()?;
    }

    describe_counter!(
        SAMPLES_RECEIVED,
        metrics::Unit::Count,
        "Number of samples received"
    );
    describe_counter!(
        SUMS_EMITTED,
        metrics::Unit::Count,
        "Number of sums emitted"
    );
    describe_counter!(
        TRIGGERS,
        metrics::Unit::Count,
        "Number of edge triggers raised"
    );
    describe_counter!(
        FAILURES,
        metrics::Unit::Count,
        "Number of failures encountered"
    );

    component_info_metric("trace-to-sums");

    let config = parameters::session_config(
        &args.mode,
        args.absolute_value,
        args.fold_policy,
        &args.edge_trigger,
    )
    .into_diagnostic()?;
    let mut session = Session::new(&config).into_diagnostic()?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).await.into_diagnostic()?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    run(&mut session, reader, &mut tokio::io::stdout()).await?;

    info!(
        "Session finished after {} samples and {} sums",
        session.samples_received(),
        session.sums_emitted()
    );
    Ok(())
}

/// Feeds every line of the reader to the session until the input ends or SIGINT is received.
///
/// Samples are processed strictly one at a time; the only wait is for the next line to arrive.
/// # Parameters
/// - session: the configured session.
/// - reader: source of sample lines.
/// - output: destination of sum lines, flushed before returning.
#[instrument(skip_all, err(level = "warn"))]
async fn run<R, W>(session: &mut Session, reader: R, output: &mut W) -> miette::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut writer = BufWriter::new(output);

    // Is used to await any sigint signals
    let mut sigint = signal(SignalKind::interrupt()).into_diagnostic()?;

    loop {
        select! {
            line = lines.next_line() => match line.into_diagnostic()? {
                Some(line) => {
                    if let Some(text) = processing::handle_line(session, &line) {
                        writer.write_all(text.as_bytes()).await.into_diagnostic()?;
                    }
                }
                None => {
                    info!("End of input");
                    break;
                }
            },
            _ = sigint.recv() => {
                info!("Interrupted, closing session");
                break;
            }
        }
    }
    writer.flush().await.into_diagnostic()
}
