//! Defines the parameters used to configure a session from the command line.
use adc_sum_aggregation::{
    AggregationMode, EdgeCounterSettings, EdgeType, FoldPolicy, SessionConfig, SessionError,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

/// Encapsulates the parameters specific to the decimation accumulator.
#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct DownsampleParameters {
    /// Number of input samples summed into each output sum.
    #[clap(long)]
    pub(crate) downsample_num: usize,
}

/// Encapsulates the parameters specific to the moving sum.
#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct MovingSumParameters {
    /// Number of most recent samples in the window.
    #[clap(long)]
    pub(crate) window_width: usize,
}

/// Locates a JSON session description.
#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct FromConfigParameters {
    /// Path to the session description. Session flags given on the command line are ignored.
    #[clap(long)]
    pub(crate) path: PathBuf,
}

/// Specifies which aggregator is to be used, and wraps the aggregator-specific options in each variant.
#[derive(Subcommand, Debug)]
pub(crate) enum Mode {
    /// Sums non-overlapping blocks of samples, emitting one sum per block.
    Downsample(DownsampleParameters),
    /// Sums the most recent samples, emitting one sum per sample once the window has filled.
    MovingSum(MovingSumParameters),
    /// Reads the whole session description from a JSON file.
    FromConfig(FromConfigParameters),
}

/// Encapsulates the parameters of the optional edge counting trigger.
#[derive(Debug, Clone, Args)]
pub(crate) struct EdgeTriggerParameters {
    /// If set, a trigger is raised when the sums cross this value.
    #[clap(long)]
    pub(crate) threshold: Option<f32>,

    /// Which crossing direction registers as an edge.
    #[clap(long, default_value = "rising-edge")]
    pub(crate) edge_type: EdgeType,

    /// After an edge registers, further crossings are ignored for this many sums.
    #[clap(long, default_value = "0")]
    pub(crate) settling_time: u8,

    /// Number of edges which make up one trigger.
    #[clap(long, default_value = "1")]
    pub(crate) edge_num: u8,
}

impl Default for EdgeTriggerParameters {
    fn default() -> Self {
        Self {
            threshold: None,
            edge_type: EdgeType::default(),
            settling_time: 0,
            edge_num: 1,
        }
    }
}

impl EdgeTriggerParameters {
    fn settings(&self) -> Option<EdgeCounterSettings> {
        self.threshold.map(|threshold| EdgeCounterSettings {
            threshold,
            edge_type: self.edge_type,
            settling_time: self.settling_time,
            edge_num: self.edge_num,
        })
    }
}

/// Names the session flags which differ from their defaults.
fn flags_set(
    absolute_value: bool,
    fold_policy: FoldPolicy,
    edge_trigger: &EdgeTriggerParameters,
) -> Vec<&'static str> {
    let defaults = EdgeTriggerParameters::default();
    [
        ("--absolute-value", absolute_value),
        ("--fold-policy", fold_policy != FoldPolicy::default()),
        ("--threshold", edge_trigger.threshold.is_some()),
        ("--edge-type", edge_trigger.edge_type != defaults.edge_type),
        (
            "--settling-time",
            edge_trigger.settling_time != defaults.settling_time,
        ),
        ("--edge-num", edge_trigger.edge_num != defaults.edge_num),
    ]
    .into_iter()
    .filter_map(|(flag, set)| set.then_some(flag))
    .collect()
}

/// Builds the session description from the selected mode and global flags.
/// # Parameters
/// - mode: the selected subcommand.
/// - absolute_value: whether samples below the midpoint are folded.
/// - fold_policy: how samples below the midpoint are folded.
/// - edge_trigger: trigger flags, ignored unless a threshold is given.
pub(crate) fn session_config(
    mode: &Mode,
    absolute_value: bool,
    fold_policy: FoldPolicy,
    edge_trigger: &EdgeTriggerParameters,
) -> Result<SessionConfig, SessionError> {
    let aggregation = match mode {
        Mode::Downsample(parameters) => AggregationMode::Downsample {
            downsample_num: parameters.downsample_num,
        },
        Mode::MovingSum(parameters) => AggregationMode::MovingSum {
            window_width: parameters.window_width,
        },
        Mode::FromConfig(parameters) => {
            let ignored = flags_set(absolute_value, fold_policy, edge_trigger);
            if !ignored.is_empty() {
                warn!(
                    "Session read from {}, ignoring {}",
                    parameters.path.display(),
                    ignored.join(", ")
                );
            }
            return SessionConfig::from_json_file(&parameters.path);
        }
    };
    Ok(SessionConfig {
        aggregation,
        absolute_value,
        fold_policy,
        edge_trigger: edge_trigger.settings(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_sum_from_flags() {
        let config = session_config(
            &Mode::MovingSum(MovingSumParameters { window_width: 4 }),
            true,
            FoldPolicy::Offset,
            &EdgeTriggerParameters::default(),
        )
        .unwrap();
        assert_eq!(
            config,
            SessionConfig {
                aggregation: AggregationMode::MovingSum { window_width: 4 },
                absolute_value: true,
                fold_policy: FoldPolicy::Offset,
                edge_trigger: None,
            }
        );
    }

    #[test]
    fn threshold_enables_trigger() {
        let trigger = EdgeTriggerParameters {
            threshold: Some(500.0),
            edge_type: EdgeType::FallingEdge,
            settling_time: 3,
            edge_num: 2,
        };
        let config = session_config(
            &Mode::Downsample(DownsampleParameters { downsample_num: 8 }),
            false,
            FoldPolicy::Reflect,
            &trigger,
        )
        .unwrap();
        assert_eq!(
            config.edge_trigger,
            Some(EdgeCounterSettings {
                threshold: 500.0,
                edge_type: EdgeType::FallingEdge,
                settling_time: 3,
                edge_num: 2,
            })
        );
    }

    #[test]
    fn default_flags_are_not_reported() {
        assert!(
            flags_set(false, FoldPolicy::Reflect, &EdgeTriggerParameters::default()).is_empty()
        );
    }

    #[test]
    fn session_file_ignores_flags() {
        let path = std::env::temp_dir().join(format!(
            "trace-to-sums-session-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{ "aggregation": { "downsample": { "downsample-num": 4 } } }"#,
        )
        .unwrap();
        let trigger = EdgeTriggerParameters {
            threshold: Some(10.0),
            edge_num: 3,
            ..EdgeTriggerParameters::default()
        };
        assert_eq!(
            flags_set(true, FoldPolicy::Offset, &trigger),
            vec!["--absolute-value", "--fold-policy", "--threshold", "--edge-num"]
        );

        let config = session_config(
            &Mode::FromConfig(FromConfigParameters { path: path.clone() }),
            true,
            FoldPolicy::Offset,
            &trigger,
        );
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            config.unwrap(),
            SessionConfig {
                aggregation: AggregationMode::Downsample { downsample_num: 4 },
                absolute_value: false,
                fold_policy: FoldPolicy::Reflect,
                edge_trigger: None,
            }
        );
    }

    #[test]
    fn missing_config_file() {
        let result = session_config(
            &Mode::FromConfig(FromConfigParameters {
                path: "/nonexistent/session.json".into(),
            }),
            false,
            FoldPolicy::Reflect,
            &EdgeTriggerParameters::default(),
        );
        assert!(matches!(result, Err(SessionError::Io { .. })));
    }
}
