//! Session configuration, and the pipeline it builds for the default deployment.
//!
//! A session description can be supplied as JSON:
//! ```json
//! {
//!     "aggregation": { "moving-sum": { "window-width": 32 } },
//!     "absolute-value": true,
//!     "fold-policy": "reflect",
//!     "edge-trigger": { "threshold": 20000.0, "edge-type": "rising-edge", "edge-num": 2 }
//! }
//! ```
use crate::{
    aggregator::Aggregator,
    decimation::DecimationAccumulator,
    edge_counter::{EdgeCounter, EdgeCounterSettings, Trigger},
    error::{ConfigurationError, InvalidSampleError, SessionError},
    moving_sum::SlidingWindowSummer,
    rectifier::{FoldPolicy, Rectifier},
};
use adc_sum_common::{
    MAX_DOWNSAMPLE_NUM, MAX_WINDOW_WIDTH, SAMPLE_BITS, Sample, SampleIndex, SampleSum,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};

pub type DefaultRectifier = Rectifier<SAMPLE_BITS>;
pub type DefaultDecimator = DecimationAccumulator<SAMPLE_BITS, MAX_DOWNSAMPLE_NUM>;
pub type DefaultSummer = SlidingWindowSummer<SAMPLE_BITS, MAX_WINDOW_WIDTH>;

/// Selects the aggregator of a session, and wraps its parameter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// Emit one sum per `downsample_num` samples.
    #[serde(rename_all = "kebab-case")]
    Downsample { downsample_num: usize },
    /// Emit the sum of the last `window_width` samples on every sample.
    #[serde(rename_all = "kebab-case")]
    MovingSum { window_width: usize },
}

/// Everything needed to start a session. Stable for the duration of the session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SessionConfig {
    pub aggregation: AggregationMode,
    #[serde(default)]
    pub absolute_value: bool,
    #[serde(default)]
    pub fold_policy: FoldPolicy,
    #[serde(default)]
    pub edge_trigger: Option<EdgeCounterSettings>,
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()), err(level = "warn"))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn rectifier(&self) -> DefaultRectifier {
        Rectifier::new(self.absolute_value, self.fold_policy)
    }
}

/// The aggregator chosen for a session.
#[derive(Clone, Debug)]
pub enum Pipeline {
    Downsample(DefaultDecimator),
    MovingSum(Box<DefaultSummer>),
}

impl Pipeline {
    pub fn new(
        mode: &AggregationMode,
        rectifier: DefaultRectifier,
    ) -> Result<Self, ConfigurationError> {
        Ok(match *mode {
            AggregationMode::Downsample { downsample_num } => {
                Self::Downsample(DefaultDecimator::new(downsample_num, rectifier)?)
            }
            AggregationMode::MovingSum { window_width } => {
                Self::MovingSum(Box::new(DefaultSummer::new(window_width, rectifier)?))
            }
        })
    }
}

impl Aggregator for Pipeline {
    #[inline]
    fn push(&mut self, sample: Sample) -> Option<SampleSum> {
        match self {
            Self::Downsample(decimator) => decimator.push(sample),
            Self::MovingSum(summer) => summer.push(sample),
        }
    }

    fn check(&self, sample: Sample) -> Result<Sample, InvalidSampleError> {
        match self {
            Self::Downsample(decimator) => decimator.check(sample),
            Self::MovingSum(summer) => summer.check(sample),
        }
    }

    fn restart(&mut self) {
        match self {
            Self::Downsample(decimator) => decimator.restart(),
            Self::MovingSum(summer) => summer.restart(),
        }
    }

    fn warm_up_len(&self) -> usize {
        match self {
            Self::Downsample(decimator) => decimator.warm_up_len(),
            Self::MovingSum(summer) => summer.warm_up_len(),
        }
    }
}

/// An emitted sum, with the trigger it completed if any.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Output {
    /// Index of the sample which completed the sum.
    pub sample_index: SampleIndex,
    pub sum: SampleSum,
    pub trigger: Option<Trigger>,
}

/// A configured pipeline, optionally followed by an edge counter.
#[derive(Clone, Debug)]
pub struct Session {
    pipeline: Pipeline,
    edge_counter: Option<EdgeCounter>,
    samples_received: SampleIndex,
    sums_emitted: SampleIndex,
}

impl Session {
    /// Validates the whole configuration before anything is built.
    #[instrument(skip_all, err(level = "warn"))]
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigurationError> {
        let pipeline = Pipeline::new(&config.aggregation, config.rectifier())?;
        let edge_counter = config
            .edge_trigger
            .as_ref()
            .map(EdgeCounter::new)
            .transpose()?;
        info!(
            "Session configured: {:?}, absolute value {}, fold policy {:?}, edge trigger {}",
            config.aggregation,
            config.absolute_value,
            config.fold_policy,
            edge_counter.is_some()
        );
        Ok(Self {
            pipeline,
            edge_counter,
            samples_received: 0,
            sums_emitted: 0,
        })
    }

    /// Processes one sample. Out of range samples are rejected without affecting the session.
    pub fn push(&mut self, sample: Sample) -> Result<Option<Output>, InvalidSampleError> {
        let sum = self.pipeline.try_push(sample)?;
        let sample_index = self.samples_received;
        self.samples_received += 1;

        Ok(sum.map(|sum| {
            let trigger = self
                .edge_counter
                .as_mut()
                .and_then(|counter| counter.signal(self.sums_emitted, sum));
            self.sums_emitted += 1;
            Output {
                sample_index,
                sum,
                trigger,
            }
        }))
    }

    /// Discards all state accumulated since the session started, keeping its configuration.
    pub fn reset(&mut self) {
        debug!(
            "Session reset after {} samples and {} sums",
            self.samples_received, self.sums_emitted
        );
        self.pipeline.restart();
        if let Some(counter) = self.edge_counter.as_mut() {
            counter.reset();
        }
        self.samples_received = 0;
        self.sums_emitted = 0;
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn samples_received(&self) -> SampleIndex {
        self.samples_received
    }

    pub fn sums_emitted(&self) -> SampleIndex {
        self.sums_emitted
    }
}
