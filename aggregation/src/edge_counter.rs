//! Raises a trigger once the sum stream has crossed a threshold a given number of times.
use crate::error::ConfigurationError;
use adc_sum_common::{SampleIndex, SampleSum};
use clap::ValueEnum;
use serde::Deserialize;
use strum::Display;
use tracing::trace;

/// Direction of threshold crossing which counts as an edge.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EdgeType {
    /// The sum rises from below the threshold to at or above it.
    #[default]
    RisingEdge,
    /// The sum falls from above the threshold to at or below it.
    FallingEdge,
}

fn default_edge_num() -> u8 {
    1
}

/// Encapsulates the parameters of the edge counting trigger.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EdgeCounterSettings {
    /// Sum level which must be crossed for an edge to register.
    pub threshold: f32,

    /// Which crossing direction registers as an edge.
    #[serde(default)]
    pub edge_type: EdgeType,

    /// After an edge registers, further crossings are ignored for this many sums.
    #[serde(default)]
    pub settling_time: u8,

    /// Number of edges which make up one trigger.
    #[serde(default = "default_edge_num")]
    pub edge_num: u8,
}

/// Emitted when the configured number of edges has been counted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trigger {
    /// Index of the sum completing the final edge.
    pub index: SampleIndex,
    /// Value of that sum.
    pub sum: SampleSum,
    /// Number of edges counted, equal to `edge_num`.
    pub edges: u8,
}

#[derive(Clone, Debug)]
pub struct EdgeCounter {
    settings: EdgeCounterSettings,
    previous: Option<SampleSum>,
    /// Sums still to be ignored after the last edge.
    settling: u8,
    edges: u8,
}

impl EdgeCounter {
    pub fn new(settings: &EdgeCounterSettings) -> Result<Self, ConfigurationError> {
        if settings.edge_num == 0 {
            return Err(ConfigurationError::ZeroEdgeNum);
        }
        if !settings.threshold.is_finite() {
            return Err(ConfigurationError::NonFiniteThreshold(settings.threshold));
        }
        Ok(Self {
            settings: settings.clone(),
            previous: None,
            settling: 0,
            edges: 0,
        })
    }

    fn is_edge(&self, previous: SampleSum, current: SampleSum) -> bool {
        let threshold = self.settings.threshold;
        let (previous, current) = (previous as f32, current as f32);
        match self.settings.edge_type {
            EdgeType::RisingEdge => previous < threshold && current >= threshold,
            EdgeType::FallingEdge => previous > threshold && current <= threshold,
        }
    }

    /// Takes in the next sum and possibly outputs a trigger.
    pub fn signal(&mut self, index: SampleIndex, sum: SampleSum) -> Option<Trigger> {
        let previous = self.previous.replace(sum);
        if self.settling > 0 {
            self.settling -= 1;
            return None;
        }
        if !self.is_edge(previous?, sum) {
            return None;
        }
        self.edges += 1;
        self.settling = self.settings.settling_time;
        trace!("Edge {} of {} at {index}", self.edges, self.settings.edge_num);

        (self.edges == self.settings.edge_num).then(|| Trigger {
            index,
            sum,
            edges: std::mem::take(&mut self.edges),
        })
    }

    /// Forgets the sum history and any partially counted edges.
    pub fn reset(&mut self) {
        self.previous = None;
        self.settling = 0;
        self.edges = 0;
    }

    pub fn edges_counted(&self) -> u8 {
        self.edges
    }

    pub fn settings(&self) -> &EdgeCounterSettings {
        &self.settings
    }
}
