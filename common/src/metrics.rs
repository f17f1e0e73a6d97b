//! Metric names and label helpers.
use metrics::gauge;

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "adcsum_";

    pub const SAMPLES_RECEIVED: &str = concatcp!(METRIC_NAME_PREFIX, "samples_received");
    pub const SUMS_EMITTED: &str = concatcp!(METRIC_NAME_PREFIX, "sums_emitted");
    pub const TRIGGERS: &str = concatcp!(METRIC_NAME_PREFIX, "triggers");
    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const COMPONENT_INFO: &str = concatcp!(METRIC_NAME_PREFIX, "component_info");
}

pub mod failures {
    use strum::IntoStaticStr;

    #[derive(Clone, Copy, Debug, IntoStaticStr)]
    #[strum(serialize_all = "snake_case")]
    pub enum FailureKind {
        UnableToParseSample,
        SampleOutOfRange,
    }

    pub fn get_label(kind: FailureKind) -> (&'static str, &'static str) {
        ("kind", kind.into())
    }
}

/// Publishes a constant gauge identifying the running component and its version.
pub fn component_info_metric(component: &'static str) {
    gauge!(
        names::COMPONENT_INFO,
        &[("component", component), ("version", crate::version!())]
    )
    .set(1.0);
}
