//! The interface shared by the decimation and moving-sum components.
use crate::error::InvalidSampleError;
use adc_sum_common::{Sample, SampleSum};

/// Consumes samples one at a time and occasionally emits a sum.
pub trait Aggregator: Clone {
    /// Rectifies and accumulates one sample, returning a sum when one is due.
    ///
    /// The sample must be within the configured sample width.
    fn push(&mut self, sample: Sample) -> Option<SampleSum>;

    /// Rejects samples wider than the configured sample width.
    fn check(&self, sample: Sample) -> Result<Sample, InvalidSampleError>;

    /// As [Aggregator::push], but leaves the state untouched if the sample is out of range.
    fn try_push(&mut self, sample: Sample) -> Result<Option<SampleSum>, InvalidSampleError> {
        let sample = self.check(sample)?;
        Ok(self.push(sample))
    }

    /// Discards all accumulated state, keeping the current configuration.
    fn restart(&mut self);

    /// Number of pushes following a restart which never emit.
    fn warm_up_len(&self) -> usize;
}
