//! Box-car filter: the running sum of the most recent `window_width` samples.
use crate::{
    aggregator::Aggregator,
    error::{ConfigurationError, InvalidSampleError},
    rectifier::Rectifier,
    ring_buffer::RingBuffer,
};
use adc_sum_common::{Sample, SampleSum};
use tracing::{debug, instrument};

/// Emits the sum of the last `window_width` rectified samples on every push once the
/// window has filled. `window_width` is set at runtime, up to `MAX_WIDTH`.
#[derive(Clone, Debug)]
pub struct SlidingWindowSummer<const BITS: u32, const MAX_WIDTH: usize> {
    rectifier: Rectifier<BITS>,
    buffer: RingBuffer<MAX_WIDTH>,
    /// Pushes since the last reset, saturating at the window width.
    filled: usize,
}

impl<const BITS: u32, const MAX_WIDTH: usize> SlidingWindowSummer<BITS, MAX_WIDTH> {
    const SUM_FITS: () = assert!(
        MAX_WIDTH as u64 * ((1u64 << BITS) - 1) <= SampleSum::MAX as u64,
        "a full window of maximal samples would overflow the sum type"
    );

    pub fn new(
        window_width: usize,
        rectifier: Rectifier<BITS>,
    ) -> Result<Self, ConfigurationError> {
        let () = Self::SUM_FITS;
        Ok(Self {
            rectifier,
            buffer: RingBuffer::new(window_width)?,
            filled: 0,
        })
    }

    /// Starts a new session with the given window width.
    ///
    /// On error the summer is left exactly as it was.
    #[instrument(skip(self), level = "debug", err(level = "warn"))]
    pub fn reset(&mut self, window_width: usize) -> Result<(), ConfigurationError> {
        self.buffer.set_len(window_width)?;
        self.filled = 0;
        debug!("Moving sum session started");
        Ok(())
    }

    pub fn window_width(&self) -> usize {
        self.buffer.window_len()
    }

    pub fn is_warmed_up(&self) -> bool {
        self.filled == self.buffer.window_len()
    }

    /// Current running total, whether or not the window has filled.
    pub fn total(&self) -> SampleSum {
        self.buffer.total()
    }
}

impl<const BITS: u32, const MAX_WIDTH: usize> Aggregator for SlidingWindowSummer<BITS, MAX_WIDTH> {
    #[inline]
    fn push(&mut self, sample: Sample) -> Option<SampleSum> {
        self.buffer.push(self.rectifier.rectify(sample));
        if self.filled < self.buffer.window_len() {
            self.filled += 1;
        }
        self.is_warmed_up().then(|| self.buffer.total())
    }

    fn check(&self, sample: Sample) -> Result<Sample, InvalidSampleError> {
        self.rectifier.check(sample)
    }

    fn restart(&mut self) {
        self.buffer.clear();
        self.filled = 0;
    }

    fn warm_up_len(&self) -> usize {
        self.buffer.window_len() - 1
    }
}
