//! Sums non-overlapping blocks of samples, emitting one sum per block.
use crate::{
    aggregator::Aggregator,
    error::{ConfigurationError, InvalidSampleError},
    rectifier::Rectifier,
};
use adc_sum_common::{Sample, SampleSum};
use tracing::{debug, instrument};

/// Downsamples a stream by a runtime factor of at most `MAX_FACTOR`.
///
/// Blocks are aligned to the most recent reset.
#[derive(Clone, Debug)]
pub struct DecimationAccumulator<const BITS: u32, const MAX_FACTOR: usize> {
    rectifier: Rectifier<BITS>,
    downsample_num: usize,
    /// Samples accumulated into the current block, always less than `downsample_num`.
    count: usize,
    total: SampleSum,
}

impl<const BITS: u32, const MAX_FACTOR: usize> DecimationAccumulator<BITS, MAX_FACTOR> {
    const SUM_FITS: () = assert!(
        MAX_FACTOR as u64 * ((1u64 << BITS) - 1) <= SampleSum::MAX as u64,
        "a full block of maximal samples would overflow the sum type"
    );

    pub fn new(
        downsample_num: usize,
        rectifier: Rectifier<BITS>,
    ) -> Result<Self, ConfigurationError> {
        let () = Self::SUM_FITS;
        Ok(Self {
            rectifier,
            downsample_num: Self::validate(downsample_num)?,
            count: 0,
            total: 0,
        })
    }

    fn validate(downsample_num: usize) -> Result<usize, ConfigurationError> {
        if downsample_num == 0 {
            Err(ConfigurationError::ZeroDownsampleNum)
        } else if downsample_num > MAX_FACTOR {
            Err(ConfigurationError::DownsampleNumTooLarge {
                value: downsample_num,
                max: MAX_FACTOR,
            })
        } else {
            Ok(downsample_num)
        }
    }

    /// Starts a new session with the given factor.
    ///
    /// On error the accumulator is left exactly as it was.
    #[instrument(skip(self), level = "debug", err(level = "warn"))]
    pub fn reset(&mut self, downsample_num: usize) -> Result<(), ConfigurationError> {
        self.downsample_num = Self::validate(downsample_num)?;
        self.restart();
        debug!("Decimation session started");
        Ok(())
    }

    pub fn downsample_num(&self) -> usize {
        self.downsample_num
    }

    /// Number of samples accumulated towards the next emission.
    pub fn pending(&self) -> usize {
        self.count
    }
}

impl<const BITS: u32, const MAX_FACTOR: usize> Aggregator
    for DecimationAccumulator<BITS, MAX_FACTOR>
{
    #[inline]
    fn push(&mut self, sample: Sample) -> Option<SampleSum> {
        self.total += SampleSum::from(self.rectifier.rectify(sample));
        if self.count == self.downsample_num - 1 {
            self.count = 0;
            Some(std::mem::take(&mut self.total))
        } else {
            self.count += 1;
            None
        }
    }

    fn check(&self, sample: Sample) -> Result<Sample, InvalidSampleError> {
        self.rectifier.check(sample)
    }

    fn restart(&mut self) {
        self.count = 0;
        self.total = 0;
    }

    fn warm_up_len(&self) -> usize {
        self.downsample_num - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rectifier::FoldPolicy;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    type Decimator = DecimationAccumulator<10, 255>;

    fn plain() -> Rectifier<10> {
        Rectifier::new(false, FoldPolicy::Reflect)
    }

    fn run(accumulator: &mut Decimator, samples: &[Sample]) -> Vec<SampleSum> {
        samples
            .iter()
            .filter_map(|&sample| accumulator.push(sample))
            .collect()
    }

    #[test]
    fn blocks_of_three() {
        let mut accumulator = Decimator::new(3, plain()).unwrap();
        assert_eq!(run(&mut accumulator, &[1, 2, 3, 4, 5, 6, 7]), vec![6, 15]);
        assert_eq!(accumulator.pending(), 1);
    }

    #[test]
    fn factor_one_passes_through() {
        let mut accumulator = Decimator::new(1, plain()).unwrap();
        assert_eq!(accumulator.warm_up_len(), 0);
        assert_eq!(run(&mut accumulator, &[9, 8, 7]), vec![9, 8, 7]);
    }

    #[test]
    fn rejects_zero_and_oversized_factor() {
        assert_eq!(
            Decimator::new(0, plain()).err(),
            Some(ConfigurationError::ZeroDownsampleNum)
        );
        assert_eq!(
            Decimator::new(256, plain()).err(),
            Some(ConfigurationError::DownsampleNumTooLarge {
                value: 256,
                max: 255
            })
        );
        assert!(Decimator::new(255, plain()).is_ok());
    }

    #[test]
    fn failed_reset_keeps_session() {
        let mut accumulator = Decimator::new(2, plain()).unwrap();
        accumulator.push(5);
        assert!(accumulator.reset(0).is_err());
        assert_eq!(accumulator.downsample_num(), 2);
        assert_eq!(accumulator.push(6), Some(11));
    }

    #[test]
    fn reset_realigns_blocks() {
        let mut accumulator = Decimator::new(3, plain()).unwrap();
        run(&mut accumulator, &[100, 200]);
        accumulator.reset(2).unwrap();
        assert_eq!(accumulator.pending(), 0);
        assert_eq!(accumulator.push(1), None);
        assert_eq!(accumulator.push(2), Some(3));
    }

    #[test]
    fn rectifies_before_summing() {
        let rectifier = Rectifier::new(true, FoldPolicy::Reflect);
        let mut accumulator = Decimator::new(2, rectifier).unwrap();
        assert_eq!(run(&mut accumulator, &[500, 600]), vec![523 + 600]);
    }

    #[test]
    fn maximal_block_does_not_wrap() {
        let mut accumulator = Decimator::new(255, plain()).unwrap();
        let sums = run(&mut accumulator, &[1023; 255]);
        assert_eq!(sums, vec![255 * 1023]);
    }

    #[test]
    fn try_push_rejects_without_counting() {
        let mut accumulator = Decimator::new(2, plain()).unwrap();
        assert_eq!(accumulator.try_push(1), Ok(None));
        assert!(accumulator.try_push(1024).is_err());
        assert_eq!(accumulator.pending(), 1);
        assert_eq!(accumulator.try_push(2), Ok(Some(3)));
    }

    #[test]
    fn matches_block_sums_of_random_streams() {
        let mut rng = StdRng::seed_from_u64(17);
        for factor in [1, 2, 3, 8, 100, 255] {
            let rectifier = Rectifier::new(rng.random_bool(0.5), FoldPolicy::Reflect);
            let mut accumulator = Decimator::new(factor, rectifier).unwrap();
            let samples: Vec<Sample> = (0..1000).map(|_| rng.random_range(0..=1023)).collect();

            let emitted = run(&mut accumulator, &samples);
            let expected: Vec<SampleSum> = samples
                .chunks_exact(factor)
                .map(|block| {
                    block
                        .iter()
                        .map(|&s| SampleSum::from(rectifier.rectify(s)))
                        .sum()
                })
                .collect();
            assert_eq!(emitted.len(), samples.len() / factor);
            assert_eq!(emitted, expected);
        }
    }
}
