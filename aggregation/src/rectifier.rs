//! Optional folding of codes below the midpoint of the sample range.
//!
//! With a `W`-bit digitiser the baseline sits near `2^(W-1)`, so pulses of either
//! polarity can be summed as magnitudes once the lower half of the range is folded
//! onto the upper half.
use crate::error::InvalidSampleError;
use adc_sum_common::Sample;
use clap::ValueEnum;
use serde::Deserialize;

/// Determines how codes below the midpoint are folded.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoldPolicy {
    /// Reflect about the top of the range, `s -> (2^W - 1) - s`.
    #[default]
    Reflect,
    /// Shift up by the midpoint, `s -> s + 2^(W-1)`.
    Offset,
}

/// Stateless sample transform applied ahead of every aggregator.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rectifier<const BITS: u32> {
    enabled: bool,
    policy: FoldPolicy,
}

impl<const BITS: u32> Rectifier<BITS> {
    const VALID_WIDTH: () = assert!(
        BITS >= 1 && BITS <= Sample::BITS,
        "sample width must be between 1 and 16 bits"
    );

    /// Largest code a `BITS`-wide digitiser produces.
    pub const FULL_SCALE: Sample = ((1u32 << BITS) - 1) as Sample;

    /// Codes strictly below this value are folded when rectification is enabled.
    pub const MIDPOINT: Sample = (1u32 << (BITS - 1)) as Sample;

    pub fn new(enabled: bool, policy: FoldPolicy) -> Self {
        let () = Self::VALID_WIDTH;
        Self { enabled, policy }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn policy(&self) -> FoldPolicy {
        self.policy
    }

    /// Folds the sample if enabled and below the midpoint, otherwise returns it unchanged.
    ///
    /// The result stays within `0..=FULL_SCALE` for every in-range input.
    #[inline]
    pub fn rectify(&self, sample: Sample) -> Sample {
        if !self.enabled || sample >= Self::MIDPOINT {
            return sample;
        }
        match self.policy {
            FoldPolicy::Reflect => Self::FULL_SCALE - sample,
            FoldPolicy::Offset => sample + Self::MIDPOINT,
        }
    }

    /// Rejects codes wider than `BITS`.
    pub fn check(&self, sample: Sample) -> Result<Sample, InvalidSampleError> {
        if sample > Self::FULL_SCALE {
            Err(InvalidSampleError {
                sample,
                max: Self::FULL_SCALE,
            })
        } else {
            Ok(sample)
        }
    }
}

/// Applies the reflection policy, or the identity when `enabled` is false.
pub fn rectify<const BITS: u32>(sample: Sample, enabled: bool) -> Sample {
    Rectifier::<BITS>::new(enabled, FoldPolicy::Reflect).rectify(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Rectifier10 = Rectifier<10>;

    #[test]
    fn disabled_is_identity() {
        let rectifier = Rectifier10::new(false, FoldPolicy::Reflect);
        for sample in 0..=Rectifier10::FULL_SCALE {
            assert_eq!(rectifier.rectify(sample), sample);
        }
    }

    #[test]
    fn constants_for_ten_bits() {
        assert_eq!(Rectifier10::FULL_SCALE, 1023);
        assert_eq!(Rectifier10::MIDPOINT, 512);
        assert_eq!(Rectifier::<16>::FULL_SCALE, u16::MAX);
        assert_eq!(Rectifier::<1>::MIDPOINT, 1);
    }

    #[test]
    fn reflect_below_midpoint() {
        assert_eq!(rectify::<10>(500, true), 523);
        assert_eq!(rectify::<10>(600, true), 600);
        assert_eq!(rectify::<10>(0, true), 1023);
        assert_eq!(rectify::<10>(511, true), 512);
        assert_eq!(rectify::<10>(512, true), 512);
        assert_eq!(rectify::<10>(1023, true), 1023);
        assert_eq!(rectify::<10>(500, false), 500);
    }

    #[test]
    fn offset_below_midpoint() {
        let rectifier = Rectifier10::new(true, FoldPolicy::Offset);
        assert_eq!(rectifier.rectify(0), 512);
        assert_eq!(rectifier.rectify(500), 1012);
        assert_eq!(rectifier.rectify(511), 1023);
        assert_eq!(rectifier.rectify(600), 600);
    }

    #[test]
    fn output_stays_in_range() {
        for policy in [FoldPolicy::Reflect, FoldPolicy::Offset] {
            let rectifier = Rectifier10::new(true, policy);
            for sample in 0..=Rectifier10::FULL_SCALE {
                let folded = rectifier.rectify(sample);
                assert!(folded >= Rectifier10::MIDPOINT);
                assert!(folded <= Rectifier10::FULL_SCALE);
            }
            let narrow = Rectifier::<4>::new(true, policy);
            for sample in 0..=Rectifier::<4>::FULL_SCALE {
                assert!(narrow.rectify(sample) <= Rectifier::<4>::FULL_SCALE);
            }
        }
    }

    #[test]
    fn folding_twice_changes_nothing() {
        for policy in [FoldPolicy::Reflect, FoldPolicy::Offset] {
            let rectifier = Rectifier10::new(true, policy);
            for sample in 0..=Rectifier10::FULL_SCALE {
                let once = rectifier.rectify(sample);
                assert_eq!(rectifier.rectify(once), once);
            }
        }
    }

    #[test]
    fn check_rejects_wide_codes() {
        let rectifier = Rectifier10::default();
        assert_eq!(rectifier.check(1023), Ok(1023));
        assert_eq!(
            rectifier.check(1024),
            Err(InvalidSampleError {
                sample: 1024,
                max: 1023
            })
        );
    }
}
