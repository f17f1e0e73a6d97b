//! Fixed capacity circular store of recent samples with an incrementally maintained total.
//!
//! The storage is sized at compile time and never reallocated. A runtime logical length,
//! at most the capacity, selects how many of the most recent samples contribute to the total.
use crate::error::ConfigurationError;
use adc_sum_common::{Sample, SampleSum};

#[derive(Clone, Debug)]
pub struct RingBuffer<const CAPACITY: usize> {
    /// Zero-initialised storage, so evictions during warm-up contribute nothing.
    slots: [Sample; CAPACITY],
    /// Slot the next push writes to.
    head: usize,
    /// Number of most recent samples summed into `total`.
    len: usize,
    total: SampleSum,
}

impl<const CAPACITY: usize> RingBuffer<CAPACITY> {
    const VALID_CAPACITY: () = {
        assert!(CAPACITY >= 1, "ring buffer capacity must be at least 1");
        assert!(
            CAPACITY as u64 * Sample::MAX as u64 <= SampleSum::MAX as u64,
            "a full buffer of maximal samples would overflow the sum type"
        );
    };

    /// Creates an empty buffer summing the most recent `len` samples.
    pub fn new(len: usize) -> Result<Self, ConfigurationError> {
        let () = Self::VALID_CAPACITY;
        Ok(Self {
            slots: [0; CAPACITY],
            head: 0,
            len: Self::validate_len(len)?,
            total: 0,
        })
    }

    fn validate_len(len: usize) -> Result<usize, ConfigurationError> {
        if len == 0 {
            Err(ConfigurationError::ZeroWindowWidth)
        } else if len > CAPACITY {
            Err(ConfigurationError::WindowWidthTooLarge {
                value: len,
                max: CAPACITY,
            })
        } else {
            Ok(len)
        }
    }

    /// Changes the logical length and clears the contents.
    ///
    /// On error the buffer is left exactly as it was.
    pub fn set_len(&mut self, len: usize) -> Result<(), ConfigurationError> {
        self.len = Self::validate_len(len)?;
        self.clear();
        Ok(())
    }

    /// Zeroes every slot and the total, keeping the logical length.
    pub fn clear(&mut self) {
        self.slots = [0; CAPACITY];
        self.head = 0;
        self.total = 0;
    }

    /// Stores `value` as the newest sample and returns the sample which left the window.
    ///
    /// The evicted sample is the one `len` slots behind the new one. When `len == CAPACITY`
    /// this is the slot being overwritten, so it is read before the write.
    #[inline]
    pub fn push(&mut self, value: Sample) -> Sample {
        let evicted = self.slots[(self.head + CAPACITY - self.len) % CAPACITY];
        self.slots[self.head] = value;
        self.head = (self.head + 1) % CAPACITY;
        // `evicted` is already part of `total`, so subtracting first cannot underflow, and the
        // new total is a window sum, so adding afterwards cannot overflow.
        self.total = self.total - SampleSum::from(evicted) + SampleSum::from(value);
        evicted
    }

    /// Sum of the most recent `len` samples, counting zeros for slots not yet written.
    #[inline]
    pub fn total(&self) -> SampleSum {
        self.total
    }

    pub fn window_len(&self) -> usize {
        self.len
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Returns the sample pushed `age` pushes ago, `age == 0` being the newest.
    ///
    /// The whole capacity is retained, so ages beyond the logical length are still available.
    pub fn get(&self, age: usize) -> Option<Sample> {
        (age < CAPACITY).then(|| self.slots[(self.head + 2 * CAPACITY - 1 - age) % CAPACITY])
    }

    /// Iterates over the current window, newest first.
    pub fn window(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len).filter_map(|age| self.get(age))
    }
}
