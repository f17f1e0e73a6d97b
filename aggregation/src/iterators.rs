//! Iterator adapters which drive aggregators and edge counters from any sample source.
//!
//! # Example
//! ```rust
//! use adc_sum_aggregation::{
//!     AggregateIterable, DefaultSummer, Rectifier, FoldPolicy,
//! };
//!
//! let summer = DefaultSummer::new(4, Rectifier::new(false, FoldPolicy::Reflect)).unwrap();
//! let samples: [u16; 6] = [10, 20, 30, 40, 50, 60];
//! let sums: Vec<_> = samples.into_iter().aggregate(summer).collect();
//! assert_eq!(sums, vec![100, 140, 180]);
//! ```
use crate::{
    aggregator::Aggregator,
    edge_counter::{EdgeCounter, Trigger},
};
use adc_sum_common::{Sample, SampleIndex, SampleSum};
use tracing::trace;

/// Applies an aggregator to a source iterator of samples, yielding each emitted sum.
#[derive(Clone)]
pub struct AggregateIter<I, A>
where
    I: Iterator<Item = Sample>,
    A: Aggregator,
{
    /// Samples to aggregate.
    source: I,
    /// Aggregator to apply.
    aggregator: A,
}

impl<I, A> AggregateIter<I, A>
where
    I: Iterator<Item = Sample>,
    A: Aggregator,
{
    pub fn get_aggregator(&self) -> &A {
        &self.aggregator
    }
}

impl<I, A> Iterator for AggregateIter<I, A>
where
    I: Iterator<Item = Sample>,
    A: Aggregator,
{
    type Item = SampleSum;

    fn next(&mut self) -> Option<SampleSum> {
        for sample in &mut self.source {
            if let Some(sum) = self.aggregator.push(sample) {
                trace!("Sum emitted {sum}");
                return Some(sum);
            }
        }
        None
    }
}

/// Provides method for converting a sample iterator into an [AggregateIter].
pub trait AggregateIterable<I, A>
where
    I: Iterator<Item = Sample>,
    A: Aggregator,
{
    fn aggregate(self, aggregator: A) -> AggregateIter<I, A>;
}

impl<I, A> AggregateIterable<I, A> for I
where
    I: Iterator<Item = Sample>,
    A: Aggregator,
{
    /// Create an [AggregateIter] iterator, which applies an aggregator to the samples as they are consumed.
    ///
    /// # Parameters
    /// - aggregator: freshly configured aggregator, applied as the iterator is consumed.
    fn aggregate(self, aggregator: A) -> AggregateIter<I, A> {
        AggregateIter {
            source: self,
            aggregator,
        }
    }
}

/// Applies an edge counter to a source iterator of indexed sums.
#[derive(Clone)]
pub struct TriggerIter<I>
where
    I: Iterator<Item = (SampleIndex, SampleSum)>,
{
    source: I,
    counter: EdgeCounter,
}

impl<I> Iterator for TriggerIter<I>
where
    I: Iterator<Item = (SampleIndex, SampleSum)>,
{
    type Item = Trigger;

    fn next(&mut self) -> Option<Trigger> {
        for (index, sum) in &mut self.source {
            if let Some(trigger) = self.counter.signal(index, sum) {
                trace!("Trigger found {trigger:?}");
                return Some(trigger);
            }
        }
        None
    }
}

/// Provides method for converting an indexed sum iterator into a [TriggerIter].
pub trait TriggerIterable<I>
where
    I: Iterator<Item = (SampleIndex, SampleSum)>,
{
    fn triggers(self, counter: EdgeCounter) -> TriggerIter<I>;
}

impl<I> TriggerIterable<I> for I
where
    I: Iterator<Item = (SampleIndex, SampleSum)>,
{
    fn triggers(self, counter: EdgeCounter) -> TriggerIter<I> {
        TriggerIter {
            source: self,
            counter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DefaultDecimator, DefaultSummer,
        edge_counter::{EdgeCounterSettings, EdgeType},
        rectifier::{FoldPolicy, Rectifier},
    };

    fn plain() -> Rectifier<10> {
        Rectifier::new(false, FoldPolicy::Reflect)
    }

    #[test]
    fn empty_source() {
        let summer = DefaultSummer::new(2, plain()).unwrap();
        let mut iter = std::iter::empty::<Sample>().aggregate(summer);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn moving_sum_iterator() {
        let summer = DefaultSummer::new(4, plain()).unwrap();
        let samples: [Sample; 6] = [10, 20, 30, 40, 50, 60];
        let mut iter = samples.into_iter().aggregate(summer);
        assert_eq!(iter.next(), Some(100));
        assert_eq!(iter.next(), Some(140));
        assert_eq!(iter.next(), Some(180));
        assert_eq!(iter.next(), None);
        assert!(iter.get_aggregator().is_warmed_up());
    }

    #[test]
    fn decimation_iterator() {
        let decimator = DefaultDecimator::new(3, plain()).unwrap();
        let sums: Vec<_> = (1..=7u16).aggregate(decimator).collect();
        assert_eq!(sums, vec![6, 15]);
    }

    #[test]
    fn triggers_on_summed_pulses() {
        let summer = DefaultSummer::new(2, plain()).unwrap();
        let counter = EdgeCounter::new(&EdgeCounterSettings {
            threshold: 1000.0,
            edge_type: EdgeType::RisingEdge,
            settling_time: 0,
            edge_num: 1,
        })
        .unwrap();
        let samples: [Sample; 10] = [100, 100, 900, 900, 100, 100, 100, 800, 800, 100];
        let triggers: Vec<_> = samples
            .into_iter()
            .aggregate(summer)
            .enumerate()
            .map(|(i, sum)| (i as SampleIndex, sum))
            .triggers(counter)
            .map(|trigger| (trigger.index, trigger.sum))
            .collect();
        // Sums: 200, 1000, 1800, 1000, 200, 200, 900, 1600, 900
        assert_eq!(triggers, vec![(1, 1000), (7, 1600)]);
    }
}
