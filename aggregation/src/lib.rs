//! # ADC Sum Aggregation
//!
//! Streaming aggregation of fixed-width digitiser samples:
//! * [DecimationAccumulator] sums non-overlapping blocks of `downsample_num` samples.
//! * [SlidingWindowSummer] maintains the sum of the last `window_width` samples in a [RingBuffer].
//! * [Rectifier] optionally folds samples below the midpoint before either aggregator sees them.
//! * [EdgeCounter] optionally raises a trigger from the resulting sum stream.
//!
//! Every component consumes exactly one sample per call and never blocks. Sample width and
//! maximum window/downsample factor are const generics, and each component fails to build if
//! its sum could overflow.
pub mod aggregator;
pub mod decimation;
pub mod edge_counter;
pub mod error;
pub mod iterators;
pub mod moving_sum;
pub mod rectifier;
pub mod ring_buffer;
pub mod session;

pub use aggregator::Aggregator;
pub use decimation::DecimationAccumulator;
pub use edge_counter::{EdgeCounter, EdgeCounterSettings, EdgeType, Trigger};
pub use error::{ConfigurationError, InvalidSampleError, SessionError};
pub use iterators::{AggregateIterable, TriggerIterable};
pub use moving_sum::SlidingWindowSummer;
pub use rectifier::{FoldPolicy, Rectifier, rectify};
pub use ring_buffer::RingBuffer;
pub use session::{
    AggregationMode, DefaultDecimator, DefaultRectifier, DefaultSummer, Output, Pipeline,
    Session, SessionConfig,
};
