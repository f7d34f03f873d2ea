//! The address-classification pipeline.
//!
//! Lines are normalized into tasks, pushed through a bounded [`queue`] to a
//! fixed pool of workers, classified against a shared
//! [`RangeSet`](cdnstrip_common::network::range::RangeSet) and folded into an
//! [`aggregator::Aggregator`] that owns the counters and the output [`sink`].
//!
//! [`ranges`] decides where the range set comes from before any of that runs.

pub mod aggregator;
pub mod classifier;
pub mod pipeline;
pub mod queue;
pub mod ranges;
pub mod sink;
