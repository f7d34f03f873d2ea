//! Shared building blocks for `cdnstrip`.
//!
//! * [`network::range`]: address ranges and the read-only [`network::range::RangeSet`].
//! * [`network::target`]: turns raw input lines into classification tasks.
//! * [`source`]: the seam through which range lists are acquired.
//! * [`config`] and [`error`]: run configuration and typed failures.

pub mod config;
pub mod error;
pub mod macros;
pub mod network;
pub mod source;

#[doc(hidden)]
pub use tracing as __tracing;
