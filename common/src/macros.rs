//! Logging macros used across the workspace.
//!
//! Thin wrappers over `tracing` so every crate logs through the same targets.
//! `debug!` and `trace!` carry per-line and cache-miss chatter.
//! `success!` is an `INFO` event on [`SUCCESS_TARGET`], which the terminal
//! formatter renders with its own marker.

pub const SUCCESS_TARGET: &str = "cdnstrip::success";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "cdnstrip::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!($($arg)*)
    };
}
