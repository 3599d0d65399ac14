//! Descriptor multiplexing.
//!
//! This module wraps the OS facilities the router relies on:
//! - `poll(2)` over a fixed, positional wait set,
//! - a non-blocking pipe used to interrupt an indefinite wait.

pub(crate) mod unix;
pub(crate) mod wait;
#[cfg(feature = "magnetometer")]
pub(crate) mod wake;

pub(crate) use wait::WaitSet;
#[cfg(feature = "magnetometer")]
pub(crate) use wake::WakeChannel;
