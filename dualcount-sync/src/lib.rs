//! Shared state and exclusion primitives for preemptive task systems.
//!
//! The central type is [`SharedCounters`]: a pair of signed counters that is
//! only ever mutated as a unit, inside a single critical section.

#![no_std]
#![deny(missing_docs)]

#[macro_use]
mod log;

pub mod counters;
pub mod exclusion;

#[cfg(loom)]
mod loom_cs;

pub use counters::{Counters, SharedCounters};
pub use exclusion::{CriticalSection, Exclusion, Poisoned};
#[cfg(feature = "std")]
pub use exclusion::StdExclusion;

pub use portable_atomic;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;
