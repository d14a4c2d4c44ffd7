//! Periodic tasks sharing a pair of counters under mutual exclusion.
//!
//! Two tasks are registered in [`TASKS`]: an incrementer and a faster,
//! higher priority decrementer. Each cycle applies its delta to both counters
//! of a [`SharedCounters`](sync::SharedCounters) pair inside one critical
//! section and then suspends for its period, so at every point where no task
//! is inside a critical section `a == b` holds.
//!
//! This crate does not start an executor. The application spawns
//! [`CounterTask::run`] on whatever executor it uses and hands it an
//! [`embedded_hal_async::delay::DelayNs`] to suspend with.
//!
//! ```rust
//! use dualcount::{CounterTask, DECREMENTER, INCREMENTER};
//! use dualcount::sync::{Counters, SharedCounters};
//!
//! static SHARED: SharedCounters = SharedCounters::new();
//!
//! let mut inc = CounterTask::new(INCREMENTER, &SHARED);
//! let mut dec = CounterTask::new(DECREMENTER, &SHARED);
//!
//! inc.tick().unwrap();
//! inc.tick().unwrap();
//! dec.tick().unwrap();
//!
//! assert_eq!(SHARED.snapshot(), Ok(Counters { a: 1, b: 1 }));
//! ```

#![no_std]
#![deny(missing_docs)]

#[macro_use]
mod log;

pub mod config;
pub mod led;
pub mod task;

pub use config::{TaskConfig, DECREMENTER, INCREMENTER, TASKS};
pub use led::{Blinker, Led, Polarity, BLINK_HALF_PERIOD_MS};
pub use task::{CounterTask, TaskError, TaskState};

/// Re-export of the shared state crate.
pub use dualcount_sync as sync;
/// Re-export for building [`TaskConfig`] periods.
pub use fugit;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;
