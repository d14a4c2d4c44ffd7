//! The periodic counter task.
//!
//! A task alternates between two states forever:
//!
//! - [`TaskState::Running`]: one critical section on the shared pair, applying
//!   the task's delta to both counters.
//! - [`TaskState::Suspended`]: waiting out its period through the executor's
//!   [`DelayNs`] implementation.
//!
//! The task never suspends inside its critical section.

use core::fmt;

use dualcount_sync::{Counters, CriticalSection, Exclusion, Poisoned, SharedCounters};
use embedded_hal_async::delay::DelayNs;

use crate::config::TaskConfig;

/// Where a task is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum TaskState {
    /// Executing its body.
    Running,
    /// Waiting for the next period, or not yet started.
    Suspended,
}

/// Errors that stop a counter task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum TaskError {
    /// The exclusion primitive was poisoned by a panicking holder.
    Poisoned {
        /// Name of the task that found the primitive poisoned.
        task: &'static str,
    },
}

impl TaskError {
    /// Name of the task that failed.
    pub fn task(&self) -> &'static str {
        match self {
            TaskError::Poisoned { task } => task,
        }
    }

    /// Whether the shared pair can no longer be trusted.
    ///
    /// When this holds, stopping the failing task is not enough: every other
    /// user of the pair would keep working on values of unknown validity, so
    /// the whole application has to stop.
    pub fn is_state_corrupted(&self) -> bool {
        matches!(self, TaskError::Poisoned { .. })
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Poisoned { task } => {
                write!(f, "task `{task}`: shared counters poisoned")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TaskError {}

/// A periodic task applying its delta to a [`SharedCounters`] pair.
pub struct CounterTask<'a, X = CriticalSection> {
    config: TaskConfig,
    shared: &'a SharedCounters<X>,
    state: TaskState,
    cycles: u32,
}

impl<'a, X: Exclusion> CounterTask<'a, X> {
    /// Bind a task description to the pair it updates.
    pub const fn new(config: TaskConfig, shared: &'a SharedCounters<X>) -> Self {
        Self {
            config,
            shared,
            state: TaskState::Suspended,
            cycles: 0,
        }
    }

    /// The description this task was created from.
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Number of completed cycles. Wraps on overflow.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Run one body: `(a, b) += delta` in a single critical section.
    ///
    /// Returns the pair as seen inside the critical section.
    pub fn tick(&mut self) -> Result<Counters, TaskError> {
        self.state = TaskState::Running;

        let name = self.config.name;
        let seen = self.shared.update(self.config.delta).map_err(|Poisoned| {
            error!("{}: shared counters poisoned, stopping", name);
            TaskError::Poisoned { task: name }
        })?;

        self.cycles = self.cycles.wrapping_add(1);
        trace!(
            "{}: cycle {}, a = {}, b = {}",
            name,
            self.cycles,
            seen.a,
            seen.b
        );

        Ok(seen)
    }

    /// Run the task forever, suspending for its period after every cycle.
    ///
    /// Only returns if a cycle fails. The returned error is fatal to this
    /// task; check [`TaskError::is_state_corrupted`] to decide whether it is
    /// fatal to the application too.
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) -> TaskError {
        debug!(
            "{}: started, period {} ms, delta {}",
            self.config.name,
            self.config.period_ms(),
            self.config.delta
        );

        loop {
            if let Err(e) = self.tick() {
                return e;
            }

            self.state = TaskState::Suspended;
            delay.delay_ms(self.config.period_ms()).await;
        }
    }
}

impl<X: Exclusion> fmt::Debug for CounterTask<'_, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterTask")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}
