//! Registration data for the counter tasks.

use fugit::MillisDurationU32;

/// What an executor needs to know to register one counter task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct TaskConfig {
    /// Name used in logs and error reports.
    pub name: &'static str,
    /// Time the task stays suspended after each cycle.
    pub period: MillisDurationU32,
    /// Amount added to both counters per cycle.
    pub delta: i32,
    /// Scheduling priority, higher preempts lower. Idle is `0`.
    pub priority: u8,
}

impl TaskConfig {
    /// Create a task description.
    pub const fn new(
        name: &'static str,
        period: MillisDurationU32,
        delta: i32,
        priority: u8,
    ) -> Self {
        Self {
            name,
            period,
            delta,
            priority,
        }
    }

    /// The period in whole milliseconds.
    pub const fn period_ms(&self) -> u32 {
        self.period.to_millis()
    }
}

/// Adds one to both counters every 10 ms.
pub const INCREMENTER: TaskConfig = TaskConfig::new("Inc", MillisDurationU32::millis(10), 1, 1);

/// Subtracts one from both counters every 5 ms, preempting the incrementer.
pub const DECREMENTER: TaskConfig = TaskConfig::new("Dec", MillisDurationU32::millis(5), -1, 2);

/// Both counter tasks, in creation order.
pub const TASKS: [TaskConfig; 2] = [INCREMENTER, DECREMENTER];
