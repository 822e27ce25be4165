use log::trace;

use super::{TimeStep, ID};
use crate::SchedulingError;

/// A periodic task together with the state of its current job.
///
/// At most one job is outstanding at a time: `remaining > 0` means a job
/// with deadline `absolute_deadline` is pending, `remaining == 0` means none.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    id: ID,
    period: TimeStep,            // T_i : Period.
    exec_time: TimeStep,         // C_i : Execution time per job.
    relative_deadline: TimeStep, // D_i : Relative deadline.
    next_release: TimeStep,
    remaining: TimeStep,
    absolute_deadline: TimeStep,
    completed_count: usize,
    missed_count: usize,
}

impl Task {
    /// Creates a task, the relative deadline defaults to the period.
    ///
    /// # Errors
    /// Id 0 (it stands for idle in timelines), zero period, execution time
    /// or deadline.
    pub fn new(
        id: ID,
        period: TimeStep,
        exec_time: TimeStep,
        deadline: Option<TimeStep>,
    ) -> Result<Self, SchedulingError> {
        if id == 0 {
            return Err(SchedulingError::ReservedId);
        }
        if period == 0 {
            return Err(SchedulingError::ZeroPeriod { task: id });
        }
        if exec_time == 0 {
            return Err(SchedulingError::ZeroExecTime { task: id });
        }
        let relative_deadline = deadline.unwrap_or(period);
        if relative_deadline == 0 {
            return Err(SchedulingError::ZeroDeadline { task: id });
        }

        Ok(Self {
            id,
            period,
            exec_time,
            relative_deadline,
            next_release: 0,
            remaining: 0,
            absolute_deadline: 0,
            completed_count: 0,
            missed_count: 0,
        })
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn period(&self) -> TimeStep {
        self.period
    }

    pub fn exec_time(&self) -> TimeStep {
        self.exec_time
    }

    pub fn relative_deadline(&self) -> TimeStep {
        self.relative_deadline
    }

    pub fn next_release(&self) -> TimeStep {
        self.next_release
    }

    pub fn remaining(&self) -> TimeStep {
        self.remaining
    }

    pub fn absolute_deadline(&self) -> TimeStep {
        self.absolute_deadline
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn missed_count(&self) -> usize {
        self.missed_count
    }

    pub fn utilisation(&self) -> f64 {
        self.exec_time as f64 / self.period as f64
    }

    pub fn has_pending_job(&self) -> bool {
        self.remaining > 0
    }

    /// True when no job is pending and the next release time has come.
    pub fn is_ready_to_release(&self, t: TimeStep) -> bool {
        self.remaining == 0 && t >= self.next_release
    }

    /// True when the pending job is still unfinished past its deadline.
    pub fn has_missed(&self, t: TimeStep) -> bool {
        self.remaining > 0 && t > self.absolute_deadline
    }

    /// Releases a new job at `now`.
    ///
    /// # Panics
    /// If the previous job is still pending.
    pub fn release(&mut self, now: TimeStep) {
        assert_eq!(
            self.remaining, 0,
            "task {} released while its previous job is pending",
            self.id
        );
        self.next_release = now + self.period;
        self.remaining = self.exec_time;
        self.absolute_deadline = now + self.relative_deadline;
        trace!("t={} task {} released, deadline {}", now, self.id, self.absolute_deadline);
    }

    /// Performs one unit of work on the pending job.
    /// Returns true when the job just completed.
    pub(crate) fn execute_unit(&mut self) -> bool {
        assert!(self.remaining > 0, "task {} executed without a pending job", self.id);
        self.remaining -= 1;
        if self.remaining == 0 {
            self.completed_count += 1;
            return true;
        }
        false
    }

    /// Abandons the pending job after a deadline miss.
    pub(crate) fn drop_job(&mut self) {
        self.missed_count += 1;
        self.remaining = 0;
    }

    /// Copy of the definition with all run-state cleared.
    pub fn fresh(&self) -> Self {
        Self {
            next_release: 0,
            remaining: 0,
            absolute_deadline: 0,
            completed_count: 0,
            missed_count: 0,
            ..self.clone()
        }
    }
}
