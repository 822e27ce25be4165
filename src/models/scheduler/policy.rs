use crate::{Mode, Task, TimeStep};

/// Ordering rule for ready jobs. Lower keys run first, equal keys are
/// broken by ascending task id in the ready set.
pub trait Policy {
    fn priority_key(&self, task: &Task) -> TimeStep;
}

/// Static priority: the shorter the period, the higher the priority.
pub struct RateMonotonic;

impl Policy for RateMonotonic {
    fn priority_key(&self, task: &Task) -> TimeStep {
        task.period()
    }
}

/// Dynamic priority: the earlier the absolute deadline, the higher the priority.
pub struct EarliestDeadlineFirst;

impl Policy for EarliestDeadlineFirst {
    fn priority_key(&self, task: &Task) -> TimeStep {
        task.absolute_deadline()
    }
}

/// Priority key of `task` under `mode`, always derived from the task's
/// current state.
pub fn priority_key(task: &Task, mode: Mode) -> TimeStep {
    match mode {
        Mode::RateMonotonic => RateMonotonic.priority_key(task),
        Mode::EarliestDeadlineFirst => EarliestDeadlineFirst.priority_key(task),
    }
}
