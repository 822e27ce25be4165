use thiserror::Error;

use crate::models::ID;

/// Configuration problems detected before a simulation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("task {task}: period must be positive")]
    ZeroPeriod { task: ID },

    #[error("task {task}: execution time must be positive")]
    ZeroExecTime { task: ID },

    #[error("task {task}: relative deadline must be positive")]
    ZeroDeadline { task: ID },

    #[error("task id 0 is reserved for idle time units")]
    ReservedId,

    #[error("task id {0} appears more than once in the task set")]
    DuplicateTaskId(ID),

    #[error("miss history window must hold at least one step")]
    ZeroWindow,

    #[error("hyperperiod of the task set does not fit in a time step")]
    HyperperiodOverflow,
}
