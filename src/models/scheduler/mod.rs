pub mod adaptive;
pub mod miss_history;
pub mod policy;
pub mod ready_set;

pub use adaptive::{AdaptiveConfig, AdaptiveScheduler};
pub use miss_history::MissHistory;
pub use policy::{priority_key, EarliestDeadlineFirst, Policy, RateMonotonic};
pub use ready_set::ReadySet;
