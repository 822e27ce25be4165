mod report;
pub mod scheduler;
pub mod task;
pub mod taskset;

pub use report::{write_timeline_csv, SimulationReport, TaskStats};
pub use task::Task;
pub use taskset::TaskSet;

pub type TimeStep = usize;

pub type ID = u32;
