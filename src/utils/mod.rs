pub mod constants;
pub mod errors;
pub mod lcm;

pub use constants::{Mode, SimulationCode, Strategy};
pub use errors::SchedulingError;
pub use lcm::multiple_lcm;
