pub mod models;
pub mod simulation;
pub mod utils;

pub use models::*;
pub use utils::*;
