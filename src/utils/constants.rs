use std::fmt;
use std::str::FromStr;

/// Default number of trailing steps inspected before switching policy.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Default number of miss steps tolerated inside the window.
pub const DEFAULT_SWITCH_THRESHOLD: usize = 3;

/// Priority discipline currently used to order the ready jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    RateMonotonic,
    EarliestDeadlineFirst,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::RateMonotonic => write!(f, "RM"),
            Mode::EarliestDeadlineFirst => write!(f, "EDF"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rm" => Ok(Mode::RateMonotonic),
            "edf" => Ok(Mode::EarliestDeadlineFirst),
            other => Err(format!("unknown scheduling mode '{}', expected 'rm' or 'edf'", other)),
        }
    }
}

/// How a simulation run is configured when comparing disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    RmOnly,
    EdfOnly,
    Adaptive,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::RmOnly, Strategy::EdfOnly, Strategy::Adaptive];

    /// Mode the scheduler starts in for this strategy.
    pub fn initial_mode(&self) -> Mode {
        match self {
            Strategy::EdfOnly => Mode::EarliestDeadlineFirst,
            Strategy::RmOnly | Strategy::Adaptive => Mode::RateMonotonic,
        }
    }

    pub fn adapts(&self) -> bool {
        *self == Strategy::Adaptive
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::RmOnly => write!(f, "RM only"),
            Strategy::EdfOnly => write!(f, "EDF only"),
            Strategy::Adaptive => write!(f, "Adaptive"),
        }
    }
}

/// Process exit codes reported by the binary.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SimulationCode {
    DeadlinesMet = 0,
    DeadlinesMissed = 2,
    InvalidInput = 5,
}
