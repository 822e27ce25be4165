use std::io::Write;

use csv::Writer;

use super::{Task, TimeStep, ID};
use crate::Mode;

/// Per-task counters at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStats {
    pub id: ID,
    pub completed: usize,
    pub missed: usize,
}

impl From<&Task> for TaskStats {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            completed: task.completed_count(),
            missed: task.missed_count(),
        }
    }
}

/// Outcome of running a scheduler for a fixed number of steps.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub initial_mode: Mode,
    pub final_mode: Mode,
    pub switched_at: Option<TimeStep>,
    /// Task that ran at each time unit, `None` when idle.
    pub timeline: Vec<Option<ID>>,
    /// Whether any job missed its deadline at each time unit.
    pub misses: Vec<bool>,
    pub tasks: Vec<TaskStats>,
    pub utilisation: f64,
}

impl SimulationReport {
    pub fn steps(&self) -> usize {
        self.timeline.len()
    }

    pub fn total_completed(&self) -> usize {
        self.tasks.iter().map(|t| t.completed).sum()
    }

    pub fn total_missed(&self) -> usize {
        self.tasks.iter().map(|t| t.missed).sum()
    }

    pub fn idle_steps(&self) -> usize {
        self.timeline.iter().filter(|t| t.is_none()).count()
    }

    pub fn all_deadlines_met(&self) -> bool {
        self.total_missed() == 0
    }

    /// Timeline with idle mapped to 0, the shape a chart consumer expects.
    pub fn timeline_values(&self) -> Vec<ID> {
        self.timeline.iter().map(|t| t.unwrap_or(0)).collect()
    }
}

/// Writes one `time,task,miss` row per simulated unit. Idle units are written
/// with task `0`.
pub fn write_timeline_csv<W: Write>(report: &SimulationReport, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["time", "task", "miss"])?;
    for (t, (task, missed)) in report.timeline_values().iter().zip(report.misses.iter()).enumerate() {
        wtr.write_record([t.to_string(), task.to_string(), (*missed as u8).to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SimulationReport {
        SimulationReport {
            initial_mode: Mode::RateMonotonic,
            final_mode: Mode::RateMonotonic,
            switched_at: None,
            timeline: vec![Some(1), Some(2), None],
            misses: vec![false, true, false],
            tasks: vec![
                TaskStats { id: 1, completed: 3, missed: 0 },
                TaskStats { id: 2, completed: 1, missed: 2 },
            ],
            utilisation: 0.5,
        }
    }

    #[test]
    fn test_totals() {
        let report = report();
        assert_eq!(report.steps(), 3);
        assert_eq!(report.total_completed(), 4);
        assert_eq!(report.total_missed(), 2);
        assert_eq!(report.idle_steps(), 1);
        assert!(!report.all_deadlines_met());
        assert_eq!(report.timeline_values(), vec![1, 2, 0]);
    }

    #[test]
    fn test_write_timeline_csv() {
        let mut out = Vec::new();
        write_timeline_csv(&report(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "time,task,miss\n0,1,0\n1,2,1\n2,0,0\n");
    }
}
