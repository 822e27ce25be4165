use std::collections::HashSet;

use log::{debug, info, trace};

use super::{MissHistory, ReadySet};
use crate::constants::{DEFAULT_SWITCH_THRESHOLD, DEFAULT_WINDOW_SIZE};
use crate::{Mode, SchedulingError, Task, TimeStep, ID};

/// Tuning of the RM -> EDF switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveConfig {
    /// Number of trailing steps inspected.
    pub window_size: usize,
    /// The switch fires when the window holds strictly more miss steps than this.
    pub switch_threshold: usize,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            switch_threshold: DEFAULT_SWITCH_THRESHOLD,
        }
    }
}

impl AdaptiveConfig {
    pub fn new(window_size: usize, switch_threshold: usize) -> Self {
        Self {
            window_size,
            switch_threshold,
        }
    }

    /// A configuration whose threshold can never be exceeded.
    pub fn disabled() -> Self {
        Self {
            switch_threshold: usize::MAX,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.window_size == 0 {
            return Err(SchedulingError::ZeroWindow);
        }
        Ok(())
    }
}

/// Single-processor, unit-step scheduler that starts in the given mode and
/// moves from RM to EDF once deadline misses pile up.
#[derive(Debug)]
pub struct AdaptiveScheduler {
    tasks: Vec<Task>,
    mode: Mode,
    time: TimeStep,
    ready: ReadySet,
    history: MissHistory,
    config: AdaptiveConfig,
    switched_at: Option<TimeStep>,
}

impl AdaptiveScheduler {
    /// Creates a scheduler owning `tasks` for the whole run.
    ///
    /// # Errors
    /// An invalid `config`, or two tasks sharing an id.
    pub fn new(tasks: Vec<Task>, mode: Mode, config: AdaptiveConfig) -> Result<Self, SchedulingError> {
        config.validate()?;
        let mut seen = HashSet::new();
        if let Some(dup) = tasks.iter().find(|t| !seen.insert(t.id())) {
            return Err(SchedulingError::DuplicateTaskId(dup.id()));
        }
        info!(
            "scheduler started: {} tasks, mode {}, window {}, threshold {}",
            tasks.len(),
            mode,
            config.window_size,
            config.switch_threshold
        );
        Ok(Self {
            tasks,
            mode,
            time: 0,
            ready: ReadySet::new(),
            history: MissHistory::new(),
            config,
            switched_at: None,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn time(&self) -> TimeStep {
        self.time
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: ID) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn history(&self) -> &MissHistory {
        &self.history
    }

    pub fn config(&self) -> AdaptiveConfig {
        self.config
    }

    /// Time of the RM -> EDF transition, if it happened.
    pub fn switched_at(&self) -> Option<TimeStep> {
        self.switched_at
    }

    /// Simulates one time unit and returns the id of the task that ran, or
    /// `None` when the processor idled.
    pub fn step(&mut self) -> Option<ID> {
        self.release_jobs();
        let missed = self.drop_missed_jobs();
        self.history.record(missed);
        self.adapt();

        let dispatched = self.dispatch();
        self.time += 1;
        dispatched
    }

    fn release_jobs(&mut self) {
        let now = self.time;
        for (slot, task) in self.tasks.iter_mut().enumerate() {
            if task.is_ready_to_release(now) {
                task.release(now);
                self.ready.insert(slot, task, self.mode);
            }
        }
    }

    /// Abandons every overdue job. Returns whether any job missed.
    fn drop_missed_jobs(&mut self) -> bool {
        let now = self.time;
        let mut missed = false;
        for task in self.tasks.iter_mut() {
            if task.has_missed(now) {
                debug!(
                    "t={} task {} missed deadline {}, job dropped",
                    now,
                    task.id(),
                    task.absolute_deadline()
                );
                task.drop_job();
                self.ready.remove(task.id());
                missed = true;
            }
        }
        missed
    }

    fn adapt(&mut self) {
        if self.mode != Mode::RateMonotonic {
            return;
        }
        let Some(recent) = self.history.recent_miss_count(self.config.window_size) else {
            return;
        };
        if recent > self.config.switch_threshold {
            info!(
                "t={} {} missed steps in last {} -> switching to {}",
                self.time,
                recent,
                self.config.window_size,
                Mode::EarliestDeadlineFirst
            );
            self.mode = Mode::EarliestDeadlineFirst;
            self.switched_at = Some(self.time);
            self.ready.rebuild(&self.tasks, self.mode);
        }
    }

    fn dispatch(&mut self) -> Option<ID> {
        let slot = self.ready.pop_highest_priority()?;
        let task = &mut self.tasks[slot];
        let id = task.id();
        trace!("t={} running task {}", self.time, id);

        if task.execute_unit() {
            debug!("t={} task {} completed a job", self.time, id);
        } else {
            self.ready.insert(slot, task, self.mode);
        }
        Some(id)
    }
}
