use std::collections::HashSet;

use super::{Task, TimeStep, ID};
use crate::{multiple_lcm, SchedulingError};

/// Validated collection of task definitions.
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Builds a task set, rejecting duplicate ids.
    pub fn new(tasks: Vec<Task>) -> Result<Self, SchedulingError> {
        let mut seen = HashSet::new();
        for task in tasks.iter() {
            if !seen.insert(task.id()) {
                return Err(SchedulingError::DuplicateTaskId(task.id()));
            }
        }
        Ok(Self { tasks })
    }

    pub fn get_tasks(&self) -> &Vec<Task> {
        &self.tasks
    }

    pub fn get_task_by_id(&self, id: ID) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn utilisation(&self) -> f64 {
        self.tasks.iter().map(|t| t.utilisation()).sum()
    }

    /// Least common multiple of the periods.
    pub fn hyperperiod(&self) -> Result<TimeStep, SchedulingError> {
        multiple_lcm(&self.tasks.iter().map(|t| t.period()).collect::<Vec<_>>())
            .ok_or(SchedulingError::HyperperiodOverflow)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Fresh copies of every task, to be owned by a single simulation run.
    pub fn instantiate(&self) -> Vec<Task> {
        self.tasks.iter().map(Task::fresh).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }
}
