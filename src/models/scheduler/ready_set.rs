use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::policy::priority_key;
use crate::{Mode, Task, TimeStep, ID};

/// Heap entry. Field order gives the `(key, task id)` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    key: TimeStep,
    task_id: ID,
    slot: usize, // index of the task in the scheduler's task vector
}

/// Released, unfinished jobs ordered ascending by `(priority key, task id)`.
///
/// Entries refer to tasks by their slot in the scheduler's task vector, so the
/// set never borrows the tasks it orders.
#[derive(Debug, Default)]
pub struct ReadySet {
    heap: BinaryHeap<Reverse<Entry>>,
}

impl ReadySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the task stored at `slot` with its key under `mode`.
    pub fn insert(&mut self, slot: usize, task: &Task, mode: Mode) {
        debug_assert!(!self.contains(task.id()), "task {} already ready", task.id());
        self.heap.push(Reverse(Entry {
            key: priority_key(task, mode),
            task_id: task.id(),
            slot,
        }));
    }

    /// Removes and returns the slot of the highest-priority task.
    pub fn pop_highest_priority(&mut self) -> Option<usize> {
        self.heap.pop().map(|Reverse(entry)| entry.slot)
    }

    /// Removes the entry of `task_id`, if any.
    pub fn remove(&mut self, task_id: ID) {
        self.heap.retain(|Reverse(entry)| entry.task_id != task_id);
    }

    pub fn contains(&self, task_id: ID) -> bool {
        self.heap.iter().any(|Reverse(entry)| entry.task_id == task_id)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Recomputes every resident key under `mode`. Membership is unchanged.
    pub fn rebuild(&mut self, tasks: &[Task], mode: Mode) {
        let entries = std::mem::take(&mut self.heap).into_vec();
        self.heap = entries
            .into_iter()
            .map(|Reverse(entry)| {
                Reverse(Entry {
                    key: priority_key(&tasks[entry.slot], mode),
                    ..entry
                })
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn released(id: ID, period: TimeStep, deadline: TimeStep, now: TimeStep) -> Task {
        let mut task = Task::new(id, period, 1, Some(deadline)).unwrap();
        task.release(now);
        task
    }

    #[test]
    fn test_pops_in_key_order() {
        let tasks = vec![released(1, 30, 30, 0), released(2, 10, 10, 0), released(3, 20, 20, 0)];
        let mut ready = ReadySet::new();
        for (slot, task) in tasks.iter().enumerate() {
            ready.insert(slot, task, Mode::RateMonotonic);
        }

        assert_eq!(ready.len(), 3);
        assert_eq!(ready.pop_highest_priority(), Some(1));
        assert_eq!(ready.pop_highest_priority(), Some(2));
        assert_eq!(ready.pop_highest_priority(), Some(0));
        assert_eq!(ready.pop_highest_priority(), None);
        assert!(ready.is_empty());
    }

    #[test]
    fn test_equal_keys_break_on_task_id() {
        let tasks = vec![released(7, 10, 10, 0), released(3, 10, 10, 0)];
        let mut ready = ReadySet::new();
        ready.insert(0, &tasks[0], Mode::EarliestDeadlineFirst);
        ready.insert(1, &tasks[1], Mode::EarliestDeadlineFirst);

        assert_eq!(ready.pop_highest_priority(), Some(1));
        assert_eq!(ready.pop_highest_priority(), Some(0));
    }

    #[test]
    fn test_rebuild_reorders_under_new_mode() {
        // Short period but late deadline against long period with an early one.
        let tasks = vec![released(1, 5, 50, 0), released(2, 40, 8, 0)];
        let mut ready = ReadySet::new();
        ready.insert(0, &tasks[0], Mode::RateMonotonic);
        ready.insert(1, &tasks[1], Mode::RateMonotonic);

        ready.rebuild(&tasks, Mode::EarliestDeadlineFirst);

        assert_eq!(ready.len(), 2);
        assert_eq!(ready.pop_highest_priority(), Some(1));
        assert_eq!(ready.pop_highest_priority(), Some(0));
    }

    #[test]
    fn test_remove() {
        let tasks = vec![released(1, 10, 10, 0), released(2, 20, 20, 0)];
        let mut ready = ReadySet::new();
        ready.insert(0, &tasks[0], Mode::RateMonotonic);
        ready.insert(1, &tasks[1], Mode::RateMonotonic);

        ready.remove(1);

        assert!(!ready.contains(1));
        assert!(ready.contains(2));
        assert_eq!(ready.pop_highest_priority(), Some(1));
    }
}
