use crate::task::{NewTask, Task, TaskId};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("No task with id {0}")]
    NotFound(TaskId),
}

/// Which of the two task lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Active,
    Completed,
}

impl Bucket {
    pub fn from_completed(from_completed: bool) -> Self {
        if from_completed {
            Bucket::Completed
        } else {
            Bucket::Active
        }
    }

    fn holds(self, task: &Task) -> bool {
        match self {
            Bucket::Active => !task.is_completed(),
            Bucket::Completed => task.is_completed(),
        }
    }
}

/// Aggregate counts over every task currently held by a store.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stats {
    pub active_count: usize,
    pub completed_count: usize,
    /// Percentage in `0.0..=100.0`; `0.0` for an empty store.
    pub completion_rate: f64,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.active_count + self.completed_count
    }
}

/// Source of timestamps for `created_at` and `completed_at`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sole owner of task state for one session.
///
/// Tasks are kept in a single vector. Completing a task moves it to the back,
/// so filtering by status yields active tasks in insertion order and completed
/// tasks in completion order.
#[derive(Debug, Clone)]
pub struct TaskStore<C = SystemClock> {
    tasks: Vec<Task>,
    next_id: TaskId,
    clock: C,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> TaskStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            clock,
        }
    }

    /// Adds a task to the end of the active list and returns its id.
    ///
    /// The title is trimmed before storing. A blank title is rejected without
    /// consuming an id.
    pub fn add_task(&mut self, input: NewTask) -> Result<TaskId, TaskStoreError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            tracing::debug!("rejected task with empty title");
            return Err(TaskStoreError::EmptyTitle);
        }

        let id = self.next_id;
        let task = Task::new(id, input, title, self.clock.now());
        self.tasks.push(task);
        self.next_id += 1;
        tracing::debug!(id, "added task");
        Ok(id)
    }

    /// Moves an active task to the end of the completed list, stamping
    /// `completed_at`. Completed or unknown ids yield `NotFound`.
    pub fn complete_task(&mut self, id: TaskId) -> Result<(), TaskStoreError> {
        let index = self
            .position(id, Bucket::Active)
            .ok_or(TaskStoreError::NotFound(id))?;

        let mut task = self.tasks.remove(index);
        task.mark_completed(self.clock.now());
        self.tasks.push(task);
        tracing::debug!(id, "completed task");
        Ok(())
    }

    /// Removes a task from the given list only.
    pub fn delete_task_from(&mut self, id: TaskId, bucket: Bucket) -> Result<(), TaskStoreError> {
        let index = self
            .position(id, bucket)
            .ok_or(TaskStoreError::NotFound(id))?;

        self.tasks.remove(index);
        tracing::debug!(id, ?bucket, "deleted task");
        Ok(())
    }

    /// Removes a task regardless of its status and returns it.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, TaskStoreError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;

        let task = self.tasks.remove(index);
        tracing::debug!(id, status = ?task.status(), "deleted task");
        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Active tasks in the order they were added.
    pub fn list_active(&self) -> Vec<&Task> {
        self.list(Bucket::Active)
    }

    /// Completed tasks in the order they were completed.
    pub fn list_completed(&self) -> Vec<&Task> {
        self.list(Bucket::Completed)
    }

    pub fn stats(&self) -> Stats {
        let completed_count = self.tasks.iter().filter(|task| task.is_completed()).count();
        let mut stats = Stats {
            active_count: self.tasks.len() - completed_count,
            completed_count,
            completion_rate: 0.0,
        };
        if stats.total() > 0 {
            stats.completion_rate = completed_count as f64 / stats.total() as f64 * 100.0;
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The id the next successful `add_task` will return.
    pub fn next_id(&self) -> TaskId {
        self.next_id
    }

    fn list(&self, bucket: Bucket) -> Vec<&Task> {
        self.tasks.iter().filter(|task| bucket.holds(task)).collect()
    }

    fn position(&self, id: TaskId, bucket: Bucket) -> Option<usize> {
        self.tasks
            .iter()
            .position(|task| task.id() == id && bucket.holds(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status};
    use std::cell::Cell;

    /// Clock that advances one minute per reading.
    struct StepClock {
        ticks: Cell<i64>,
    }

    impl StepClock {
        fn new() -> Self {
            Self {
                ticks: Cell::new(0),
            }
        }

        fn at(minutes: i64) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::minutes(minutes)
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.get();
            self.ticks.set(tick + 1);
            Self::at(tick)
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<TaskId> {
        tasks.iter().map(|task| task.id()).collect()
    }

    #[test]
    fn new_store_is_empty_and_starts_at_id_one() {
        let store = TaskStore::new();

        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(store.list_active().is_empty());
        assert!(store.list_completed().is_empty());
    }

    #[test]
    fn can_add_task() {
        let mut store = TaskStore::with_clock(StepClock::new());

        let id = store.add_task(NewTask::new("Buy milk")).unwrap();

        assert_eq!(id, 1);
        let active = store.list_active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title(), "Buy milk");
        assert_eq!(active[0].priority(), Priority::Medium);
        assert_eq!(active[0].description(), None);
        assert_eq!(active[0].created_at(), StepClock::at(0));
        assert_eq!(active[0].completed_at(), None);
    }

    #[test]
    fn add_trims_title() {
        let mut store = TaskStore::new();

        let id = store.add_task(NewTask::new("  Water plants \n")).unwrap();

        assert_eq!(store.get(id).unwrap().title(), "Water plants");
    }

    #[test]
    fn cannot_add_task_with_blank_title() {
        let mut store = TaskStore::new();

        assert_eq!(store.add_task(NewTask::new("")), Err(TaskStoreError::EmptyTitle));
        assert_eq!(
            store.add_task(NewTask::new("   ")),
            Err(TaskStoreError::EmptyTitle)
        );

        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn can_complete_task() {
        let mut store = TaskStore::with_clock(StepClock::new());
        store.add_task(NewTask::new("Buy milk")).unwrap();

        store.complete_task(1).unwrap();

        assert!(store.list_active().is_empty());
        let completed = store.list_completed();
        assert_eq!(ids(&completed), vec![1]);
        assert_eq!(completed[0].status(), Status::Completed);
        assert_eq!(completed[0].completed_at(), Some(StepClock::at(1)));
    }

    #[test]
    fn cannot_complete_unknown_task() {
        let mut store = TaskStore::new();

        assert_eq!(store.complete_task(99), Err(TaskStoreError::NotFound(99)));
        assert!(store.is_empty());
    }

    #[test]
    fn cannot_complete_task_twice() {
        let mut store = TaskStore::with_clock(StepClock::new());
        store.add_task(NewTask::new("Buy milk")).unwrap();
        store.complete_task(1).unwrap();
        let stamped = store.get(1).unwrap().completed_at();

        assert_eq!(store.complete_task(1), Err(TaskStoreError::NotFound(1)));
        assert_eq!(store.get(1).unwrap().completed_at(), stamped);
    }

    #[test]
    fn completing_preserves_order_of_both_lists() {
        let mut store = TaskStore::new();
        for title in ["A", "B", "C", "D"] {
            store.add_task(NewTask::new(title)).unwrap();
        }

        store.complete_task(3).unwrap();
        store.complete_task(1).unwrap();
        store.add_task(NewTask::new("E")).unwrap();

        assert_eq!(ids(&store.list_active()), vec![2, 4, 5]);
        assert_eq!(ids(&store.list_completed()), vec![3, 1]);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut store = TaskStore::new();
        store.add_task(NewTask::new("A")).unwrap();
        store.add_task(NewTask::new("B")).unwrap();

        store.delete_task_from(1, Bucket::from_completed(false)).unwrap();

        let active = store.list_active();
        assert_eq!(ids(&active), vec![2]);
        assert_eq!(active[0].title(), "B");
        assert_eq!(store.add_task(NewTask::new("C")), Ok(3));
    }

    #[test]
    fn delete_from_only_searches_the_given_bucket() {
        let mut store = TaskStore::new();
        store.add_task(NewTask::new("A")).unwrap();
        store.add_task(NewTask::new("B")).unwrap();
        store.complete_task(2).unwrap();

        assert_eq!(
            store.delete_task_from(2, Bucket::Active),
            Err(TaskStoreError::NotFound(2))
        );
        assert_eq!(
            store.delete_task_from(1, Bucket::Completed),
            Err(TaskStoreError::NotFound(1))
        );
        assert_eq!(store.len(), 2);

        store.delete_task_from(2, Bucket::Completed).unwrap();

        assert!(store.list_completed().is_empty());
        assert_eq!(ids(&store.list_active()), vec![1]);
    }

    #[test]
    fn can_delete_task_regardless_of_status() {
        let mut store = TaskStore::new();
        store.add_task(NewTask::new("A")).unwrap();
        store.add_task(NewTask::new("B")).unwrap();
        store.complete_task(1).unwrap();

        let removed = store.delete_task(1).unwrap();
        assert_eq!(removed.title(), "A");
        assert!(removed.is_completed());

        let removed = store.delete_task(2).unwrap();
        assert_eq!(removed.title(), "B");

        assert!(store.is_empty());
        assert_eq!(store.delete_task(2), Err(TaskStoreError::NotFound(2)));
    }

    #[test]
    fn stats_of_empty_store_are_zero() {
        let store = TaskStore::new();

        assert_eq!(
            store.stats(),
            Stats {
                active_count: 0,
                completed_count: 0,
                completion_rate: 0.0,
            }
        );
    }

    #[test]
    fn stats_count_both_lists() {
        let mut store = TaskStore::new();
        for title in ["A", "B", "C"] {
            store.add_task(NewTask::new(title)).unwrap();
        }
        store.complete_task(2).unwrap();

        let stats = store.stats();

        assert_eq!(stats.active_count, 2);
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.total(), 3);
        assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn completion_rate_is_hundred_when_everything_is_done() {
        let mut store = TaskStore::new();
        store.add_task(NewTask::new("A")).unwrap();
        store.complete_task(1).unwrap();

        assert_eq!(store.stats().completion_rate, 100.0);
    }
}
