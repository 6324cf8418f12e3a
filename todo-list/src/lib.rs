//! In-memory task list for a single interactive session.
//!
//! A [`TaskStore`] owns every task and hands out ids that are never reused.
//! Tasks are either active or completed; completion is one-way.
pub mod store;
pub mod task;

pub use store::{Bucket, Clock, Stats, SystemClock, TaskStore, TaskStoreError};
pub use task::{NewTask, ParsePriorityError, Priority, Status, Task, TaskId};
