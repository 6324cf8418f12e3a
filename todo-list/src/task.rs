use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier handed out by the store. Never reused within a store.
pub type TaskId = u32;

/// How urgent a task is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown priority '{0}', expected high, medium or low")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.to_string()
    }
}

/// Where a task currently lives. Derived from `completed_at`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Active,
    Completed,
}

/// A single unit of work tracked by a [`crate::TaskStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    priority: Priority,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub(crate) fn new(id: TaskId, input: NewTask, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            description: input.description.filter(|d| !d.trim().is_empty()),
            due_date: input.due_date,
            priority: input.priority,
            created_at,
            completed_at: None,
        }
    }

    /// Stamps the completion time. Only the store calls this, and only once.
    pub(crate) fn mark_completed(&mut self, at: DateTime<Utc>) {
        debug_assert!(self.completed_at.is_none());
        self.completed_at = Some(at);
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn status(&self) -> Status {
        match self.completed_at {
            Some(_) => Status::Completed,
            None => Status::Active,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == Status::Completed
    }
}

/// The input form of [`crate::TaskStore::add_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}
