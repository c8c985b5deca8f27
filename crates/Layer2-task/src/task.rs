//! Task definition and types

use crate::state::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use taskflow_foundation::{Error, Result};

/// Metadata key stamped by executors when a task has run.
pub const EXECUTED_AT: &str = "executed_at";

/// Free-form task metadata
pub type Metadata = HashMap<String, serde_json::Value>;

/// Sequential task identifier, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of work tracked by the manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,

    /// Caller supplied label
    pub name: String,

    /// Current state. Only moves forward; see [`Task::start`].
    status: TaskStatus,

    /// Additional metadata (`executed_at` once run)
    #[serde(default)]
    pub metadata: Metadata,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: TaskStatus::Pending,
            metadata: Metadata::new(),
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// `executed_at` stamp, if the task has been executed
    pub fn executed_at(&self) -> Option<&str> {
        self.metadata.get(EXECUTED_AT).and_then(|v| v.as_str())
    }

    /// Mark task as running. Only valid from `Pending`.
    pub fn start(&mut self) -> Result<()> {
        match &self.status {
            TaskStatus::Pending => {
                self.status = TaskStatus::Running;
                Ok(())
            }
            other => Err(Error::invalid_transition(other.display_name(), "Running")),
        }
    }

    /// Mark task as completed. Only valid from `Running`.
    pub fn complete(&mut self) -> Result<()> {
        match &self.status {
            TaskStatus::Running => {
                self.status = TaskStatus::Completed;
                Ok(())
            }
            other => Err(Error::invalid_transition(other.display_name(), "Completed")),
        }
    }

    /// Mark task as failed. Only valid from `Running`.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        match &self.status {
            TaskStatus::Running => {
                self.status = TaskStatus::Failed {
                    reason: reason.into(),
                };
                Ok(())
            }
            other => Err(Error::invalid_transition(other.display_name(), "Failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new(TaskId::new(1), "A");
        assert_eq!(task.status(), &TaskStatus::Pending);
        assert!(task.metadata.is_empty());
        assert!(task.executed_at().is_none());
    }

    #[test]
    fn test_forward_transitions() {
        let mut task = Task::new(TaskId::new(1), "A");
        task.start().unwrap();
        assert!(task.status().is_running());
        task.complete().unwrap();
        assert!(task.status().is_success());
    }

    #[test]
    fn test_fail_from_running() {
        let mut task = Task::new(TaskId::new(1), "A");
        task.start().unwrap();
        task.fail("boom").unwrap();
        assert_eq!(task.status().failure_reason(), Some("boom"));
    }

    #[test]
    fn test_rejects_backward_and_skipping_transitions() {
        let mut task = Task::new(TaskId::new(1), "A");
        assert!(matches!(
            task.complete(),
            Err(Error::InvalidTransition { .. })
        ));
        assert!(task.fail("nope").is_err());

        task.start().unwrap();
        assert!(task.start().is_err());
        task.complete().unwrap();
        assert!(task.start().is_err());
        assert!(task.fail("late").is_err());
        assert!(task.status().is_success());
    }

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId::new(42).to_string(), "42");
    }
}
