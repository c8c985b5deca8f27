//! Task lifecycle events
//!
//! Published on a `tokio::sync::broadcast` channel; see `TaskManager::subscribe`.

use crate::task::TaskId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task was appended to the manager
    Added { id: TaskId, name: String },

    /// A task moved to `Running`
    Started { id: TaskId },

    /// A task moved to `Completed`
    Completed { id: TaskId },

    /// A task moved to `Failed`; the batch stops here
    Failed { id: TaskId, reason: String },

    /// `process_all` ran to the end without a failure
    BatchFinished { processed: usize },
}
