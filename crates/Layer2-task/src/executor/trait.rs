//! Executor trait

use crate::task::{Metadata, Task};
use async_trait::async_trait;
use taskflow_foundation::Result;

/// Executor trait - implement to add new execution backends
///
/// The returned metadata is merged into the task by the manager.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute a task
    async fn execute(&self, task: &Task) -> Result<Metadata>;

    /// Get executor name
    fn name(&self) -> &'static str;
}
