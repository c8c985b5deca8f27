//! Simulated executor - no real work, just a timed suspension

use super::Executor;
use crate::task::{Metadata, Task, EXECUTED_AT};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::time::Duration;
use taskflow_foundation::Result;
use tracing::trace;

/// Sleeps for `delay`, then reports the completion time.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    delay: Duration,
}

impl SimulatedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl Executor for SimulatedExecutor {
    async fn execute(&self, task: &Task) -> Result<Metadata> {
        trace!("Simulating task {} for {:?}", task.id, self.delay);
        tokio::time::sleep(self.delay).await;

        let mut metadata = Metadata::new();
        metadata.insert(
            EXECUTED_AT.to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        Ok(metadata)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
