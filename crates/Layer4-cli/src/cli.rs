//! Batch run mode

use anyhow::Context;
use std::time::Duration;
use taskflow_foundation::TaskflowConfig;
use taskflow_task::{Task, TaskManager};
use tracing::info;

/// Tasks created when none are given on the command line
pub const DEFAULT_TASKS: [&str; 2] = ["First task", "Second task"];

/// Worker count used when neither flags nor config files set one
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Command line overrides for a single run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub tasks: Vec<String>,
    pub max_workers: Option<usize>,
    pub delay: Option<Duration>,
    pub json: bool,
}

impl RunOptions {
    pub fn from_args(
        tasks: Vec<String>,
        max_workers: Option<usize>,
        delay_ms: Option<u64>,
        json: bool,
    ) -> Self {
        Self {
            tasks,
            max_workers,
            delay: delay_ms.map(Duration::from_millis),
            json,
        }
    }

    fn task_names(&self) -> Vec<String> {
        if self.tasks.is_empty() {
            DEFAULT_TASKS.iter().map(|s| s.to_string()).collect()
        } else {
            self.tasks.clone()
        }
    }

    /// Apply flags on top of the loaded config
    pub fn apply(&self, mut config: TaskflowConfig) -> anyhow::Result<TaskflowConfig> {
        if let Some(max_workers) = self.max_workers {
            config = config.max_workers(max_workers);
        } else if config.manager.max_workers.is_none() {
            // Not set by any config file or the environment
            config = config.max_workers(DEFAULT_MAX_WORKERS);
        }
        if let Some(delay) = self.delay {
            config = config.execution_delay(delay);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Create the tasks, process them, and print a summary
pub async fn run(config: TaskflowConfig, options: RunOptions) -> anyhow::Result<()> {
    let config = options.apply(config)?;
    let manager = TaskManager::new(config.manager_config());

    for name in options.task_names() {
        manager.add_task(name).await;
    }

    info!("Running {} tasks", manager.len().await);
    let results = manager
        .process_all()
        .await
        .context("task batch aborted")?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for task in &results {
            println!("{}", format_task(task));
        }
    }
    println!("{}", summary(&results));

    Ok(())
}

fn format_task(task: &Task) -> String {
    format!(
        "{} #{} {} ({})",
        task.status().symbol(),
        task.id,
        task.name,
        task.status()
    )
}

/// Final console line
pub fn summary(results: &[Task]) -> String {
    format!("Completed {} tasks", results.len())
}
