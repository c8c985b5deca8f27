//! Task Manager - owns the task list and runs pending tasks
//!
//! Features:
//! - Sequential ids assigned under the list lock
//! - One batch at a time (`process_all`), tasks run strictly in insertion order
//! - First failure aborts the batch
//! - Lifecycle events over a broadcast channel

use crate::event::TaskEvent;
use crate::executor::{Executor, SimulatedExecutor};
use crate::state::TaskStatus;
use crate::task::{Task, TaskId};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use taskflow_foundation::{Error, ManagerConfig, Result};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Task counts by state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Task Manager - handles task lifecycle and execution
#[derive(Clone)]
pub struct TaskManager {
    /// All tasks in insertion order
    tasks: Arc<RwLock<Vec<Task>>>,

    /// Next id to hand out
    next_id: Arc<AtomicU64>,

    /// Set while `process_all` runs
    processing: Arc<AtomicBool>,

    /// Execution backend
    executor: Arc<dyn Executor>,

    /// Lifecycle event sender
    events: broadcast::Sender<TaskEvent>,

    /// Configuration
    config: Arc<ManagerConfig>,
}

impl TaskManager {
    /// Create a manager backed by a [`SimulatedExecutor`]
    pub fn new(config: ManagerConfig) -> Self {
        let executor = Arc::new(SimulatedExecutor::new(config.execution_delay()));
        Self::with_executor(config, executor)
    }

    /// Create a manager with a custom execution backend
    pub fn with_executor(config: ManagerConfig, executor: Arc<dyn Executor>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        debug!(
            "Task manager created (executor={}, max_workers={})",
            executor.name(),
            config.max_workers
        );

        Self {
            tasks: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            processing: Arc::new(AtomicBool::new(false)),
            executor,
            events,
            config: Arc::new(config),
        }
    }

    /// Configured worker count. Batches run sequentially regardless.
    pub fn max_workers(&self) -> usize {
        self.config.max_workers
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: TaskEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    /// Append a new pending task and return a copy of it
    pub async fn add_task(&self, name: impl Into<String>) -> Task {
        let task = {
            let mut tasks = self.tasks.write().await;
            // Assigned under the write lock so id order matches list order
            let id = TaskId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
            let task = Task::new(id, name);
            tasks.push(task.clone());
            task
        };

        debug!("Added task {}: {}", task.id, task.name);
        self.publish(TaskEvent::Added {
            id: task.id,
            name: task.name.clone(),
        });

        task
    }

    /// Run every pending task, one at a time, in insertion order.
    ///
    /// Returns the full task list. On the first execution error the current
    /// task is marked `Failed`, later tasks stay `Pending`, and the cause is
    /// returned wrapped in [`Error::TaskFailed`].
    pub async fn process_all(&self) -> Result<Vec<Task>> {
        let _guard = ProcessingGuard::acquire(&self.processing)?;

        info!("Processing tasks with executor {}", self.executor.name());

        let mut index = 0;
        let mut processed = 0;

        loop {
            // Tasks appended while the batch runs are picked up too
            let task = {
                let mut tasks = self.tasks.write().await;
                let Some(task) = tasks.get_mut(index) else {
                    break;
                };
                index += 1;

                if !task.status().is_pending() {
                    continue;
                }
                task.start()?;
                task.clone()
            };

            debug!("Executing task {}: {}", task.id, task.name);
            self.publish(TaskEvent::Started { id: task.id });

            let outcome = self.executor.execute(&task).await;

            let mut tasks = self.tasks.write().await;
            let stored = tasks
                .get_mut(index - 1)
                .ok_or_else(|| Error::NotFound(format!("Task {}", task.id)))?;

            match outcome {
                Ok(metadata) => {
                    stored.metadata.extend(metadata);
                    stored.complete()?;
                    processed += 1;
                    drop(tasks);

                    debug!("Task {} completed", task.id);
                    self.publish(TaskEvent::Completed { id: task.id });
                }
                Err(e) => {
                    let reason = e.to_string();
                    stored.fail(reason.clone())?;
                    drop(tasks);

                    warn!("Task {} failed, aborting batch: {}", task.id, reason);
                    self.publish(TaskEvent::Failed {
                        id: task.id,
                        reason,
                    });
                    return Err(Error::task_failed(task.id.value(), e));
                }
            }
        }

        info!("Processed {} tasks", processed);
        self.publish(TaskEvent::BatchFinished { processed });

        Ok(self.tasks().await)
    }

    /// Whether a batch is currently running
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Snapshot of all tasks in insertion order
    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Get a task by ID
    pub async fn get(&self, task_id: TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.iter().find(|t| t.id == task_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Get count of pending tasks
    pub async fn pending_count(&self) -> usize {
        let tasks = self.tasks.read().await;
        tasks.iter().filter(|t| t.status().is_pending()).count()
    }

    /// 상태별 태스크 통계
    pub async fn stats(&self) -> TaskStats {
        let tasks = self.tasks.read().await;
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };

        for task in tasks.iter() {
            match task.status() {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Running => stats.running += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Failed { .. } => stats.failed += 1,
            }
        }

        stats
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

/// Holds the processing flag; clears it on drop.
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::AlreadyProcessing)?;
        Ok(Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Metadata, EXECUTED_AT};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn fast_config() -> ManagerConfig {
        ManagerConfig {
            execution_delay_ms: 1,
            ..ManagerConfig::default()
        }
    }

    /// Fails on the n-th call (1-based), succeeds otherwise.
    struct FailOnCall {
        fail_on: usize,
        calls: AtomicUsize,
    }

    impl FailOnCall {
        fn new(fail_on: usize) -> Self {
            Self {
                fail_on,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Executor for FailOnCall {
        async fn execute(&self, _task: &Task) -> Result<Metadata> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_on {
                return Err(Error::execution("worker exploded"));
            }
            let mut metadata = Metadata::new();
            metadata.insert(EXECUTED_AT.into(), serde_json::json!("now"));
            Ok(metadata)
        }

        fn name(&self) -> &'static str {
            "fail-on-call"
        }
    }

    /// Signals when execution starts, then blocks until released.
    struct Gate {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Executor for Gate {
        async fn execute(&self, _task: &Task) -> Result<Metadata> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Metadata::new())
        }

        fn name(&self) -> &'static str {
            "gate"
        }
    }

    #[tokio::test]
    async fn test_task_manager_creation() {
        let manager = TaskManager::default();
        assert!(manager.is_empty().await);
        assert_eq!(manager.pending_count().await, 0);
        assert!(!manager.is_processing());
        assert_eq!(manager.max_workers(), 4);
    }

    #[tokio::test]
    async fn test_sequential_ids() {
        let manager = TaskManager::new(fast_config());

        for expected in 1..=5u64 {
            let task = manager.add_task(format!("task-{}", expected)).await;
            assert_eq!(task.id.value(), expected);
            assert!(task.status().is_pending());
        }
        assert_eq!(manager.len().await, 5);
    }

    #[tokio::test]
    async fn test_concurrent_add_keeps_ids_in_list_order() {
        let manager = TaskManager::new(fast_config());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.add_task(format!("t{}", i)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let ids: Vec<u64> = manager.tasks().await.iter().map(|t| t.id.value()).collect();
        assert_eq!(ids, (1..=32).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_process_all_completes_pending() {
        let manager = TaskManager::new(fast_config());
        manager.add_task("A").await;
        manager.add_task("B").await;

        let results = manager.process_all().await.unwrap();

        assert_eq!(results.len(), 2);
        for task in &results {
            assert!(task.status().is_success());
            assert!(!task.executed_at().unwrap().is_empty());
        }
        assert!(!manager.is_processing());
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining() {
        let manager =
            TaskManager::with_executor(fast_config(), Arc::new(FailOnCall::new(2)));
        for name in ["A", "B", "C", "D"] {
            manager.add_task(name).await;
        }

        let err = manager.process_all().await.unwrap_err();
        assert!(matches!(err, Error::TaskFailed { task_id: 2, .. }));
        assert!(err.to_string().contains("worker exploded"));
        assert!(!manager.is_processing());

        let tasks = manager.tasks().await;
        assert!(tasks[0].status().is_success());
        assert!(tasks[1]
            .status()
            .failure_reason()
            .unwrap()
            .contains("worker exploded"));
        assert!(tasks[1].executed_at().is_none());
        assert!(tasks[2].status().is_pending());
        assert!(tasks[3].status().is_pending());
    }

    #[tokio::test]
    async fn test_rerun_skips_finished_tasks() {
        let manager =
            TaskManager::with_executor(fast_config(), Arc::new(FailOnCall::new(2)));
        for name in ["A", "B", "C"] {
            manager.add_task(name).await;
        }
        assert!(manager.process_all().await.is_err());

        // Second run only touches C; the failed task stays failed
        let tasks = manager.process_all().await.unwrap();
        assert!(tasks[0].status().is_success());
        assert!(matches!(tasks[1].status(), TaskStatus::Failed { .. }));
        assert!(tasks[2].status().is_success());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let manager = TaskManager::new(fast_config());
        let tasks = manager.process_all().await.unwrap();
        assert!(tasks.is_empty());
        assert!(!manager.is_processing());
    }

    #[tokio::test]
    async fn test_processing_flag_and_overlap_rejected() {
        let gate = Arc::new(Gate {
            started: Notify::new(),
            release: Notify::new(),
        });
        let manager = TaskManager::with_executor(fast_config(), gate.clone());
        manager.add_task("A").await;

        let runner = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.process_all().await })
        };
        gate.started.notified().await;

        assert!(manager.is_processing());
        assert_eq!(manager.stats().await.running, 1);
        assert!(matches!(
            manager.process_all().await,
            Err(Error::AlreadyProcessing)
        ));

        gate.release.notify_one();
        let tasks = runner.await.unwrap().unwrap();
        assert!(tasks[0].status().is_success());
        assert!(!manager.is_processing());
    }

    #[tokio::test]
    async fn test_flag_cleared_when_batch_is_dropped() {
        let gate = Arc::new(Gate {
            started: Notify::new(),
            release: Notify::new(),
        });
        let manager = TaskManager::with_executor(fast_config(), gate.clone());
        manager.add_task("A").await;

        let runner = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.process_all().await })
        };
        gate.started.notified().await;
        assert!(manager.is_processing());

        runner.abort();
        assert!(runner.await.unwrap_err().is_cancelled());
        assert!(!manager.is_processing());
    }

    #[tokio::test]
    async fn test_events() {
        let manager =
            TaskManager::with_executor(fast_config(), Arc::new(FailOnCall::new(0)));
        let mut rx = manager.subscribe();

        let a = manager.add_task("A").await;
        manager.process_all().await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                TaskEvent::Added {
                    id: a.id,
                    name: "A".into()
                },
                TaskEvent::Started { id: a.id },
                TaskEvent::Completed { id: a.id },
                TaskEvent::BatchFinished { processed: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_stats_and_get() {
        let manager =
            TaskManager::with_executor(fast_config(), Arc::new(FailOnCall::new(2)));
        let a = manager.add_task("A").await;
        manager.add_task("B").await;
        manager.add_task("C").await;
        let _ = manager.process_all().await;

        assert_eq!(
            manager.stats().await,
            TaskStats {
                total: 3,
                pending: 1,
                running: 0,
                completed: 1,
                failed: 1,
            }
        );
        assert_eq!(manager.get(a.id).await.unwrap().name, "A");
        assert!(manager.get(TaskId::new(99)).await.is_none());
    }
}
