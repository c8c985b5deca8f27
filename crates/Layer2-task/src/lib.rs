//! # taskflow-task
//!
//! Task lifecycle management for Taskflow.
//!
//! ## Features
//!
//! - Tasks with sequential ids and forward-only status
//! - Sequential batch processing with abort-on-first-failure
//! - Pluggable execution backends (`Executor`)
//! - Lifecycle events over a broadcast channel

pub mod event;
pub mod executor;
pub mod manager;
pub mod state;
pub mod task;

pub use event::TaskEvent;
pub use executor::{Executor, SimulatedExecutor};
pub use manager::{TaskManager, TaskStats};
pub use state::TaskStatus;
pub use task::{Metadata, Task, TaskId, EXECUTED_AT};
