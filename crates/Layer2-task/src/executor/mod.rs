//! Task executors
//!
//! - `Executor` - execution backend trait used by the manager
//! - `SimulatedExecutor` - fixed delay, then stamps `executed_at`

pub mod simulated;
pub mod r#trait;

pub use r#trait::Executor;
pub use simulated::SimulatedExecutor;
