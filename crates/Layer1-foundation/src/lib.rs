//! # taskflow-foundation
//!
//! Foundation layer shared by every Taskflow crate.
//!
//! - `error`: 공통 에러 타입과 `Result` 별칭
//! - `config`: TaskflowConfig (글로벌 + 프로젝트 + 환경변수)

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{ManagerConfig, ManagerSettings, TaskflowConfig, TASKFLOW_CONFIG_FILE};
