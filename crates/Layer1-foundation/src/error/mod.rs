//! Error types for Taskflow
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Taskflow 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Task 관련
    // ========================================================================
    /// Raised by an executor while running a single task.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Wraps the cause of the task that aborted a batch.
    #[error("Task {task_id} failed: {source}")]
    TaskFailed {
        task_id: u64,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Task processing is already in progress")]
    AlreadyProcessing,

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    // ========================================================================
    // 외부 에러 변환 (설정 파일 읽기/쓰기)
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 실행 에러 생성 헬퍼
    pub fn execution(message: impl Into<String>) -> Self {
        Error::Execution(message.into())
    }

    /// Wrap `source` as the failure of task `task_id`.
    pub fn task_failed(task_id: u64, source: Error) -> Self {
        Error::TaskFailed {
            task_id,
            source: Box::new(source),
        }
    }

    /// 잘못된 상태 전이 에러 생성 헬퍼
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Error::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_task_failed_message_contains_cause() {
        let err = Error::task_failed(3, Error::execution("disk on fire"));
        let message = err.to_string();
        assert!(message.contains("Task 3 failed"));
        assert!(message.contains("disk on fire"));
    }

    #[test]
    fn test_task_failed_exposes_source() {
        let err = Error::task_failed(1, Error::execution("boom"));
        let source = err.source().expect("wrapped error has a source");
        assert_eq!(source.to_string(), "Execution error: boom");
    }
}
