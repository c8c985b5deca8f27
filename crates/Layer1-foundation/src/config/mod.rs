//! Config - 통합 설정 관리
//!
//! - `taskflow.rs` - TaskflowConfig 통합 설정 (글로벌 + 프로젝트 + 환경변수)

mod taskflow;

pub use taskflow::{
    global_config_dir, project_config_dir, ManagerConfig, ManagerSettings, TaskflowConfig,
    ENV_EXECUTION_DELAY_MS, ENV_MAX_WORKERS, TASKFLOW_CONFIG_FILE,
};
