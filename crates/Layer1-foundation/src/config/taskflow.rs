//! Taskflow Config - 통합 설정
//!
//! Load order: defaults, global directory, project directory, environment.
//! Every source is an overlay; a field it sets replaces earlier values,
//! a field it leaves out keeps them. Defaults are applied last, by
//! [`TaskflowConfig::manager_config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 설정 파일명
pub const TASKFLOW_CONFIG_FILE: &str = "config.json";

/// Overrides `manager.maxWorkers`.
pub const ENV_MAX_WORKERS: &str = "TASKFLOW_MAX_WORKERS";

/// Overrides `manager.executionDelayMs`.
pub const ENV_EXECUTION_DELAY_MS: &str = "TASKFLOW_EXECUTION_DELAY_MS";

const DEFAULT_MAX_WORKERS: usize = 4;
const DEFAULT_EXECUTION_DELAY_MS: u64 = 100;
const DEFAULT_EVENT_CAPACITY: usize = 256;

// ============================================================================
// Config directories
// ============================================================================

/// 글로벌 설정 디렉토리 (<config_dir>/taskflow)
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskflow"))
}

/// 프로젝트 설정 디렉토리 (<root>/.taskflow)
pub fn project_config_dir(root: &Path) -> PathBuf {
    root.join(".taskflow")
}

// ============================================================================
// Taskflow Config (통합)
// ============================================================================

/// Taskflow 통합 설정 (파일 형식 그대로)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskflowConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Task manager settings; unset fields fall back to defaults
    #[serde(default)]
    pub manager: ManagerSettings,
}

impl TaskflowConfig {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            manager: ManagerSettings::default(),
        }
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 + 환경변수 병합 로드
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let dirs: Vec<PathBuf> = global_config_dir()
            .into_iter()
            .chain(std::iter::once(project_config_dir(&cwd)))
            .collect();

        let mut config = Self::load_from(&dirs)?;
        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `config.json` from each directory in order, later ones winning.
    /// Missing files are skipped; the environment is not consulted.
    pub fn load_from<P: AsRef<Path>>(dirs: &[P]) -> Result<Self> {
        let mut config = Self::new();

        for dir in dirs {
            let path = dir.as_ref().join(TASKFLOW_CONFIG_FILE);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            debug!("Merging config from {}", path.display());
            let found: TaskflowConfig = serde_json::from_str(&content)?;
            config.merge(found);
        }

        Ok(config)
    }

    /// Write `config.json` into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(TASKFLOW_CONFIG_FILE), content)?;
        Ok(())
    }

    // ========================================================================
    // Merge / Override
    // ========================================================================

    /// 다른 설정과 병합 (other에 설정된 값이 우선)
    pub fn merge(&mut self, other: TaskflowConfig) {
        self.version = self.version.max(other.version);
        self.manager.merge(other.manager);
    }

    /// Apply `TASKFLOW_*` overrides using `lookup` to read variables.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_WORKERS) {
            self.manager.max_workers = Some(parse_env(ENV_MAX_WORKERS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_EXECUTION_DELAY_MS) {
            self.manager.execution_delay_ms = Some(parse_env(ENV_EXECUTION_DELAY_MS, &raw)?);
        }
        Ok(())
    }

    /// Resolved manager settings, defaults filled in
    pub fn manager_config(&self) -> ManagerConfig {
        let defaults = ManagerConfig::default();
        ManagerConfig {
            max_workers: self.manager.max_workers.unwrap_or(defaults.max_workers),
            execution_delay_ms: self
                .manager
                .execution_delay_ms
                .unwrap_or(defaults.execution_delay_ms),
            event_capacity: self
                .manager
                .event_capacity
                .unwrap_or(defaults.event_capacity),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.manager_config().validate()
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.manager.max_workers = Some(max_workers);
        self
    }

    pub fn execution_delay(mut self, delay: Duration) -> Self {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.manager.execution_delay_ms = Some(millis);
        self
    }
}

impl Default for TaskflowConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", key, raw)))
}

// ============================================================================
// Manager Settings (overlay) / Manager Config (resolved)
// ============================================================================

/// Task manager 설정 - 값이 없으면 이전 소스나 기본값을 사용
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_delay_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_capacity: Option<usize>,
}

impl ManagerSettings {
    fn merge(&mut self, other: ManagerSettings) {
        if other.max_workers.is_some() {
            self.max_workers = other.max_workers;
        }
        if other.execution_delay_ms.is_some() {
            self.execution_delay_ms = other.execution_delay_ms;
        }
        if other.event_capacity.is_some() {
            self.event_capacity = other.event_capacity;
        }
    }
}

/// Resolved settings handed to the task manager
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    /// Worker count. Recorded and reported; batches still run one task at a time.
    pub max_workers: usize,

    /// Simulated work duration per task (ms)
    pub execution_delay_ms: u64,

    /// Lifecycle event channel capacity
    pub event_capacity: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            execution_delay_ms: DEFAULT_EXECUTION_DELAY_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ManagerConfig {
    pub fn execution_delay(&self) -> Duration {
        Duration::from_millis(self.execution_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::Config("maxWorkers must be at least 1".to_string()));
        }
        if self.event_capacity == 0 {
            return Err(Error::Config("eventCapacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn default_version() -> u32 {
    1
}
