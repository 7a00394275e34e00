use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{DBError, DBResult};

/// 默认的单层搜索状态上限
pub const DEFAULT_MAX_STATES: usize = 100;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub optimizer: OptimizerConfig,
    pub log: LogConfig,
}

/// 连接顺序优化器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 单层前沿允许的最大状态数，超过后以 PlanSpaceExhausted 失败
    pub max_states: usize,
    /// 计划缓存容量，0 表示不缓存
    pub plan_cache_capacity: usize,
    /// 多个连通分量是否并行优化
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
            plan_cache_capacity: 256,
            parallel: true,
        }
    }
}

impl OptimizerConfig {
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    pub fn validate(&self) -> DBResult<()> {
        if self.max_states == 0 {
            return Err(DBError::Config("optimizer.max_states 必须大于 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// 为空时日志输出到标准错误
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "docgraph".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> DBResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.optimizer.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> DBResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
