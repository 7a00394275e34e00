//! 代价计算模块
//!
//! ## 模块结构
//!
//! - `calculator` - 代价计算器，计算扫描、连接和过滤的代价
//! - `config` - 代价模型配置

pub mod calculator;
pub mod config;

pub use calculator::CostCalculator;
pub use config::CostModelConfig;
