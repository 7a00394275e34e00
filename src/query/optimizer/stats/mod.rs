//! 统计信息模块
//!
//! 连接列直方图及其合并，以及外部统计收集器提供的标签级统计信息
//!
//! ## 模块结构
//!
//! - `histogram` - 直方图与合并算法
//! - `calculator` - 连接选择性计算策略和单次调用内的缓存
//! - `manager` - 统计信息管理器，线程安全地保存标签级统计
//! - `tag` - 标签统计信息
//! - `edge` - 边类型统计信息

pub mod calculator;
pub mod edge;
pub mod histogram;
pub mod manager;
pub mod tag;

pub use calculator::{HistogramCalculator, JoinStatisticsCalculator, StatisticsCache};
pub use edge::EdgeTypeStatistics;
pub use histogram::{degree_selectivity, Bucket, Statistics, DEFAULT_DENSITY};
pub use manager::StatisticsManager;
pub use tag::TagStatistics;
