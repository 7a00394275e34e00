//! 边类型统计信息模块
//!
//! 边类型级别的平均出度和连接列直方图

use serde::{Deserialize, Serialize};

use super::Statistics;

/// 边类型统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTypeStatistics {
    /// 边类型名称
    pub edge_type: String,
    /// 平均出度
    pub avg_out_degree: f64,
    /// 连接列直方图
    pub histogram: Option<Statistics>,
}

impl EdgeTypeStatistics {
    pub fn new(edge_type: impl Into<String>, avg_out_degree: f64) -> Self {
        Self {
            edge_type: edge_type.into(),
            avg_out_degree,
            histogram: None,
        }
    }

    pub fn with_histogram(mut self, histogram: Statistics) -> Self {
        self.histogram = Some(histogram);
        self
    }
}
