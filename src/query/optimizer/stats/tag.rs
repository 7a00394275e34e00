//! 标签统计信息模块
//!
//! 顶点标签级别的行数估计，由外部统计收集器提供

use serde::{Deserialize, Serialize};

/// 标签统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagStatistics {
    /// 标签名称
    pub tag_name: String,
    /// 顶点数量
    pub vertex_count: f64,
}

impl TagStatistics {
    pub fn new(tag_name: impl Into<String>, vertex_count: f64) -> Self {
        Self {
            tag_name: tag_name.into(),
            vertex_count,
        }
    }

    /// 带过滤条件时的行数估计，每个谓词按默认密度衰减
    pub fn estimate_rows(&self, predicate_count: usize) -> f64 {
        let mut rows = self.vertex_count;
        for _ in 0..predicate_count {
            rows *= super::DEFAULT_DENSITY;
        }
        rows.max(1.0)
    }
}
