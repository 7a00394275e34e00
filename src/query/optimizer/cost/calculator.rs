//! 代价计算器模块
//!
//! 文档存储上的每一步连接都是一次增量半连接，代价按读取和比较的行数估算

use super::CostModelConfig;
use crate::query::optimizer::strategy::JoinHint;

/// 代价计算器
#[derive(Debug, Clone, Copy, Default)]
pub struct CostCalculator {
    config: CostModelConfig,
}

impl CostCalculator {
    pub fn new(config: CostModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CostModelConfig {
        &self.config
    }

    /// 计算嵌套循环连接代价：每个已有结果沿主边展开
    pub fn calculate_loop_join_cost(&self, left_rows: f64, avg_degree: f64) -> f64 {
        left_rows * avg_degree
    }

    /// 计算哈希连接代价
    pub fn calculate_hash_join_cost(&self, build_rows: f64, probe_rows: f64) -> f64 {
        let hash_overhead = build_rows * self.config.hash_build_overhead;
        build_rows + probe_rows + hash_overhead
    }

    /// 计算过滤代价
    pub fn calculate_filter_cost(&self, input_rows: f64, condition_count: usize) -> f64 {
        input_rows * condition_count as f64 * self.config.filter_cost_per_row
    }

    /// 单步连接代价
    ///
    /// `Loop` 按已有结果乘以主边出度计算；`Hash` 以新节点为构建侧，
    /// 以已有结果为探测侧；后置边在连接结果上逐行过滤
    pub fn calculate_step_cost(
        &self,
        hint: JoinHint,
        left_rows: f64,
        node_rows: f64,
        primary_degree: f64,
        output_rows: f64,
        post_filter_count: usize,
    ) -> f64 {
        let join_cost = match hint {
            JoinHint::Loop => self.calculate_loop_join_cost(left_rows, primary_degree),
            JoinHint::Hash => self.calculate_hash_join_cost(node_rows, left_rows),
        };
        join_cost + self.calculate_filter_cost(output_rows, post_filter_count)
    }
}
