//! 代价模型配置模块

/// 代价模型配置
///
/// 连接代价以行数为单位，下面的系数把附加操作折算成行数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModelConfig {
    /// 哈希构建开销系数
    ///
    /// 构建哈希表的额外开销系数。默认值 0.1
    pub hash_build_overhead: f64,

    /// 过滤代价系数
    ///
    /// 每行每个过滤条件的代价。默认值 0.01
    pub filter_cost_per_row: f64,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            hash_build_overhead: 0.1,
            filter_cost_per_row: 0.01,
        }
    }
}
