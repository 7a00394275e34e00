//! 查询优化器模块
//!
//! 图模式的连接顺序优化：决定连通分量中节点和边的取数与连接顺序，
//! 使估计代价最小，同时保证每个节点和每条边都被覆盖
//!
//! ## 模块结构
//!
//! - `stats` - 统计信息模块，直方图合并与标签级统计
//! - `cost` - 代价计算模块
//! - `strategy` - 候选生成、剪枝与连接顺序搜索
//! - `plan` - 搜索状态、输出计划与计划缓存
//! - `optimizer` - 面向调用方的匹配优化器
//!
//! ## 使用示例
//!
//! ```rust
//! use docgraph::config::OptimizerConfig;
//! use docgraph::query::optimizer::MatchOptimizer;
//! use docgraph::query::pattern::{MatchEdge, MatchNode, PatternBuilder};
//!
//! let mut builder = PatternBuilder::new();
//! let person = builder.add_node(MatchNode::new("p").with_rows(1000.0));
//! let city = builder.add_node(MatchNode::new("c").with_rows(20.0));
//! builder.add_edge(MatchEdge::new("lives_in", person, city).with_degree(1.0));
//! let component = builder.build().unwrap();
//!
//! let optimizer = MatchOptimizer::new(OptimizerConfig::default()).unwrap();
//! let plan = optimizer.optimize(&component).unwrap();
//! assert_eq!(plan.aliases(), vec!["p", "c"]);
//! ```

pub mod cost;
pub mod optimizer;
pub mod plan;
pub mod stats;
pub mod strategy;

pub use cost::{CostCalculator, CostModelConfig};
pub use optimizer::MatchOptimizer;
pub use plan::{EdgeRef, MatchPlan, PlanCache, PlanCacheKey, PlanCacheStats, SearchState, TraversalStep};
pub use stats::{
    EdgeTypeStatistics, HistogramCalculator, JoinStatisticsCalculator, Statistics,
    StatisticsCache, StatisticsManager, TagStatistics,
};
pub use strategy::{
    CandidateGenerator, CandidateJoinUnit, JoinHint, JoinOrderOptimizer, JoinPruning,
    KeepAllStates, PruneJointEdge,
};
