//! 优化策略模块
//!
//! 图模式的连接顺序搜索
//!
//! ## 模块结构
//!
//! - `candidate` - 候选连接单元生成
//! - `pruning` - 搜索前沿剪枝策略
//! - `join_order` - 连接顺序优化器

pub mod candidate;
pub mod join_order;
pub mod pruning;

pub use candidate::{CandidateGenerator, CandidateJoinUnit, JoinHint};
pub use join_order::JoinOrderOptimizer;
pub use pruning::{sort_frontier, JoinPruning, KeepAllStates, PruneJointEdge};
