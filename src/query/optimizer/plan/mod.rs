//! 计划表示模块
//!
//! ## 模块结构
//!
//! - `state` - 动态规划中的部分计划
//! - `match_plan` - 对外输出的遍历计划
//! - `cache` - 计划缓存

pub mod cache;
pub mod match_plan;
pub mod state;

pub use cache::{PlanCache, PlanCacheKey, PlanCacheStats};
pub use match_plan::{EdgeRef, MatchPlan, TraversalStep};
pub use state::{ChainStep, SearchState};
