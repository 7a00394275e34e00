//! 连接顺序优化器模块
//!
//! 对一个连通分量做逐层的动态规划搜索：
//!
//! 1. 从根节点出发构造种子状态
//! 2. 每一层对前沿中的每个状态应用全部候选单元
//! 3. 任一扩展结果覆盖了全部节点和边即返回
//! 4. 其余结果经剪枝后成为下一层前沿，前沿超过上限则放弃
//!
//! 每个前沿节点在每一层都会产生候选，去重后第 k 层最多有
//! C(可加入节点数, k) 个状态。以星形模式为例，9 个叶子在默认上限 100 下
//! 第 4 层有 126 个状态，10 个叶子在第 3 层有 120 个状态，都会失败。
//!
//! ## 使用示例
//!
//! ```rust
//! use docgraph::query::optimizer::strategy::JoinOrderOptimizer;
//! use docgraph::query::pattern::{MatchEdge, MatchNode, PatternBuilder};
//!
//! let mut builder = PatternBuilder::new();
//! let a = builder.add_node(MatchNode::new("a"));
//! let b = builder.add_node(MatchNode::new("b"));
//! builder.add_edge(MatchEdge::new("ab", a, b));
//! let component = builder.build().unwrap();
//!
//! let plan = JoinOrderOptimizer::new(100).optimize(&component).unwrap();
//! assert_eq!(plan.aliases(), vec!["a", "b"]);
//! ```

use std::sync::Arc;

use log::{debug, info, warn};

use super::{CandidateGenerator, JoinPruning, PruneJointEdge};
use crate::config::DEFAULT_MAX_STATES;
use crate::core::error::{OptimizeError, OptimizeResult};
use crate::query::optimizer::cost::CostCalculator;
use crate::query::optimizer::plan::{MatchPlan, SearchState};
use crate::query::optimizer::stats::{HistogramCalculator, JoinStatisticsCalculator, StatisticsCache};
use crate::query::pattern::{ConnectedComponent, NodeId};

/// 连接顺序优化器
#[derive(Debug, Clone)]
pub struct JoinOrderOptimizer {
    generator: CandidateGenerator,
    pruning: Arc<dyn JoinPruning>,
    calculator: Arc<dyn JoinStatisticsCalculator>,
    cost_calculator: CostCalculator,
    /// 每层前沿允许的最大状态数
    max_states: usize,
}

impl Default for JoinOrderOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATES)
    }
}

impl JoinOrderOptimizer {
    pub fn new(max_states: usize) -> Self {
        Self {
            generator: CandidateGenerator::new(),
            pruning: Arc::new(PruneJointEdge),
            calculator: Arc::new(HistogramCalculator),
            cost_calculator: CostCalculator::default(),
            max_states,
        }
    }

    pub fn with_pruning(mut self, pruning: Arc<dyn JoinPruning>) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn JoinStatisticsCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_cost_calculator(mut self, cost_calculator: CostCalculator) -> Self {
        self.cost_calculator = cost_calculator;
        self
    }

    pub fn max_states(&self) -> usize {
        self.max_states
    }

    /// 选择遍历起点
    ///
    /// 优先选择没有入边的节点，多个时取别名最小者；
    /// 每个节点都有入边时取别名最小的节点
    pub fn select_root(&self, component: &ConnectedComponent) -> NodeId {
        let by_alias = |a: &NodeId, b: &NodeId| component.alias(*a).cmp(component.alias(*b));
        let sources = component
            .nodes()
            .map(|(id, _)| id)
            .filter(|&id| component.in_edges(id).is_empty())
            .min_by(by_alias);
        sources
            .or_else(|| component.nodes().map(|(id, _)| id).min_by(by_alias))
            .unwrap_or(NodeId(0))
    }

    /// 优化连通分量的遍历顺序
    pub fn optimize(&self, component: &ConnectedComponent) -> OptimizeResult<MatchPlan> {
        let state = self.search(component)?;
        let plan = MatchPlan::from_state(component, &state);
        info!(
            "遍历计划完成: {} (基数 {:.2}, 代价 {:.2})",
            plan.aliases().join(" -> "),
            plan.estimated_cardinality,
            plan.estimated_cost
        );
        Ok(plan)
    }

    /// 搜索覆盖全部节点和边的状态
    pub fn search(&self, component: &ConnectedComponent) -> OptimizeResult<SearchState> {
        component.validate()?;

        let root = self.select_root(component);
        let seed = SearchState::seed(component, root);
        if seed.is_complete(component) {
            return Ok(seed);
        }

        let mut cache = StatisticsCache::new();
        let mut frontier = vec![seed];
        let mut layer = 0usize;

        loop {
            layer += 1;
            let mut next = Vec::new();
            let mut dead_end = None;

            for state in &frontier {
                let units = match self.generator.candidates(component, state) {
                    Ok(units) => units,
                    Err(e) => {
                        dead_end = Some(e);
                        continue;
                    }
                };
                for unit in units {
                    let extended = state.extend(
                        component,
                        &unit,
                        self.calculator.as_ref(),
                        &mut cache,
                        &self.cost_calculator,
                    );
                    if extended.is_complete(component) {
                        debug!(
                            "第 {} 层找到完整计划，统计缓存命中 {} 次，未命中 {} 次",
                            layer,
                            cache.hits(),
                            cache.misses()
                        );
                        return Ok(extended);
                    }
                    next.push(extended);
                }
            }

            let next = self.pruning.prune(component, next);
            debug!("第 {} 层: {} 个状态", layer, next.len());

            if next.is_empty() {
                return Err(dead_end.unwrap_or_else(|| {
                    OptimizeError::unsupported(format!("第 {} 层没有可扩展的状态", layer))
                }));
            }
            if next.len() > self.max_states {
                warn!(
                    "搜索空间超出上限: 第 {} 层有 {} 个状态，上限 {}",
                    layer,
                    next.len(),
                    self.max_states
                );
                return Err(OptimizeError::PlanSpaceExhausted {
                    layer,
                    states: next.len(),
                    max_states: self.max_states,
                });
            }
            frontier = next;
        }
    }
}
