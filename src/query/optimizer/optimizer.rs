//! 匹配优化器
//!
//! 面向调用方的入口：填充统计信息、查询计划缓存、执行连接顺序搜索。
//! 互不相关的连通分量可以并行优化。

use std::borrow::Cow;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::config::OptimizerConfig;
use crate::core::error::{DBResult, OptimizeResult};
use crate::query::optimizer::plan::{MatchPlan, PlanCache, PlanCacheKey, PlanCacheStats};
use crate::query::optimizer::stats::{JoinStatisticsCalculator, StatisticsManager};
use crate::query::optimizer::strategy::{JoinOrderOptimizer, JoinPruning};
use crate::query::pattern::ConnectedComponent;

/// 匹配优化器
#[derive(Debug)]
pub struct MatchOptimizer {
    config: OptimizerConfig,
    join_order: JoinOrderOptimizer,
    stats_manager: Option<Arc<StatisticsManager>>,
    plan_cache: Option<PlanCache>,
}

impl MatchOptimizer {
    pub fn new(config: OptimizerConfig) -> DBResult<Self> {
        config.validate()?;
        Ok(Self {
            join_order: JoinOrderOptimizer::new(config.max_states),
            plan_cache: PlanCache::new(config.plan_cache_capacity),
            stats_manager: None,
            config,
        })
    }

    /// 优化前用统计信息管理器填充缺失的估计值
    pub fn with_statistics(mut self, stats_manager: Arc<StatisticsManager>) -> Self {
        self.stats_manager = Some(stats_manager);
        self
    }

    pub fn with_pruning(mut self, pruning: Arc<dyn JoinPruning>) -> Self {
        self.join_order = self.join_order.with_pruning(pruning);
        self.clear_cache();
        self
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn JoinStatisticsCalculator>) -> Self {
        self.join_order = self.join_order.with_calculator(calculator);
        self.clear_cache();
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn join_order(&self) -> &JoinOrderOptimizer {
        &self.join_order
    }

    /// 优化单个连通分量
    pub fn optimize(&self, component: &ConnectedComponent) -> OptimizeResult<MatchPlan> {
        let component = match &self.stats_manager {
            Some(manager) => Cow::Owned(manager.annotate(component)),
            None => Cow::Borrowed(component),
        };

        let Some(cache) = &self.plan_cache else {
            return self.join_order.optimize(&component);
        };

        let key = PlanCacheKey::new(
            component.fingerprint(),
            self.config.max_states,
            self.stats_manager.as_ref().map_or(0, |m| m.version()),
        );
        cache.get_or_compute(key, || self.join_order.optimize(&component))
    }

    /// 优化多个连通分量，结果顺序与输入一致
    pub fn optimize_components(
        &self,
        components: &[ConnectedComponent],
    ) -> Vec<OptimizeResult<MatchPlan>> {
        debug!(
            "优化 {} 个连通分量 (并行: {})",
            components.len(),
            self.config.parallel
        );
        if self.config.parallel && components.len() > 1 {
            components.par_iter().map(|c| self.optimize(c)).collect()
        } else {
            components.iter().map(|c| self.optimize(c)).collect()
        }
    }

    pub fn plan_cache_stats(&self) -> Option<PlanCacheStats> {
        self.plan_cache.as_ref().map(PlanCache::stats)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.plan_cache {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{DBError, OptimizeError};
    use crate::query::optimizer::stats::TagStatistics;
    use crate::query::pattern::{MatchEdge, MatchNode, PatternBuilder};

    fn labeled_pair() -> ConnectedComponent {
        let mut builder = PatternBuilder::new();
        let a = builder.add_node(MatchNode::new("a").with_label("Person"));
        let b = builder.add_node(MatchNode::new("b").with_label("City"));
        builder.add_edge(MatchEdge::new("ab", a, b));
        builder.build().unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MatchOptimizer::new(OptimizerConfig::default().with_max_states(0));
        assert!(matches!(result, Err(DBError::Config(_))));
    }

    #[test]
    fn test_cache_hit_on_repeat() {
        let optimizer = MatchOptimizer::new(OptimizerConfig::default()).unwrap();
        let component = labeled_pair();

        let first = optimizer.optimize(&component).unwrap();
        let second = optimizer.optimize(&component).unwrap();
        assert_eq!(first, second);

        let stats = optimizer.plan_cache_stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_statistics_update_invalidates_cache() {
        let manager = Arc::new(StatisticsManager::new());
        let optimizer = MatchOptimizer::new(OptimizerConfig::default())
            .unwrap()
            .with_statistics(manager.clone());
        let component = labeled_pair();

        let before = optimizer.optimize(&component).unwrap();
        manager.update_tag_stats(TagStatistics::new("Person", 50.0)).unwrap();
        let after = optimizer.optimize(&component).unwrap();

        assert_eq!(optimizer.plan_cache_stats().unwrap().hits, 0);
        assert!(after.estimated_cost > before.estimated_cost);
    }

    #[test]
    fn test_disabled_cache() {
        let config = OptimizerConfig {
            plan_cache_capacity: 0,
            ..OptimizerConfig::default()
        };
        let optimizer = MatchOptimizer::new(config).unwrap();
        assert!(optimizer.optimize(&labeled_pair()).is_ok());
        assert!(optimizer.plan_cache_stats().is_none());
    }

    #[test]
    fn test_components_keep_input_order() {
        let optimizer = MatchOptimizer::new(OptimizerConfig::default()).unwrap();

        let mut builder = PatternBuilder::new();
        builder.add_node(MatchNode::new("solo"));
        let solo = builder.build().unwrap();

        let results = optimizer.optimize_components(&[labeled_pair(), solo]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().aliases(), vec!["a", "b"]);
        assert_eq!(results[1].as_ref().unwrap().aliases(), vec!["solo"]);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let optimizer =
            MatchOptimizer::new(OptimizerConfig::default().with_max_states(1)).unwrap();

        let mut builder = PatternBuilder::new();
        let hub = builder.add_node(MatchNode::new("hub"));
        for leaf in ["x", "y"] {
            let id = builder.add_node(MatchNode::new(leaf));
            builder.add_edge(MatchEdge::new(format!("hub_{}", leaf), hub, id));
        }
        let component = builder.build().unwrap();

        for _ in 0..2 {
            assert!(matches!(
                optimizer.optimize(&component),
                Err(OptimizeError::PlanSpaceExhausted { .. })
            ));
        }
        assert_eq!(optimizer.plan_cache_stats().unwrap().inserts, 0);
    }
}
