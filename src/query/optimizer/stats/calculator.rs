//! 连接选择性计算
//!
//! 搜索每扩展一步，都要把该步连接的所有边的统计信息合并成一个选择性。
//! 同一对边在不同的搜索状态中会反复合并，合并结果缓存在 `StatisticsCache` 中，
//! 缓存只在一次优化调用内有效。

use std::collections::HashMap;
use std::fmt::Debug;

use super::histogram::degree_selectivity;
use super::Statistics;
use crate::query::pattern::{ConnectedComponent, EdgeId};

/// 连接统计计算策略
pub trait JoinStatisticsCalculator: Debug + Send + Sync {
    /// 单条边自身的统计信息
    fn edge_statistics(&self, component: &ConnectedComponent, edge: EdgeId) -> Statistics;

    /// 合并两个统计信息，返回合并结果和连接选择性
    fn merge(&self, cur: &Statistics, new: &Statistics) -> (Statistics, f64);

    /// 一步连接中所有边合并后的统计信息
    ///
    /// 结果的 `selectivity` 即该步的选择性，没有边时为 1.0
    fn join_statistics(
        &self,
        component: &ConnectedComponent,
        edges: &[EdgeId],
        cache: &mut StatisticsCache,
    ) -> Statistics {
        match edges {
            [] => Statistics::new(),
            [only] => self.cached_edge(component, *only, cache),
            [first, second, rest @ ..] => {
                let key = StatisticsCache::pair_key(*first, *second);
                let mut merged = match cache.get_pair(key) {
                    Some(stats) => stats,
                    None => {
                        let left = self.cached_edge(component, key.0, cache);
                        let right = self.cached_edge(component, key.1, cache);
                        let (stats, _) = self.merge(&left, &right);
                        cache.insert_pair(key, stats.clone());
                        stats
                    }
                };
                for edge in rest {
                    let next = self.cached_edge(component, *edge, cache);
                    merged = self.merge(&merged, &next).0;
                }
                merged
            }
        }
    }

    fn cached_edge(
        &self,
        component: &ConnectedComponent,
        edge: EdgeId,
        cache: &mut StatisticsCache,
    ) -> Statistics {
        if let Some(stats) = cache.get_edge(edge) {
            return stats;
        }
        let stats = self.edge_statistics(component, edge);
        cache.insert_edge(edge, stats.clone());
        stats
    }
}

/// 基于直方图合并的默认实现
///
/// 边没有直方图时只用平均出度估计：选择性 = min(1, 出度 / max(1, 汇节点行数))
#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramCalculator;

impl JoinStatisticsCalculator for HistogramCalculator {
    fn edge_statistics(&self, component: &ConnectedComponent, edge: EdgeId) -> Statistics {
        let match_edge = component.edge(edge);
        let mut stats = match_edge.statistics.clone().unwrap_or_default();
        stats.selectivity *= degree_selectivity(match_edge.degree(), component.sink_rows(edge));
        stats
    }

    fn merge(&self, cur: &Statistics, new: &Statistics) -> (Statistics, f64) {
        Statistics::merge(cur, new)
    }
}

/// 一次优化调用内的统计缓存
///
/// 成对合并结果以排序后的边索引对为键，合并运算对两侧对称
#[derive(Debug, Default)]
pub struct StatisticsCache {
    edges: HashMap<EdgeId, Statistics>,
    pairs: HashMap<(EdgeId, EdgeId), Statistics>,
    hits: u64,
    misses: u64,
}

impl StatisticsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair_key(a: EdgeId, b: EdgeId) -> (EdgeId, EdgeId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn get_edge(&mut self, edge: EdgeId) -> Option<Statistics> {
        let found = self.edges.get(&edge).cloned();
        self.record(found.is_some());
        found
    }

    fn insert_edge(&mut self, edge: EdgeId, stats: Statistics) {
        self.edges.insert(edge, stats);
    }

    fn get_pair(&mut self, key: (EdgeId, EdgeId)) -> Option<Statistics> {
        let found = self.pairs.get(&key).cloned();
        self.record(found.is_some());
        found
    }

    fn insert_pair(&mut self, key: (EdgeId, EdgeId), stats: Statistics) {
        self.pairs.insert(key, stats);
    }

    fn record(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len() + self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.pairs.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::pattern::{MatchEdge, MatchNode, PatternBuilder};

    fn fork() -> ConnectedComponent {
        let mut builder = PatternBuilder::new();
        let a = builder.add_node(MatchNode::new("a").with_rows(10.0));
        let b = builder.add_node(MatchNode::new("b").with_rows(4.0));
        let c = builder.add_node(MatchNode::new("c").with_rows(4.0));
        builder.add_edge(MatchEdge::new("ac", a, c).with_degree(2.0));
        builder.add_edge(
            MatchEdge::new("bc", b, c)
                .with_degree(1.0)
                .with_statistics(Statistics::from_buckets(40.0, vec![(1, 8.0, true)])),
        );
        builder.add_edge(MatchEdge::new("ab", a, b).with_degree(0.5));
        builder.build().unwrap()
    }

    #[test]
    fn test_degree_based_edge_statistics() {
        let component = fork();
        let ac = component.edge_by_alias("ac").unwrap();
        let stats = HistogramCalculator.edge_statistics(&component, ac);
        assert!(stats.is_empty());
        assert_eq!(stats.selectivity, 0.5);
    }

    #[test]
    fn test_histogram_edge_statistics() {
        let component = fork();
        let bc = component.edge_by_alias("bc").unwrap();
        let stats = HistogramCalculator.edge_statistics(&component, bc);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.selectivity, 0.25);
    }

    #[test]
    fn test_join_statistics_uses_cache() {
        let component = fork();
        let ac = component.edge_by_alias("ac").unwrap();
        let bc = component.edge_by_alias("bc").unwrap();
        let mut cache = StatisticsCache::new();

        let first = HistogramCalculator.join_statistics(&component, &[ac, bc], &mut cache);
        let misses = cache.misses();
        let second = HistogramCalculator.join_statistics(&component, &[bc, ac], &mut cache);

        assert_eq!(first, second);
        assert_eq!(cache.misses(), misses);
        assert!(cache.hits() > 0);
        // 一侧没有直方图时选择性为两侧先验选择性之积
        assert_eq!(first.selectivity, 0.5 * 0.25);
    }

    #[test]
    fn test_no_edges_is_neutral() {
        let component = fork();
        let mut cache = StatisticsCache::new();
        let stats = HistogramCalculator.join_statistics(&component, &[], &mut cache);
        assert_eq!(stats.selectivity, 1.0);
        assert!(cache.is_empty());
    }
}
