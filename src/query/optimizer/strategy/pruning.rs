//! 搜索前沿剪枝策略

use std::collections::HashSet;
use std::fmt::Debug;

use crate::query::optimizer::plan::SearchState;
use crate::query::pattern::ConnectedComponent;

/// 前沿剪枝策略
///
/// 输入为一层扩展得到的全部状态，返回进入下一层的状态，顺序即搜索顺序
pub trait JoinPruning: Debug + Send + Sync {
    fn prune(&self, component: &ConnectedComponent, states: Vec<SearchState>) -> Vec<SearchState>;
}

/// 按 (代价, 基数, 遍历链别名) 排序
pub fn sort_frontier(component: &ConnectedComponent, states: &mut [SearchState]) {
    states.sort_by(|a, b| {
        a.cost()
            .total_cmp(&b.cost())
            .then_with(|| a.cardinality().total_cmp(&b.cardinality()))
            .then_with(|| a.chain_aliases(component).cmp(&b.chain_aliases(component)))
    });
}

/// 合并覆盖相同节点集合和边集合的状态，只保留代价最低的一个
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneJointEdge;

impl JoinPruning for PruneJointEdge {
    fn prune(&self, component: &ConnectedComponent, mut states: Vec<SearchState>) -> Vec<SearchState> {
        sort_frontier(component, &mut states);

        let mut seen = HashSet::with_capacity(states.len());
        let mut kept = Vec::with_capacity(states.len());
        for state in states {
            if seen.insert(state.signature()) {
                kept.push(state);
            }
        }
        kept
    }
}

/// 保留全部状态，只排序
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAllStates;

impl JoinPruning for KeepAllStates {
    fn prune(&self, component: &ConnectedComponent, mut states: Vec<SearchState>) -> Vec<SearchState> {
        sort_frontier(component, &mut states);
        states
    }
}
