//! 优化结果
//!
//! 遍历链交给下游的脚本生成器，物化边表告诉它取每个节点的文档时
//! 需要一并展开哪些出边。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ChainStep, SearchState};
use crate::query::optimizer::strategy::JoinHint;
use crate::query::pattern::{ConnectedComponent, EdgeId, NodeId};

/// 对模式边的引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub id: EdgeId,
    pub alias: String,
    /// 经由反向孪生边遍历
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reversed: bool,
}

impl EdgeRef {
    pub fn new(component: &ConnectedComponent, id: EdgeId) -> Self {
        Self {
            id,
            alias: component.edge(id).alias.clone(),
            reversed: false,
        }
    }
}

/// 遍历链中的一步
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalStep {
    pub node: NodeId,
    pub alias: String,
    /// 连接到本节点所用的主边，第一步为 None
    pub edge: Option<EdgeRef>,
    pub join_hint: Option<JoinHint>,
    pub pre_materialized: Vec<EdgeRef>,
    pub post_materialized: Vec<EdgeRef>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
    pub selectivity: f64,
    pub estimated_rows: f64,
}

impl TraversalStep {
    fn from_chain_step(component: &ConnectedComponent, step: ChainStep) -> Self {
        let refs = |edges: &[EdgeId]| -> Vec<EdgeRef> {
            edges.iter().map(|&e| EdgeRef::new(component, e)).collect()
        };
        let node = component.node(step.node);
        Self {
            node: step.node,
            alias: node.alias.clone(),
            edge: step.edge.map(|e| EdgeRef {
                reversed: step.via_reverse,
                ..EdgeRef::new(component, e)
            }),
            join_hint: step.hint,
            pre_materialized: refs(&step.pre_materialized),
            post_materialized: refs(&step.post_materialized),
            external: node.external,
            selectivity: step.selectivity,
            estimated_rows: step.estimated_rows,
        }
    }
}

/// 一个连通分量的遍历计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPlan {
    pub chain: Vec<TraversalStep>,
    /// 节点别名 -> 取该节点文档时一并物化的出边
    pub materialized_edges: BTreeMap<String, Vec<EdgeRef>>,
    /// 节点别名 -> 被非主边再次连接的次数，只列出非零项
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub split_counts: BTreeMap<String, usize>,
    pub estimated_cardinality: f64,
    pub estimated_cost: f64,
}

impl MatchPlan {
    pub fn from_state(component: &ConnectedComponent, state: &SearchState) -> Self {
        let chain = state
            .chain()
            .into_iter()
            .map(|step| TraversalStep::from_chain_step(component, step))
            .collect();

        let materialized_edges = state
            .materialized_edges()
            .iter()
            .map(|(node, edges)| {
                let refs = edges.iter().map(|&e| EdgeRef::new(component, e)).collect();
                (component.alias(*node).to_string(), refs)
            })
            .collect();

        let split_counts = state
            .nodes()
            .filter(|&n| state.split_count(n) > 0)
            .map(|n| (component.alias(n).to_string(), state.split_count(n)))
            .collect();

        Self {
            chain,
            materialized_edges,
            split_counts,
            estimated_cardinality: state.cardinality(),
            estimated_cost: state.cost(),
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// 遍历顺序中的节点别名
    pub fn aliases(&self) -> Vec<&str> {
        self.chain.iter().map(|s| s.alias.as_str()).collect()
    }

    pub fn step(&self, alias: &str) -> Option<&TraversalStep> {
        self.chain.iter().find(|s| s.alias == alias)
    }

    /// 计划中出现过的所有边别名（去重）
    pub fn covered_edges(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .chain
            .iter()
            .flat_map(|s| s.pre_materialized.iter().chain(s.post_materialized.iter()))
            .chain(self.materialized_edges.values().flatten())
            .map(|e| e.alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases.dedup();
        aliases
    }
}
