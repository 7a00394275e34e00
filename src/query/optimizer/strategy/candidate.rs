//! 候选连接单元生成
//!
//! 给定部分计划，提出下一个可以加入计划的节点，并把它的边分为三组：
//! - 前置物化边：连接时必须已经取到的边，其中出度最小的一条是主边
//! - 后置物化边：连接完成后作为过滤条件检查的边
//! - 延迟边：另一端尚未加入计划，留给后续步骤
//!
//! 文档存储只在源节点的文档中保存邻接表，因此只有指向新节点的边
//! （或者有反向孪生边的出边）可以从已有结果逐行展开。

use serde::{Deserialize, Serialize};

use crate::core::error::{OptimizeError, OptimizeResult};
use crate::query::optimizer::plan::SearchState;
use crate::query::pattern::{ConnectedComponent, EdgeId, NodeId};

/// 连接方式提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinHint {
    /// 从已有结果沿边逐行展开
    Loop,
    /// 单独取出新节点后做哈希连接
    Hash,
}

impl std::fmt::Display for JoinHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinHint::Loop => write!(f, "loop"),
            JoinHint::Hash => write!(f, "hash"),
        }
    }
}

/// 候选连接单元
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateJoinUnit {
    pub node: NodeId,
    /// 主边，同时也是 `pre_materialized` 的第一条
    pub primary: EdgeId,
    /// 主边是否经由反向孪生边遍历
    pub via_reverse: bool,
    pub pre_materialized: Vec<EdgeId>,
    pub post_materialized: Vec<EdgeId>,
    pub unpopulated: Vec<EdgeId>,
    pub hint: JoinHint,
}

impl CandidateJoinUnit {
    /// 本步参与连接的所有边
    pub fn joined_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.pre_materialized
            .iter()
            .chain(self.post_materialized.iter())
            .copied()
    }
}

/// 候选生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateGenerator;

impl CandidateGenerator {
    pub fn new() -> Self {
        Self
    }

    /// 可以加入计划的节点，按别名排序
    ///
    /// 优先选择能从计划内沿边到达的节点；没有这样的节点时，
    /// 退而选择有边指向计划内节点的节点
    pub fn frontier(&self, component: &ConnectedComponent, state: &SearchState) -> Vec<NodeId> {
        let mut frontier: Vec<NodeId> = state.entry_nodes().collect();
        if frontier.is_empty() {
            frontier = component
                .nodes()
                .map(|(id, _)| id)
                .filter(|&id| !state.contains(id))
                .filter(|&id| {
                    component
                        .out_edges(id)
                        .iter()
                        .any(|&e| state.contains(component.edge(e).sink))
                })
                .collect();
        }
        frontier.sort_by(|a, b| component.alias(*a).cmp(component.alias(*b)));
        frontier
    }

    /// 每个可加入的节点各产生一个候选单元
    pub fn candidates(
        &self,
        component: &ConnectedComponent,
        state: &SearchState,
    ) -> OptimizeResult<Vec<CandidateJoinUnit>> {
        let frontier = self.frontier(component, state);
        if frontier.is_empty() {
            return Err(OptimizeError::unsupported(format!(
                "已物化 {} 个节点，没有可以继续连接的节点",
                state.node_count()
            )));
        }
        frontier
            .into_iter()
            .map(|node| {
                self.build_unit(component, state, node).ok_or_else(|| {
                    OptimizeError::unsupported(format!(
                        "节点 {} 与已物化的节点之间没有边",
                        component.alias(node)
                    ))
                })
            })
            .collect()
    }

    /// 按别名顺序的第一个候选单元
    pub fn propose(
        &self,
        component: &ConnectedComponent,
        state: &SearchState,
    ) -> OptimizeResult<CandidateJoinUnit> {
        let frontier = self.frontier(component, state);
        let node = frontier.first().copied().ok_or_else(|| {
            OptimizeError::unsupported(format!(
                "已物化 {} 个节点，没有可以继续连接的节点",
                state.node_count()
            ))
        })?;
        self.build_unit(component, state, node).ok_or_else(|| {
            OptimizeError::unsupported(format!(
                "节点 {} 与已物化的节点之间没有边",
                component.alias(node)
            ))
        })
    }

    /// 为节点划分边并选择连接方式，节点与计划之间没有边时返回 None
    pub fn build_unit(
        &self,
        component: &ConnectedComponent,
        state: &SearchState,
        node: NodeId,
    ) -> Option<CandidateJoinUnit> {
        // (边, 是否可以从计划内展开到新节点, 是否经由反向边)
        let mut joined: Vec<(EdgeId, bool, bool)> = Vec::new();
        let mut self_loops = Vec::new();
        let mut unpopulated = Vec::new();

        for (id, edge) in component.edges() {
            if edge.is_self_loop() {
                if edge.source == node {
                    self_loops.push(id);
                }
                continue;
            }
            if edge.sink == node {
                if state.contains(edge.source) {
                    joined.push((id, true, false));
                } else {
                    unpopulated.push(id);
                }
            } else if edge.source == node {
                if state.contains(edge.sink) {
                    let reversible = edge.has_reversed();
                    joined.push((id, reversible, reversible));
                } else {
                    unpopulated.push(id);
                }
            }
        }

        if joined.is_empty() {
            return None;
        }

        joined.sort_by(|(a, _, _), (b, _, _)| {
            let (ea, eb) = (component.edge(*a), component.edge(*b));
            ea.degree()
                .total_cmp(&eb.degree())
                .then_with(|| ea.alias.cmp(&eb.alias))
                .then_with(|| a.cmp(b))
        });

        let (primary, _, via_reverse) = joined[0];
        let mut pre_materialized = vec![primary];
        let mut post_materialized = Vec::new();
        let mut expandable = joined[0].1;
        for &(id, incoming, _) in joined.iter().skip(1) {
            if component.edge(id).degree() < 1.0 {
                pre_materialized.push(id);
                expandable |= incoming;
            } else {
                post_materialized.push(id);
            }
        }
        post_materialized.extend(self_loops);

        let hint = if expandable {
            JoinHint::Loop
        } else {
            JoinHint::Hash
        };

        Some(CandidateJoinUnit {
            node,
            primary,
            via_reverse,
            pre_materialized,
            post_materialized,
            unpopulated,
            hint,
        })
    }
}
