//! 搜索状态
//!
//! 动态规划中的一个部分计划。状态一旦放入搜索前沿就不再修改，
//! 扩展时复制前驱状态再应用一个候选单元。遍历链以尾部在前的共享链表保存，
//! 复制状态时不复制已有的步骤。

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::query::optimizer::cost::CostCalculator;
use crate::query::optimizer::stats::{JoinStatisticsCalculator, StatisticsCache};
use crate::query::optimizer::strategy::{CandidateJoinUnit, JoinHint};
use crate::query::pattern::{ConnectedComponent, EdgeId, NodeId};

/// 遍历链中的一步
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStep {
    pub node: NodeId,
    /// 第一步没有边
    pub edge: Option<EdgeId>,
    pub via_reverse: bool,
    pub hint: Option<JoinHint>,
    pub pre_materialized: Vec<EdgeId>,
    pub post_materialized: Vec<EdgeId>,
    /// 本步连接的选择性
    pub selectivity: f64,
    /// 本步之后的估计行数
    pub estimated_rows: f64,
}

#[derive(Debug)]
struct ChainLink {
    step: ChainStep,
    prev: Option<Rc<ChainLink>>,
}

/// 部分计划
#[derive(Debug, Clone)]
pub struct SearchState {
    nodes: BTreeSet<NodeId>,
    /// 正向边是否已物化
    edge_materialized: BTreeMap<EdgeId, bool>,
    /// 已物化节点被非主边再次连接的次数
    split_counts: BTreeMap<NodeId, usize>,
    /// 尚未物化的节点 -> 从已物化节点到达它的边
    unmaterialized_nodes: BTreeMap<NodeId, Vec<EdgeId>>,
    /// 每个已物化节点取文档时需要一并物化的出边
    materialized_edges: BTreeMap<NodeId, Vec<EdgeId>>,
    tail: Option<Rc<ChainLink>>,
    cardinality: f64,
    cost: f64,
}

/// 外部节点在每个外层结果行中只绑定一个值
fn effective_rows(component: &ConnectedComponent, node: NodeId) -> f64 {
    let match_node = component.node(node);
    if match_node.external {
        1.0
    } else {
        match_node.rows()
    }
}

impl SearchState {
    /// 以单个节点为起点的状态
    pub fn seed(component: &ConnectedComponent, node: NodeId) -> Self {
        let rows = effective_rows(component, node);
        let mut state = Self {
            nodes: BTreeSet::from([node]),
            edge_materialized: component.edges().map(|(id, _)| (id, false)).collect(),
            split_counts: BTreeMap::from([(node, 0)]),
            unmaterialized_nodes: BTreeMap::new(),
            materialized_edges: BTreeMap::from([(node, component.out_edges(node).to_vec())]),
            tail: None,
            cardinality: rows,
            cost: rows,
        };

        for &edge in component.out_edges(node) {
            if component.edge(edge).is_self_loop() {
                state.edge_materialized.insert(edge, true);
            }
        }
        state.record_entries(component, node);
        state.push_step(ChainStep {
            node,
            edge: None,
            via_reverse: false,
            hint: None,
            pre_materialized: Vec::new(),
            post_materialized: Vec::new(),
            selectivity: 1.0,
            estimated_rows: rows,
        });
        state
    }

    /// 复制当前状态并应用候选单元
    pub fn extend(
        &self,
        component: &ConnectedComponent,
        unit: &CandidateJoinUnit,
        calculator: &dyn JoinStatisticsCalculator,
        cache: &mut StatisticsCache,
        cost_calculator: &CostCalculator,
    ) -> Self {
        let node = unit.node;
        let mut next = self.clone();
        next.nodes.insert(node);
        next.split_counts.insert(node, 0);

        let joined: Vec<EdgeId> = unit.joined_edges().collect();
        for &edge in &joined {
            next.edge_materialized.insert(edge, true);
            let match_edge = component.edge(edge);
            if edge != unit.primary && !match_edge.is_self_loop() {
                *next.split_counts.entry(match_edge.other_end(node)).or_insert(0) += 1;
            }
        }

        let own_edges = joined
            .iter()
            .chain(unit.unpopulated.iter())
            .copied()
            .filter(|&e| component.edge(e).source == node)
            .collect();
        next.materialized_edges.insert(node, own_edges);
        next.record_entries(component, node);

        let selectivity = calculator
            .join_statistics(component, &joined, cache)
            .selectivity;
        let rows = effective_rows(component, node);
        let cardinality = self.cardinality * rows * selectivity;

        let primary_degree = match component.reverse_of(unit.primary) {
            Some(twin) if unit.via_reverse => component.edge(twin).degree(),
            _ => component.edge(unit.primary).degree(),
        };
        next.cost += cost_calculator.calculate_step_cost(
            unit.hint,
            self.cardinality,
            rows,
            primary_degree,
            cardinality,
            unit.post_materialized.len(),
        );
        next.cardinality = cardinality;

        next.push_step(ChainStep {
            node,
            edge: Some(unit.primary),
            via_reverse: unit.via_reverse,
            hint: Some(unit.hint),
            pre_materialized: unit.pre_materialized.clone(),
            post_materialized: unit.post_materialized.clone(),
            selectivity,
            estimated_rows: cardinality,
        });
        next
    }

    /// 记录从新节点出发可以到达的未物化节点
    fn record_entries(&mut self, component: &ConnectedComponent, node: NodeId) {
        self.unmaterialized_nodes.remove(&node);
        for (id, edge) in component.edges() {
            let target = if edge.source == node {
                edge.sink
            } else if edge.sink == node && edge.has_reversed() {
                edge.source
            } else {
                continue;
            };
            if target != node && !self.nodes.contains(&target) {
                self.unmaterialized_nodes.entry(target).or_default().push(id);
            }
        }
    }

    fn push_step(&mut self, step: ChainStep) {
        self.tail = Some(Rc::new(ChainLink {
            step,
            prev: self.tail.take(),
        }));
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// 有入口边的未物化节点
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.unmaterialized_nodes.keys().copied()
    }

    pub fn entry_edges(&self, node: NodeId) -> &[EdgeId] {
        self.unmaterialized_nodes
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_edge_materialized(&self, edge: EdgeId) -> bool {
        self.edge_materialized.get(&edge).copied().unwrap_or(false)
    }

    pub fn materialized_edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_materialized
            .iter()
            .filter(|(_, materialized)| **materialized)
            .map(|(id, _)| *id)
    }

    pub fn split_count(&self, node: NodeId) -> usize {
        self.split_counts.get(&node).copied().unwrap_or(0)
    }

    pub fn materialized_edges(&self) -> &BTreeMap<NodeId, Vec<EdgeId>> {
        &self.materialized_edges
    }

    pub fn cardinality(&self) -> f64 {
        self.cardinality
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// 所有节点和边都已物化
    pub fn is_complete(&self, component: &ConnectedComponent) -> bool {
        self.nodes.len() == component.node_count()
            && self.edge_materialized.values().all(|materialized| *materialized)
    }

    /// 按遍历顺序排列的步骤
    pub fn chain(&self) -> Vec<ChainStep> {
        let mut steps = Vec::with_capacity(self.nodes.len());
        let mut link = self.tail.as_deref();
        while let Some(current) = link {
            steps.push(current.step.clone());
            link = current.prev.as_deref();
        }
        steps.reverse();
        steps
    }

    /// 遍历顺序中的节点别名
    pub fn chain_aliases<'a>(&self, component: &'a ConnectedComponent) -> Vec<&'a str> {
        let mut aliases = Vec::with_capacity(self.nodes.len());
        let mut link = self.tail.as_deref();
        while let Some(current) = link {
            aliases.push(component.alias(current.step.node));
            link = current.prev.as_deref();
        }
        aliases.reverse();
        aliases
    }

    /// 覆盖的节点集合和已物化边集合，用于合并等价状态
    pub fn signature(&self) -> (Vec<NodeId>, Vec<EdgeId>) {
        (self.nodes().collect(), self.materialized_edge_ids().collect())
    }
}
