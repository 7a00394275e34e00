//! 连通分量
//!
//! 节点和边都存放在 arena 中，通过稳定的整数索引访问。构造完成后拓扑不再变化，
//! 搜索状态只保存索引集合，复制状态不会复制节点或边对象。

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::hash::{Hash, Hasher};

use super::{EdgeId, EdgeKind, MatchEdge, MatchNode, NodeId};
use crate::core::error::{OptimizeError, OptimizeResult};

/// 查询模式中的一个连通分量
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedComponent {
    nodes: Vec<MatchNode>,
    /// 正向边和反向孪生边
    edges: Vec<MatchEdge>,
    alias_index: BTreeMap<String, NodeId>,
}

impl ConnectedComponent {
    /// 由 `PatternBuilder` 调用，调用方负责随后执行 `validate`
    pub(crate) fn from_parts(mut nodes: Vec<MatchNode>, edges: Vec<MatchEdge>) -> Self {
        for node in nodes.iter_mut() {
            node.neighbors.clear();
            node.reverse_neighbors.clear();
        }
        for (index, edge) in edges.iter().enumerate() {
            if let Some(source) = nodes.get_mut(edge.source.index()) {
                if edge.is_reversed() {
                    source.reverse_neighbors.push(EdgeId(index));
                } else {
                    source.neighbors.push(EdgeId(index));
                }
            }
        }
        let alias_index = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.alias.clone(), NodeId(index)))
            .collect();
        Self {
            nodes,
            edges,
            alias_index,
        }
    }

    pub fn node(&self, id: NodeId) -> &MatchNode {
        &self.nodes[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &MatchEdge {
        &self.edges[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 正向边数量（不含反向孪生边）
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.is_reversed()).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MatchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// 遍历正向边
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &MatchEdge)> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_reversed())
            .map(|(i, e)| (EdgeId(i), e))
    }

    /// 节点的正向出边
    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        self.node(node).neighbors()
    }

    /// 指向节点的正向入边
    pub fn in_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.edges()
            .filter(|(_, e)| e.sink == node && e.source != node)
            .map(|(id, _)| id)
            .collect()
    }

    /// 查找边的反向孪生边
    pub fn reverse_of(&self, edge: EdgeId) -> Option<EdgeId> {
        self.edge(edge).reverse
    }

    pub fn node_by_alias(&self, alias: &str) -> Option<NodeId> {
        self.alias_index.get(alias).copied()
    }

    pub fn edge_by_alias(&self, alias: &str) -> Option<EdgeId> {
        self.edges()
            .find(|(_, e)| e.alias == alias)
            .map(|(id, _)| id)
    }

    pub fn alias(&self, node: NodeId) -> &str {
        &self.node(node).alias
    }

    /// 边的汇节点估计行数
    pub fn sink_rows(&self, edge: EdgeId) -> f64 {
        self.node(self.edge(edge).sink).rows()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut MatchNode> {
        self.nodes.iter_mut()
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut MatchEdge> {
        self.edges.iter_mut()
    }

    /// 校验连通分量的结构
    ///
    /// 空分量、空别名、重复别名、悬空端点、非法估计值、非法路径范围以及
    /// 不连通的分量都会返回 `MalformedPattern`
    pub fn validate(&self) -> OptimizeResult<()> {
        if self.nodes.is_empty() {
            return Err(OptimizeError::malformed("连通分量中没有节点"));
        }

        let mut aliases = BTreeSet::new();
        for node in &self.nodes {
            if node.alias.is_empty() {
                return Err(OptimizeError::malformed("节点别名为空"));
            }
            if !aliases.insert(node.alias.as_str()) {
                return Err(OptimizeError::malformed(format!(
                    "节点别名重复: {}",
                    node.alias
                )));
            }
            if let Some(rows) = node.estimated_rows {
                if !rows.is_finite() || rows < 0.0 {
                    return Err(OptimizeError::malformed(format!(
                        "节点 {} 的估计行数非法: {}",
                        node.alias, rows
                    )));
                }
            }
        }

        let mut edge_aliases = BTreeSet::new();
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.alias.is_empty() {
                return Err(OptimizeError::malformed("边别名为空"));
            }
            if edge.source.index() >= self.nodes.len() || edge.sink.index() >= self.nodes.len() {
                return Err(OptimizeError::malformed(format!(
                    "边 {} 引用了不在分量中的节点",
                    edge.alias
                )));
            }
            if let Some(degree) = edge.average_degree {
                if !degree.is_finite() || degree < 0.0 {
                    return Err(OptimizeError::malformed(format!(
                        "边 {} 的平均出度非法: {}",
                        edge.alias, degree
                    )));
                }
            }
            if let EdgeKind::Path(range) = &edge.kind {
                if !range.is_valid() {
                    return Err(OptimizeError::malformed(format!(
                        "路径 {} 的长度范围非法",
                        edge.alias
                    )));
                }
            }
            if let Some(stats) = &edge.statistics {
                if !stats.is_valid() {
                    return Err(OptimizeError::malformed(format!(
                        "边 {} 的统计信息非法",
                        edge.alias
                    )));
                }
            }
            match edge.reverse {
                Some(twin) => {
                    let consistent = self
                        .edges
                        .get(twin.index())
                        .map(|t| {
                            t.reverse == Some(EdgeId(index))
                                && t.source == edge.sink
                                && t.sink == edge.source
                                && t.is_reversed() != edge.is_reversed()
                        })
                        .unwrap_or(false);
                    if !consistent {
                        return Err(OptimizeError::malformed(format!(
                            "边 {} 的反向孪生边不一致",
                            edge.alias
                        )));
                    }
                }
                None if edge.is_reversed() => {
                    return Err(OptimizeError::malformed(format!(
                        "反向边 {} 缺少对应的正向边",
                        edge.alias
                    )));
                }
                None => {}
            }
            if !edge.is_reversed() && !edge_aliases.insert(edge.alias.as_str()) {
                return Err(OptimizeError::malformed(format!(
                    "边别名重复: {}",
                    edge.alias
                )));
            }
        }

        if let Some(unreachable) = self.first_unreachable() {
            return Err(OptimizeError::malformed(format!(
                "连通分量不连通: 节点 {} 不可达",
                self.alias(unreachable)
            )));
        }

        Ok(())
    }

    /// 忽略方向做广度优先遍历，返回第一个不可达的节点
    fn first_unreachable(&self) -> Option<NodeId> {
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (_, edge) in self.edges() {
            adjacency[edge.source.index()].push(edge.sink.index());
            adjacency[edge.sink.index()].push(edge.source.index());
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([0usize]);
        visited[0] = true;
        while let Some(current) = queue.pop_front() {
            for &next in &adjacency[current] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        visited.iter().position(|v| !v).map(NodeId)
    }

    /// 分量指纹，用作计划缓存键
    ///
    /// 覆盖拓扑、别名、标签、谓词、估计值和统计信息
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.nodes.len().hash(&mut hasher);
        for node in &self.nodes {
            node.alias.hash(&mut hasher);
            node.label.hash(&mut hasher);
            node.predicates.hash(&mut hasher);
            node.estimated_rows.map(f64::to_bits).hash(&mut hasher);
            node.external.hash(&mut hasher);
        }
        self.edges.len().hash(&mut hasher);
        for edge in &self.edges {
            edge.alias.hash(&mut hasher);
            edge.label.hash(&mut hasher);
            edge.source.hash(&mut hasher);
            edge.sink.hash(&mut hasher);
            edge.predicates.hash(&mut hasher);
            edge.average_degree.map(f64::to_bits).hash(&mut hasher);
            edge.direction.hash(&mut hasher);
            edge.reverse.hash(&mut hasher);
            edge.path_range().hash(&mut hasher);
            if let Some(stats) = &edge.statistics {
                stats.hash_into(&mut hasher);
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::pattern::PatternBuilder;

    fn chain() -> ConnectedComponent {
        let mut builder = PatternBuilder::new();
        let a = builder.add_node(MatchNode::new("a"));
        let b = builder.add_node(MatchNode::new("b"));
        let c = builder.add_node(MatchNode::new("c"));
        builder.add_edge(MatchEdge::new("ab", a, b));
        let bc = builder.add_edge(MatchEdge::new("bc", b, c));
        builder.add_reversed(bc).expect("reversed twin");
        builder.build().expect("valid chain")
    }

    #[test]
    fn test_accessors() {
        let component = chain();
        assert_eq!(component.node_count(), 3);
        assert_eq!(component.edge_count(), 2);

        let b = component.node_by_alias("b").unwrap();
        assert_eq!(component.out_edges(b).len(), 1);
        assert_eq!(component.in_edges(b).len(), 1);
        assert_eq!(component.node(b).reverse_neighbors().len(), 0);

        let c = component.node_by_alias("c").unwrap();
        assert_eq!(component.node(c).reverse_neighbors().len(), 1);
    }

    #[test]
    fn test_reverse_lookup() {
        let component = chain();
        let ab = component.edge_by_alias("ab").unwrap();
        let bc = component.edge_by_alias("bc").unwrap();

        assert_eq!(component.reverse_of(ab), None);
        let twin = component.reverse_of(bc).expect("bc has a twin");
        assert_eq!(component.reverse_of(twin), Some(bc));
        assert!(component.edge(twin).is_reversed());
    }

    #[test]
    fn test_fingerprint_changes_with_degree() {
        let component = chain();
        let mut modified = component.clone();
        for edge in modified.edges_mut() {
            edge.average_degree = Some(7.0);
        }
        assert_eq!(component.fingerprint(), chain().fingerprint());
        assert_ne!(component.fingerprint(), modified.fingerprint());
    }
}
