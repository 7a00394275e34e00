//! 连通分量构造器
//!
//! 供语义分析器使用：逐个添加节点和边，最后 `build` 时统一校验

use super::{ConnectedComponent, EdgeId, MatchEdge, MatchNode, NodeId};
use crate::core::error::{OptimizeError, OptimizeResult};

#[derive(Debug, Default)]
pub struct PatternBuilder {
    nodes: Vec<MatchNode>,
    edges: Vec<MatchEdge>,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: MatchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_edge(&mut self, mut edge: MatchEdge) -> EdgeId {
        edge.reverse = None;
        self.edges.push(edge);
        EdgeId(self.edges.len() - 1)
    }

    /// 为已有的正向边添加反向孪生边
    pub fn add_reversed(&mut self, forward: EdgeId) -> OptimizeResult<EdgeId> {
        let edge = self.edges.get(forward.index()).ok_or_else(|| {
            OptimizeError::malformed(format!("边索引 {} 不存在", forward.index()))
        })?;
        if edge.is_reversed() {
            return Err(OptimizeError::malformed(format!(
                "边 {} 本身就是反向边",
                edge.alias
            )));
        }
        if let Some(existing) = edge.reverse {
            return Ok(existing);
        }

        let twin = edge.reversed_twin(forward);
        self.edges.push(twin);
        let twin_id = EdgeId(self.edges.len() - 1);
        self.edges[forward.index()].reverse = Some(twin_id);
        Ok(twin_id)
    }

    pub fn node_id(&self, alias: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.alias == alias)
            .map(NodeId)
    }

    /// 按别名连接两个节点
    pub fn connect(
        &mut self,
        alias: impl Into<String>,
        source: &str,
        sink: &str,
    ) -> OptimizeResult<EdgeId> {
        let source_id = self
            .node_id(source)
            .ok_or_else(|| OptimizeError::malformed(format!("未知的源节点: {}", source)))?;
        let sink_id = self
            .node_id(sink)
            .ok_or_else(|| OptimizeError::malformed(format!("未知的汇节点: {}", sink)))?;
        Ok(self.add_edge(MatchEdge::new(alias, source_id, sink_id)))
    }

    pub fn build(self) -> OptimizeResult<ConnectedComponent> {
        let component = ConnectedComponent::from_parts(self.nodes, self.edges);
        component.validate()?;
        Ok(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::pattern::PathRange;

    #[test]
    fn test_empty_component_rejected() {
        let result = PatternBuilder::new().build();
        assert!(matches!(result, Err(OptimizeError::MalformedPattern(_))));
    }

    #[test]
    fn test_empty_alias_rejected() {
        let mut builder = PatternBuilder::new();
        builder.add_node(MatchNode::new(""));
        assert!(matches!(builder.build(), Err(OptimizeError::MalformedPattern(_))));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut builder = PatternBuilder::new();
        builder.add_node(MatchNode::new("a"));
        builder.add_node(MatchNode::new("a"));
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("重复"));
    }

    #[test]
    fn test_dangling_sink_rejected() {
        let mut builder = PatternBuilder::new();
        let a = builder.add_node(MatchNode::new("a"));
        builder.add_edge(MatchEdge::new("e", a, NodeId(7)));
        assert!(matches!(builder.build(), Err(OptimizeError::MalformedPattern(_))));
    }

    #[test]
    fn test_disconnected_rejected() {
        let mut builder = PatternBuilder::new();
        builder.add_node(MatchNode::new("a"));
        builder.add_node(MatchNode::new("b"));
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("不连通"));
    }

    #[test]
    fn test_negative_degree_rejected() {
        let mut builder = PatternBuilder::new();
        let a = builder.add_node(MatchNode::new("a"));
        let b = builder.add_node(MatchNode::new("b"));
        builder.add_edge(MatchEdge::new("e", a, b).with_degree(-1.0));
        assert!(matches!(builder.build(), Err(OptimizeError::MalformedPattern(_))));
    }

    #[test]
    fn test_invalid_path_range_rejected() {
        let mut builder = PatternBuilder::new();
        let a = builder.add_node(MatchNode::new("a"));
        let b = builder.add_node(MatchNode::new("b"));
        builder.add_edge(MatchEdge::path("p", a, b, PathRange::new(3, Some(1))));
        assert!(matches!(builder.build(), Err(OptimizeError::MalformedPattern(_))));
    }

    #[test]
    fn test_connect_by_alias() {
        let mut builder = PatternBuilder::new();
        builder.add_node(MatchNode::new("a"));
        builder.add_node(MatchNode::new("b"));
        builder.connect("ab", "a", "b").unwrap();
        assert!(builder.connect("ax", "a", "x").is_err());

        let component = builder.build().unwrap();
        assert_eq!(component.edge_count(), 1);
    }

    #[test]
    fn test_add_reversed_is_idempotent() {
        let mut builder = PatternBuilder::new();
        builder.add_node(MatchNode::new("a"));
        builder.add_node(MatchNode::new("b"));
        let ab = builder.connect("ab", "a", "b").unwrap();
        let first = builder.add_reversed(ab).unwrap();
        let second = builder.add_reversed(ab).unwrap();
        assert_eq!(first, second);
        assert!(builder.add_reversed(first).is_err());

        let component = builder.build().unwrap();
        assert_eq!(component.edge_count(), 1);
    }
}
