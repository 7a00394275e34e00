//! 模式边
//!
//! 边归属于源节点并指向汇节点。可变长度的连接用 `EdgeKind::Path` 表示。
//! 文档存储中只有源节点的文档保存邻接表，因此能够反向遍历的边在 arena
//! 中另有一条方向相反的孪生边。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{NodeId, Predicate};
use crate::query::optimizer::stats::Statistics;

/// 平均出度缺省值
pub const DEFAULT_AVERAGE_DEGREE: f64 = 1.0;

/// 边在连通分量中的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 边的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// 模式中声明的方向
    Forward,
    /// 反向孪生边
    Reversed,
}

/// 可变长度路径的跳数范围
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathRange {
    pub min_length: u32,
    /// None 表示无上界
    pub max_length: Option<u32>,
    /// 路径上每一跳都需要满足的属性等值约束
    #[serde(default)]
    pub attribute_equalities: BTreeMap<String, String>,
}

impl PathRange {
    pub fn new(min_length: u32, max_length: Option<u32>) -> Self {
        Self {
            min_length,
            max_length,
            attribute_equalities: BTreeMap::new(),
        }
    }

    pub fn with_equality(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute_equalities.insert(attribute.into(), value.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.max_length.map_or(true, |max| self.min_length <= max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeKind {
    Single,
    Path(PathRange),
}

/// 匹配模式中的一条有向边
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEdge {
    pub alias: String,
    /// 边类型，用于查找标签级统计信息
    pub label: Option<String>,
    pub source: NodeId,
    pub sink: NodeId,
    pub predicates: Vec<Predicate>,
    /// 每个源行期望匹配的汇行数，None 表示尚未由统计信息填充
    pub average_degree: Option<f64>,
    /// 连接列直方图
    pub statistics: Option<Statistics>,
    pub kind: EdgeKind,
    pub direction: EdgeDirection,
    /// 反向孪生边（正向边指向孪生边，孪生边指回正向边）
    pub(crate) reverse: Option<EdgeId>,
}

impl MatchEdge {
    pub fn new(alias: impl Into<String>, source: NodeId, sink: NodeId) -> Self {
        Self {
            alias: alias.into(),
            label: None,
            source,
            sink,
            predicates: Vec::new(),
            average_degree: None,
            statistics: None,
            kind: EdgeKind::Single,
            direction: EdgeDirection::Forward,
            reverse: None,
        }
    }

    /// 创建可变长度路径
    pub fn path(alias: impl Into<String>, source: NodeId, sink: NodeId, range: PathRange) -> Self {
        Self {
            kind: EdgeKind::Path(range),
            ..Self::new(alias, source, sink)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_degree(mut self, degree: f64) -> Self {
        self.average_degree = Some(degree);
        self
    }

    pub fn with_statistics(mut self, statistics: Statistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    pub fn with_predicate(mut self, expression: impl Into<String>) -> Self {
        self.predicates.push(Predicate::new(expression));
        self
    }

    pub fn degree(&self) -> f64 {
        self.average_degree.unwrap_or(DEFAULT_AVERAGE_DEGREE)
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, EdgeKind::Path(_))
    }

    pub fn path_range(&self) -> Option<&PathRange> {
        match &self.kind {
            EdgeKind::Path(range) => Some(range),
            EdgeKind::Single => None,
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.direction == EdgeDirection::Reversed
    }

    /// 是否存在可反向遍历的孪生边
    pub fn has_reversed(&self) -> bool {
        self.reverse.is_some()
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.sink
    }

    /// 给定一个端点，返回另一个端点
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.source == node {
            self.sink
        } else {
            self.source
        }
    }

    /// 构造方向相反的孪生边，谓词和统计信息保持不变
    pub(crate) fn reversed_twin(&self, forward_id: EdgeId) -> MatchEdge {
        MatchEdge {
            alias: self.alias.clone(),
            label: self.label.clone(),
            source: self.sink,
            sink: self.source,
            predicates: self.predicates.clone(),
            average_degree: self.average_degree,
            statistics: self.statistics.clone(),
            kind: self.kind.clone(),
            direction: EdgeDirection::Reversed,
            reverse: Some(forward_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_range_validity() {
        assert!(PathRange::new(1, Some(3)).is_valid());
        assert!(PathRange::new(2, None).is_valid());
        assert!(!PathRange::new(4, Some(2)).is_valid());
    }

    #[test]
    fn test_reversed_twin() {
        let edge = MatchEdge::new("knows", NodeId(0), NodeId(1)).with_degree(3.0);
        let twin = edge.reversed_twin(EdgeId(0));

        assert_eq!(twin.source, NodeId(1));
        assert_eq!(twin.sink, NodeId(0));
        assert!(twin.is_reversed());
        assert_eq!(twin.reverse, Some(EdgeId(0)));
        assert_eq!(twin.degree(), 3.0);
    }

    #[test]
    fn test_other_end() {
        let edge = MatchEdge::new("e", NodeId(2), NodeId(5));
        assert_eq!(edge.other_end(NodeId(2)), NodeId(5));
        assert_eq!(edge.other_end(NodeId(5)), NodeId(2));
    }
}
