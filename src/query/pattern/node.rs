//! 模式节点

use serde::{Deserialize, Serialize};

use super::{EdgeId, Predicate};

/// 节点估计行数缺省值（语义分析器没有提供时使用）
pub const DEFAULT_ESTIMATED_ROWS: f64 = 1.0;

/// 节点在连通分量中的索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 匹配模式中的一个节点
#[derive(Debug, Clone, PartialEq)]
pub struct MatchNode {
    /// 别名，在同一个模式内唯一
    pub alias: String,
    /// 顶点标签，用于查找标签级统计信息
    pub label: Option<String>,
    pub predicates: Vec<Predicate>,
    /// 估计行数，None 表示尚未由统计信息填充
    pub estimated_rows: Option<f64>,
    /// 在外层查询块中定义，只引用不重新物化
    pub external: bool,
    /// 出边（正向边）
    pub(crate) neighbors: Vec<EdgeId>,
    /// 以本节点为起点的反向孪生边
    pub(crate) reverse_neighbors: Vec<EdgeId>,
}

impl MatchNode {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            label: None,
            predicates: Vec::new(),
            estimated_rows: None,
            external: false,
            neighbors: Vec::new(),
            reverse_neighbors: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rows(mut self, rows: f64) -> Self {
        self.estimated_rows = Some(rows);
        self
    }

    pub fn with_predicate(mut self, expression: impl Into<String>) -> Self {
        self.predicates.push(Predicate::new(expression));
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// 估计行数，未知时取缺省值
    pub fn rows(&self) -> f64 {
        self.estimated_rows.unwrap_or(DEFAULT_ESTIMATED_ROWS)
    }

    pub fn neighbors(&self) -> &[EdgeId] {
        &self.neighbors
    }

    pub fn reverse_neighbors(&self) -> &[EdgeId] {
        &self.reverse_neighbors
    }

    pub fn has_predicates(&self) -> bool {
        !self.predicates.is_empty()
    }
}
