//! 模式的 JSON 描述
//!
//! 语义分析器之外的调用方（例如命令行工具）用这种格式提交待优化的模式

use serde::{Deserialize, Serialize};

use super::{ConnectedComponent, MatchEdge, MatchNode, PathRange, PatternBuilder};
use crate::core::error::{DBResult, OptimizeError, OptimizeResult};
use crate::query::optimizer::stats::Statistics;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternDescription {
    pub components: Vec<ComponentDescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentDescription {
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub edges: Vec<EdgeDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    pub alias: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub predicates: Vec<String>,
    #[serde(default)]
    pub estimated_rows: Option<f64>,
    #[serde(default)]
    pub external: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub alias: String,
    pub source: String,
    pub sink: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub predicates: Vec<String>,
    #[serde(default)]
    pub average_degree: Option<f64>,
    /// 是否生成反向孪生边
    #[serde(default)]
    pub reversible: bool,
    #[serde(default)]
    pub path: Option<PathRange>,
    #[serde(default)]
    pub statistics: Option<StatisticsDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsDescription {
    pub row_count: f64,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub buckets: Vec<BucketDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketDescription {
    pub key: i64,
    pub count: f64,
    #[serde(default)]
    pub popular: bool,
}

impl PatternDescription {
    pub fn from_json(text: &str) -> DBResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 逐个构造连通分量，任何一个不合法都会返回错误
    pub fn into_components(self) -> OptimizeResult<Vec<ConnectedComponent>> {
        self.components
            .into_iter()
            .map(ComponentDescription::into_component)
            .collect()
    }
}

impl ComponentDescription {
    pub fn into_component(self) -> OptimizeResult<ConnectedComponent> {
        let mut builder = PatternBuilder::new();

        for desc in self.nodes {
            let mut node = MatchNode::new(desc.alias);
            node.label = desc.label;
            node.estimated_rows = desc.estimated_rows;
            node.external = desc.external;
            for predicate in desc.predicates {
                node = node.with_predicate(predicate);
            }
            builder.add_node(node);
        }

        for desc in self.edges {
            let source = builder.node_id(&desc.source).ok_or_else(|| {
                OptimizeError::malformed(format!("边 {} 的源节点 {} 不存在", desc.alias, desc.source))
            })?;
            let sink = builder.node_id(&desc.sink).ok_or_else(|| {
                OptimizeError::malformed(format!("边 {} 的汇节点 {} 不存在", desc.alias, desc.sink))
            })?;

            let mut edge = match desc.path {
                Some(range) => MatchEdge::path(desc.alias, source, sink, range),
                None => MatchEdge::new(desc.alias, source, sink),
            };
            edge.label = desc.label;
            edge.average_degree = desc.average_degree;
            edge.statistics = desc.statistics.map(StatisticsDescription::into_statistics);
            for predicate in desc.predicates {
                edge = edge.with_predicate(predicate);
            }

            let id = builder.add_edge(edge);
            if desc.reversible {
                builder.add_reversed(id)?;
            }
        }

        builder.build()
    }
}

impl StatisticsDescription {
    pub fn into_statistics(self) -> Statistics {
        let buckets = self
            .buckets
            .into_iter()
            .map(|b| (b.key, b.count, b.popular));
        let mut statistics = Statistics::from_buckets(self.row_count, buckets);
        if let Some(density) = self.density {
            statistics.density = density;
        }
        statistics
    }
}
