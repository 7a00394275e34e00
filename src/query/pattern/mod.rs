//! 图模式模块
//!
//! 描述查询模式中的一个连通分量：节点、有向边以及附加的谓词。
//! 连通分量由语义分析器构造，优化期间只读。
//!
//! ## 模块结构
//!
//! - `node` - 模式节点
//! - `edge` - 模式边与可变长度路径
//! - `component` - 连通分量 arena
//! - `builder` - 构造与校验
//! - `description` - JSON 描述格式

pub mod builder;
pub mod component;
pub mod description;
pub mod edge;
pub mod node;

use serde::{Deserialize, Serialize};

pub use builder::PatternBuilder;
pub use component::ConnectedComponent;
pub use description::{ComponentDescription, EdgeDescription, NodeDescription, PatternDescription};
pub use edge::{EdgeDirection, EdgeId, EdgeKind, MatchEdge, PathRange, DEFAULT_AVERAGE_DEGREE};
pub use node::{MatchNode, NodeId, DEFAULT_ESTIMATED_ROWS};

/// 附加在节点或边上的谓词
///
/// 优化器不解释谓词内容，只把它们原样交给下游的脚本生成器
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub expression: String,
}

impl Predicate {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}
