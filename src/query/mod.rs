//! 查询模块
//!
//! ## 模块结构
//!
//! - `pattern` - 图模式模型
//! - `optimizer` - 图模式的连接顺序优化

pub mod optimizer;
pub mod pattern;
