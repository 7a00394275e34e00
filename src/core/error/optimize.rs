//! 优化器错误类型
//!
//! 连接顺序优化的三类终止性错误：
//! - 模式不合法：在搜索开始前检测
//! - 模式不受支持：某个未完成的搜索状态找不到合法扩展
//! - 搜索空间耗尽：某一层的状态数超过上限
//!
//! 所有错误都在检测点立即返回，优化器内部不做重试

use thiserror::Error;

use super::codes::{ErrorCode, ToPublicError};

/// 优化器错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    /// 模式为空、不连通或者节点/边引用不一致
    #[error("图模式不合法: {0}")]
    MalformedPattern(String),

    /// 未完成的状态找不到任何合法扩展
    #[error("图模式不受支持: {0}")]
    UnsupportedPattern(String),

    /// 某一层的候选状态超过上限
    #[error("计划搜索空间耗尽: 第 {layer} 层产生 {states} 个状态, 上限 {max_states}")]
    PlanSpaceExhausted {
        layer: usize,
        states: usize,
        max_states: usize,
    },

    /// 统计信息错误
    #[error("统计信息错误: {0}")]
    Statistics(String),
}

/// 优化器结果类型
pub type OptimizeResult<T> = Result<T, OptimizeError>;

impl OptimizeError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        OptimizeError::MalformedPattern(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        OptimizeError::UnsupportedPattern(msg.into())
    }
}

impl ToPublicError for OptimizeError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            OptimizeError::MalformedPattern(_) => ErrorCode::MalformedPattern,
            OptimizeError::UnsupportedPattern(_) => ErrorCode::UnsupportedPattern,
            OptimizeError::PlanSpaceExhausted { .. } => ErrorCode::PlanSpaceExhausted,
            OptimizeError::Statistics(_) => ErrorCode::StatisticsUnavailable,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            OptimizeError::PlanSpaceExhausted { .. } | OptimizeError::UnsupportedPattern(_) => {
                "该图模式暂不支持".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_error_display() {
        let err = OptimizeError::malformed("component has no nodes");
        assert!(err.to_string().contains("图模式不合法"));

        let err = OptimizeError::PlanSpaceExhausted {
            layer: 1,
            states: 101,
            max_states: 100,
        };
        assert!(err.to_string().contains("101"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_public_error_hides_search_details() {
        let err = OptimizeError::PlanSpaceExhausted {
            layer: 3,
            states: 500,
            max_states: 100,
        };
        let public = err.to_public_error();
        assert_eq!(public.code, ErrorCode::PlanSpaceExhausted);
        assert_eq!(public.message, "该图模式暂不支持");
    }
}
