//! 统一错误处理系统 for DocGraph
//!
//! ## 设计理念
//!
//! 1. **按模块划分**：优化器错误使用结构化枚举 `OptimizeError`，
//!    配置、IO、序列化等外部错误统一收敛到 `DBError`
//!
//! 2. **分层转换**：
//!    - 核心错误使用 `#[from]` 注解自动转换
//!    - 外部错误使用自定义 `From` 实现转换为字符串，降低模块耦合
//!
//! 3. **统一接口**：`DBResult<T>` 提供统一的返回类型，简化错误传播

use thiserror::Error;

pub mod codes;
pub mod optimize;

pub use codes::{ErrorCode, PublicError, ToPublicError};
pub use optimize::{OptimizeError, OptimizeResult};

/// 统一的错误类型
#[derive(Error, Debug, Clone)]
pub enum DBError {
    #[error("优化错误: {0}")]
    Optimize(#[from] OptimizeError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(String),

    #[error("序列化错误: {0}")]
    Serialization(String),
}

/// 统一的结果类型
pub type DBResult<T> = Result<T, DBError>;

// ==================== 对外错误转换实现 ====================

impl ToPublicError for DBError {
    fn to_error_code(&self) -> ErrorCode {
        match self {
            DBError::Optimize(oe) => oe.to_error_code(),
            DBError::Config(_) => ErrorCode::InvalidConfig,
            DBError::Io(_) => ErrorCode::InternalError,
            DBError::Serialization(_) => ErrorCode::InternalError,
        }
    }

    fn to_public_message(&self) -> String {
        match self {
            DBError::Optimize(oe) => oe.to_public_message(),
            DBError::Io(_) => "IO操作失败".to_string(),
            DBError::Serialization(_) => "数据序列化失败".to_string(),
            _ => self.to_string(),
        }
    }
}

// ==================== 外部错误转换实现 ====================

impl From<std::io::Error> for DBError {
    fn from(err: std::io::Error) -> Self {
        DBError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DBError {
    fn from(err: serde_json::Error) -> Self {
        DBError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DBError {
    fn from(err: toml::de::Error) -> Self {
        DBError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DBError {
    fn from(err: toml::ser::Error) -> Self {
        DBError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_error_conversion() {
        let err: DBError = OptimizeError::unsupported("dead end").into();
        assert!(matches!(err, DBError::Optimize(_)));
        assert_eq!(err.to_error_code(), ErrorCode::UnsupportedPattern);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DBError = json_err.into();
        assert!(matches!(err, DBError::Serialization(_)));
        assert_eq!(err.to_public_message(), "数据序列化失败");
    }
}
