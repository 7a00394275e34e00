//! 对外错误码定义
//!
//! 查询编译器把优化器错误翻译成用户可见的编译期错误时使用这里的错误码。
//!
//! 错误码格式: XXYY
//! - XX: 错误类别 (00=成功, 03=模式校验, 05=资源, 06=规划, 09=系统)
//! - YY: 具体错误

use serde::{Deserialize, Serialize};

/// 对外错误码
///
/// 错误码一旦发布不应修改，调用方可以据此决定是否退回到未优化的计划
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    Success = 0,

    // ==================== 模式校验 (03xx) ====================
    /// 模式结构非法（空、不连通、引用不一致）
    MalformedPattern = 300,
    /// 配置项非法
    InvalidConfig = 301,

    // ==================== 资源 (05xx) ====================
    /// 搜索状态数超过上限
    PlanSpaceExhausted = 500,

    // ==================== 规划 (06xx) ====================
    /// 模式形状不受支持
    UnsupportedPattern = 600,
    /// 统计信息不可用
    StatisticsUnavailable = 601,

    // ==================== 系统 (09xx) ====================
    /// IO 或序列化失败
    InternalError = 900,
}

impl ErrorCode {
    /// 获取错误码的 i32 值
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// 根据 i32 值获取错误码
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Success),
            300 => Some(ErrorCode::MalformedPattern),
            301 => Some(ErrorCode::InvalidConfig),
            500 => Some(ErrorCode::PlanSpaceExhausted),
            600 => Some(ErrorCode::UnsupportedPattern),
            601 => Some(ErrorCode::StatisticsUnavailable),
            900 => Some(ErrorCode::InternalError),
            _ => None,
        }
    }

    /// 获取默认的错误消息
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "成功",
            ErrorCode::MalformedPattern => "图模式不合法",
            ErrorCode::InvalidConfig => "配置不合法",
            ErrorCode::PlanSpaceExhausted => "计划搜索空间超出上限",
            ErrorCode::UnsupportedPattern => "该图模式暂不支持",
            ErrorCode::StatisticsUnavailable => "统计信息不可用",
            ErrorCode::InternalError => "内部错误",
        }
    }

    /// 调用方提高上限或换用朴素计划后可以重新尝试
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::PlanSpaceExhausted)
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Success
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.default_message())
    }
}

/// 对外错误信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicError {
    pub code: ErrorCode,
    pub message: String,
}

impl PublicError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// 内部错误到对外错误的转换
pub trait ToPublicError {
    fn to_public_error(&self) -> PublicError {
        PublicError::new(self.to_error_code(), self.to_public_message())
    }

    fn to_error_code(&self) -> ErrorCode;

    fn to_public_message(&self) -> String;
}
