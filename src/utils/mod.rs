// 日志模块
pub mod logging;
