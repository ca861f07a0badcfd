//! 日志轮转模块
//!
//! 提供审计日志流的周期性压缩归档与截断功能

pub mod rotator;

// 重新导出主要类型
pub use rotator::{LogRotator, RotationSummary};
