//! 结果处理模块
//!
//! 消费探测结果，计算新状态，判定告警并触发持久化与日志副作用

pub mod processor;
pub mod record;

// 重新导出主要类型
pub use processor::{OutcomeProcessor, ProcessedOutcome};
pub use record::LogRecord;
