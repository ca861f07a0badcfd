//! 探测模块
//!
//! 提供单次端点探测的执行、超时控制和结果分类功能

pub mod executor;
pub mod outcome;

// 重新导出主要类型
pub use executor::{HttpProbeExecutor, ProbeExecutor};
pub use outcome::{ProbeFailure, ProbeOutcome};
