//! 检查定义模块
//!
//! 定义被监控端点的数据结构和校验逻辑

pub mod types;

// 重新导出主要类型
pub use types::{validate_check, Check, CheckState, Protocol};
