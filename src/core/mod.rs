//! 核心应用模块
//!
//! 负责组装各组件并管理监控进程的生命周期

pub mod app;

// 重新导出主要类型
pub use app::Monitor;
