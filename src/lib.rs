//! Uptime Vitals - 端点可用性监控工具
//!
//! 这是一个用Rust编写的端点可用性监控工具，支持：
//! - HTTP/HTTPS端点周期性探测
//! - 基于状态转换的告警（up↔down）
//! - 探测结果持久化与审计日志
//! - 日志流周期性压缩轮转
//! - 结构化日志记录

pub mod check;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod notification;
pub mod probe;
pub mod process;
pub mod rotate;
pub mod schedule;
pub mod store;

// 重新导出主要类型
pub use check::{Check, CheckState, Protocol};
pub use error::{MonitorError, Result};
pub use probe::{HttpProbeExecutor, ProbeExecutor, ProbeFailure, ProbeOutcome};
pub use process::{LogRecord, OutcomeProcessor, ProcessedOutcome};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
