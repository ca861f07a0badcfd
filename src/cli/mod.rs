//! 命令行接口模块
//!
//! 提供命令行参数解析和子命令实现

pub mod args;
pub mod commands;

// 重新导出主要类型
pub use args::{Args, Commands, LogLevel};
pub use commands::{Command, ValidateCommand, VersionCommand};
