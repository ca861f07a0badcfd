//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Uptime Vitals - 端点可用性监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "uptime-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "UPTIME_VITALS_CONFIG",
        default_value = "uptime-vitals.toml"
    )]
    pub config: PathBuf,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "UPTIME_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否使用JSON格式日志
    #[arg(long, help = "以JSON格式输出日志")]
    pub json_log: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动监控服务
    Start {
        /// 检查周期（秒），覆盖配置文件中的值
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "检查周期（秒）",
            env = "UPTIME_VITALS_INTERVAL"
        )]
        interval: Option<u64>,

        /// 日志轮转周期（秒），覆盖配置文件中的值
        #[arg(long, value_name = "SECONDS", help = "日志轮转周期（秒）")]
        rotation_interval: Option<u64>,
    },

    /// 校验配置文件
    Validate,

    /// 显示版本信息
    Version,
}
