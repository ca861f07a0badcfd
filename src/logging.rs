//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能

use log::LevelFilter;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
        }
    }
}

/// 全局日志初始化状态
static LOGGING_INITIALIZED: OnceLock<Mutex<bool>> = OnceLock::new();

/// 初始化日志系统
///
/// 线程安全的单次初始化，重复调用是安全的空操作
///
/// # 参数
/// * `config` - 日志配置
///
/// # 返回
/// * `anyhow::Result<()>` - 初始化结果
pub fn setup_logging(config: &LogConfig) -> anyhow::Result<()> {
    let initialized = LOGGING_INITIALIZED.get_or_init(|| Mutex::new(false));
    let mut initialized = initialized.lock().unwrap();
    if *initialized {
        return Ok(());
    }

    // log crate 到 tracing 的桥接
    tracing_log::LogTracer::init().ok();

    let env_filter =
        EnvFilter::from_default_env().add_directive(convert_level_to_directive(config.level));

    let result = if config.json_format {
        let fmt_layer = fmt::layer()
            .json()
            .with_timer(fmt::time::ChronoUtc::rfc_3339());
        registry().with(env_filter).with(fmt_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_ansi(true);
        registry().with(env_filter).with(fmt_layer).try_init()
    };

    match result {
        Ok(()) => {
            *initialized = true;
            tracing::debug!("日志系统初始化完成: {:?}", config);
            Ok(())
        }
        Err(e) => {
            let error_msg = e.to_string();
            // 全局subscriber已存在时视为已初始化（测试环境常见）
            if error_msg.contains("already been set") || error_msg.contains("already initialized") {
                *initialized = true;
                Ok(())
            } else {
                Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", error_msg))
            }
        }
    }
}

/// 将 log::LevelFilter 转换为 tracing 的指令
fn convert_level_to_directive(level: LevelFilter) -> tracing_subscriber::filter::Directive {
    use tracing_subscriber::filter::Directive;
    match level {
        LevelFilter::Off => "off".parse().expect("off是合法的过滤指令"),
        LevelFilter::Error => Directive::from(tracing::Level::ERROR),
        LevelFilter::Warn => Directive::from(tracing::Level::WARN),
        LevelFilter::Info => Directive::from(tracing::Level::INFO),
        LevelFilter::Debug => Directive::from(tracing::Level::DEBUG),
        LevelFilter::Trace => Directive::from(tracing::Level::TRACE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        let config = LogConfig::default();
        assert!(setup_logging(&config).is_ok());
        // 重复初始化是安全的空操作
        assert!(setup_logging(&config).is_ok());
    }

    #[test]
    fn test_default_log_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::Info);
        assert!(!config.json_format);
    }
}
