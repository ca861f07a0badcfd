//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use crate::check::{validate_check, Check};
use serde::{Deserialize, Serialize};

/// 主配置结构，包含全局配置和检查列表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 全局配置项
    pub global: GlobalConfig,
    /// 检查定义列表（用于播种注册表）
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 检查周期（秒）
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// 日志轮转周期（秒）
    #[serde(default = "default_rotation_interval")]
    pub rotation_interval_seconds: u64,
    /// 最大并发探测数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_probes: usize,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 审计日志目录
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// 告警消息模板（可选，缺省使用内置模板）
    pub alert_template: Option<String>,
    /// Twilio短信配置（未配置时不发送告警）
    pub twilio: Option<TwilioConfig>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: default_check_interval(),
            rotation_interval_seconds: default_rotation_interval(),
            max_concurrent_probes: default_max_concurrent(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            alert_template: None,
            twilio: None,
        }
    }
}

/// Twilio短信配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwilioConfig {
    /// 账户SID
    pub account_sid: String,
    /// 认证令牌
    pub auth_token: String,
    /// 发送方号码
    pub from_phone: String,
}

// 默认值函数
fn default_check_interval() -> u64 {
    60
}
fn default_rotation_interval() -> u64 {
    86400
}
fn default_max_concurrent() -> usize {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_dir() -> String {
    "./logs".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    // 验证全局配置
    if config.global.check_interval_seconds == 0 {
        return Err("检查周期不能为0".to_string());
    }

    if config.global.rotation_interval_seconds == 0 {
        return Err("日志轮转周期不能为0".to_string());
    }

    if config.global.max_concurrent_probes == 0 {
        return Err("最大并发探测数不能为0".to_string());
    }

    // 验证日志级别
    let valid_log_levels = ["debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.global.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.global.log_level, valid_log_levels
        ));
    }

    // 验证Twilio配置（如果提供）
    if let Some(ref twilio) = config.global.twilio {
        if twilio.account_sid.trim().is_empty()
            || twilio.auth_token.trim().is_empty()
            || twilio.from_phone.trim().is_empty()
        {
            return Err("Twilio配置的account_sid、auth_token和from_phone不能为空".to_string());
        }
    }

    // 验证检查定义
    for check in &config.checks {
        validate_check(check).map_err(|e| e.to_string())?;
    }

    Ok(())
}
