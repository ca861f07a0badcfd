//! 检查数据结构定义
//!
//! 定义被监控端点（检查）的结构体、状态枚举和校验逻辑

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 探测协议枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// 明文HTTP
    Http,
    /// TLS加密HTTPS
    Https,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// 检查状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// 端点可达且返回期望状态码
    Up,
    /// 端点不可达或状态码不符
    Down,
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckState::Up => write!(f, "up"),
            CheckState::Down => write!(f, "down"),
        }
    }
}

impl CheckState {
    /// 判断状态是否为可用
    pub fn is_up(&self) -> bool {
        matches!(self, CheckState::Up)
    }
}

/// 检查定义结构
///
/// 探测参数（协议、主机、路径、方法、超时、成功状态码）在注册后不可变；
/// `state`和`last_checked`是核心在每轮评估后写回的运行时字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// 检查唯一标识
    pub id: String,
    /// 探测协议
    pub protocol: Protocol,
    /// 目标主机（可带端口）
    pub host: String,
    /// 请求路径
    #[serde(default = "default_path")]
    pub path: String,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 探测超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// 期望的成功状态码列表
    pub success_codes: Vec<u16>,
    /// 最后一次评估得到的状态（首次探测前未设置）
    #[serde(default)]
    pub state: Option<CheckState>,
    /// 最后一次评估时间（首次探测前未设置）
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    /// 告警通知目标（手机号）
    pub contact: String,
}

impl Check {
    /// 构造完整的探测URL
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.host, self.path)
    }
}

// 默认值函数
fn default_path() -> String {
    "/".to_string()
}
fn default_method() -> String {
    "GET".to_string()
}
fn default_timeout() -> u64 {
    5
}

/// 校验检查定义
///
/// # 参数
/// * `check` - 要校验的检查定义
///
/// # 返回
/// * `Result<(), ValidationError>` - 校验结果
pub fn validate_check(check: &Check) -> Result<(), ValidationError> {
    if check.id.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "id".to_string(),
        });
    }

    if check.host.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "host".to_string(),
        });
    }

    if check.contact.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "contact".to_string(),
        });
    }

    if check.success_codes.is_empty() {
        return Err(ValidationError::EmptySuccessCodes {
            id: check.id.clone(),
        });
    }

    if check.timeout_seconds == 0 {
        return Err(ValidationError::ZeroTimeout {
            id: check.id.clone(),
        });
    }

    if Method::from_str(&check.method.to_uppercase()).is_err() {
        return Err(ValidationError::InvalidMethod {
            id: check.id.clone(),
            method: check.method.clone(),
        });
    }

    Ok(())
}
