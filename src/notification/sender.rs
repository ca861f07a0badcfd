//! 告警发送器模块
//!
//! 定义告警发送的trait和基础实现

use crate::error::DeliveryError;
use async_trait::async_trait;

/// 短信内容的最大长度
pub const MAX_MESSAGE_LENGTH: usize = 1600;

/// 告警发送器trait
#[async_trait]
pub trait AlertSender: Send + Sync {
    /// 发送告警消息
    ///
    /// # 参数
    /// * `address` - 通知目标（手机号）
    /// * `message` - 消息内容
    ///
    /// # 返回
    /// * `Result<(), DeliveryError>` - 发送结果
    async fn send(&self, address: &str, message: &str) -> Result<(), DeliveryError>;
}

/// 空的告警发送器实现（用于测试或禁用通知）
pub struct NoOpSender;

#[async_trait]
impl AlertSender for NoOpSender {
    async fn send(&self, _address: &str, _message: &str) -> Result<(), DeliveryError> {
        // 不执行任何操作
        Ok(())
    }
}

/// 校验消息参数
///
/// # 参数
/// * `address` - 通知目标
/// * `message` - 消息内容
///
/// # 返回
/// * `Result<(), DeliveryError>` - 校验结果
pub fn validate_message(address: &str, message: &str) -> Result<(), DeliveryError> {
    if address.trim().is_empty() {
        return Err(DeliveryError::Config("通知目标不能为空".to_string()));
    }

    let message = message.trim();
    if message.is_empty() {
        return Err(DeliveryError::Config("消息内容不能为空".to_string()));
    }

    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(DeliveryError::Config(format!(
            "消息长度超过{MAX_MESSAGE_LENGTH}字符上限"
        )));
    }

    Ok(())
}
