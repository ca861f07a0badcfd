//! Twilio短信发送器模块
//!
//! 实现基于Twilio Messages API的短信告警功能

use crate::config::types::TwilioConfig;
use crate::error::DeliveryError;
use crate::notification::sender::{validate_message, AlertSender};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Twilio短信发送器
pub struct TwilioSmsSender {
    /// HTTP客户端
    client: Client,
    /// 账户SID
    account_sid: String,
    /// 认证令牌
    auth_token: String,
    /// 发送方号码
    from_phone: String,
    /// API基础地址（测试时可替换）
    api_base: String,
}

impl TwilioSmsSender {
    /// 创建新的Twilio发送器
    ///
    /// # 参数
    /// * `config` - Twilio配置
    ///
    /// # 返回
    /// * `Result<Self, DeliveryError>` - 发送器实例
    pub fn new(config: &TwilioConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DeliveryError::Config(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_phone: config.from_phone.clone(),
            api_base: "https://api.twilio.com".to_string(),
        })
    }

    /// 替换API基础地址（仅用于测试）
    #[cfg(test)]
    fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    /// 构造Messages API地址
    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl AlertSender for TwilioSmsSender {
    async fn send(&self, address: &str, message: &str) -> Result<(), DeliveryError> {
        validate_message(address, message)?;

        debug!("发送短信告警到 {}", address);

        let params = [
            ("From", self.from_phone.as_str()),
            ("To", address),
            ("Body", message),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| DeliveryError::Send(format!("请求Twilio失败: {e}")))?;

        if response.status().is_success() {
            info!("短信告警发送成功: {}", address);
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("短信告警发送失败: {} - {}", status, text);
            Err(DeliveryError::Send(format!("Twilio返回状态码 {status}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> TwilioConfig {
        TwilioConfig {
            account_sid: "ACtest".to_string(),
            auth_token: "token".to_string(),
            from_phone: "+15005550006".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2010-04-01/Accounts/ACtest/Messages.json")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("To".to_string(), "+8613800000000".to_string()),
                mockito::Matcher::UrlEncoded("From".to_string(), "+15005550006".to_string()),
            ]))
            .with_status(201)
            .with_body(r#"{"sid": "SMtest"}"#)
            .create_async()
            .await;

        let sender = TwilioSmsSender::new(&create_test_config())
            .unwrap()
            .with_api_base(server.url());

        let result = sender.send("+8613800000000", "检查状态变化").await;
        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_api_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/2010-04-01/Accounts/ACtest/Messages.json")
            .with_status(401)
            .create_async()
            .await;

        let sender = TwilioSmsSender::new(&create_test_config())
            .unwrap()
            .with_api_base(server.url());

        let result = sender.send("+8613800000000", "检查状态变化").await;
        assert!(matches!(result, Err(DeliveryError::Send(_))));
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_message() {
        let sender = TwilioSmsSender::new(&create_test_config()).unwrap();
        let result = sender.send("+8613800000000", "").await;
        assert!(matches!(result, Err(DeliveryError::Config(_))));
    }
}
