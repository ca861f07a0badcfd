//! HTTP探测执行器实现
//!
//! 对单个检查发起一次出站请求，施加硬超时并分类结果

use crate::check::Check;
use crate::probe::outcome::{ProbeFailure, ProbeOutcome};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::str::FromStr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// 探测执行器trait，定义探测接口
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    /// 执行单次探测
    ///
    /// 所有失败模式都表示为结果值；执行器保证在检查配置的超时时间内
    /// 完成，且每次调用恰好产生一个结果，不会向边界外抛出错误
    ///
    /// # 参数
    /// * `check` - 检查定义
    ///
    /// # 返回
    /// * `ProbeOutcome` - 分类后的探测结果
    async fn probe(&self, check: &Check) -> ProbeOutcome;
}

/// HTTP探测执行器实现
pub struct HttpProbeExecutor {
    /// HTTP客户端
    client: Client,
}

impl HttpProbeExecutor {
    /// 创建新的HTTP探测执行器
    ///
    /// 客户端不设全局超时，超时由每个检查自己的配置控制
    ///
    /// # 返回
    /// * `Result<Self, reqwest::Error>` - 执行器实例
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;

        Ok(Self { client })
    }

    /// 构建HTTP请求
    fn build_request(&self, check: &Check) -> Result<reqwest::RequestBuilder, ProbeFailure> {
        // 方法在调度前已校验，这里的失败归类为连接失败
        let method = Method::from_str(&check.method.to_uppercase()).map_err(|_| {
            ProbeFailure::Connection {
                detail: format!("无效的HTTP方法: {}", check.method),
            }
        })?;

        Ok(self.client.request(method, check.url()))
    }

    /// 分类reqwest错误
    fn classify_error(error: &reqwest::Error) -> ProbeFailure {
        if error.is_timeout() {
            return ProbeFailure::Timeout;
        }

        let detail = if error.is_connect() {
            "Connection refused".to_string()
        } else if error.is_request() {
            "Invalid request".to_string()
        } else {
            let error_str = error.to_string();
            if error_str.contains("dns") || error_str.contains("DNS") {
                "DNS resolution failed".to_string()
            } else if error_str.contains("certificate")
                || error_str.contains("tls")
                || error_str.contains("ssl")
            {
                "SSL/TLS certificate error".to_string()
            } else {
                format!("Request failed: {error_str}")
            }
        };

        ProbeFailure::Connection { detail }
    }
}

#[async_trait]
impl ProbeExecutor for HttpProbeExecutor {
    async fn probe(&self, check: &Check) -> ProbeOutcome {
        let request = match self.build_request(check) {
            Ok(request) => request,
            Err(failure) => return ProbeOutcome::failure(failure),
        };

        debug!("探测检查 {}: {} {}", check.id, check.method, check.url());

        let hard_timeout = Duration::from_secs(check.timeout_seconds);
        match timeout(hard_timeout, request.send()).await {
            Ok(Ok(response)) => ProbeOutcome::response(response.status().as_u16()),
            Ok(Err(e)) => ProbeOutcome::failure(Self::classify_error(&e)),
            Err(_) => ProbeOutcome::failure(ProbeFailure::Timeout),
        }
    }
}
