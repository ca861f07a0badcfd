//! 探测结果数据结构
//!
//! 定义单次探测的分类结果和一次性完成标记

use serde::{Deserialize, Serialize};

/// 探测失败分类
///
/// 探测失败是结果值而不是管道错误，最终转化为`down`状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeFailure {
    /// 请求超过检查配置的超时时间
    Timeout,
    /// 传输层失败（连接拒绝、DNS解析失败、TLS错误等）
    Connection {
        /// 失败详情描述
        detail: String,
    },
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeFailure::Timeout => write!(f, "请求超时"),
            ProbeFailure::Connection { detail } => write!(f, "连接失败: {detail}"),
        }
    }
}

/// 单次探测的结果
///
/// 不变式：完成的探测中`error`和`response_code`恰好有一个存在，
/// 由构造函数保证。`sent`是一次性完成标记，用于在传输层可能同时
/// 触发响应事件和错误事件时防止重复进入后续处理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// 探测失败信息（收到响应时为空）
    pub error: Option<ProbeFailure>,
    /// HTTP响应状态码（仅在收到响应时存在）
    pub response_code: Option<u16>,
    /// 一次性完成标记，不参与序列化
    #[serde(skip)]
    sent: bool,
}

impl ProbeOutcome {
    /// 创建收到响应的探测结果
    pub fn response(response_code: u16) -> Self {
        Self {
            error: None,
            response_code: Some(response_code),
            sent: false,
        }
    }

    /// 创建探测失败的结果
    pub fn failure(failure: ProbeFailure) -> Self {
        Self {
            error: Some(failure),
            response_code: None,
            sent: false,
        }
    }

    /// 判断结果是否已进入后续处理
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// 标记结果已进入后续处理
    ///
    /// 首次调用返回`true`，之后的调用返回`false`，
    /// 调用方据此跳过重复处理
    pub fn mark_sent(&mut self) -> bool {
        if self.sent {
            return false;
        }
        self.sent = true;
        true
    }
}

impl PartialEq for ProbeOutcome {
    fn eq(&self, other: &Self) -> bool {
        // sent标记是处理层状态，不参与结果等值比较
        self.error == other.error && self.response_code == other.response_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_response_invariant() {
        let outcome = ProbeOutcome::response(200);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.response_code, Some(200));
    }

    #[test]
    fn test_outcome_failure_invariant() {
        let outcome = ProbeOutcome::failure(ProbeFailure::Timeout);
        assert_eq!(outcome.error, Some(ProbeFailure::Timeout));
        assert!(outcome.response_code.is_none());

        let outcome = ProbeOutcome::failure(ProbeFailure::Connection {
            detail: "Connection refused".to_string(),
        });
        assert!(outcome.response_code.is_none());
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_mark_sent_is_one_shot() {
        let mut outcome = ProbeOutcome::response(200);
        assert!(!outcome.is_sent());
        assert!(outcome.mark_sent());
        assert!(outcome.is_sent());
        assert!(!outcome.mark_sent());
        assert!(!outcome.mark_sent());
    }

    #[test]
    fn test_failure_serde_tagging() {
        let json = serde_json::to_string(&ProbeFailure::Timeout).unwrap();
        assert!(json.contains("\"kind\":\"timeout\""));

        let json = serde_json::to_string(&ProbeFailure::Connection {
            detail: "DNS resolution failed".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"kind\":\"connection\""));
        assert!(json.contains("DNS resolution failed"));
    }

    #[test]
    fn test_sent_flag_not_serialized() {
        let mut outcome = ProbeOutcome::response(200);
        outcome.mark_sent();

        let json = serde_json::to_string(&outcome).unwrap();
        let deserialized: ProbeOutcome = serde_json::from_str(&json).unwrap();
        // 反序列化后的结果重新处于未处理状态
        assert!(!deserialized.is_sent());
        assert_eq!(deserialized, outcome);
    }
}
