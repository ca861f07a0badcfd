//! 消息模板模块
//!
//! 提供告警消息的模板渲染功能

use crate::check::{Check, CheckState};

/// 默认告警模板
///
/// 渲染结果包含方法、协议、主机和新状态，状态值为`up`/`down`
pub const DEFAULT_ALERT_TEMPLATE: &str =
    "告警: 您的检查 {{method}} {{protocol}}://{{host}}{{path}} 当前状态为 {{state}}";

/// 模板上下文数据
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// HTTP方法
    pub method: String,
    /// 探测协议
    pub protocol: String,
    /// 目标主机
    pub host: String,
    /// 请求路径
    pub path: String,
    /// 新计算出的状态
    pub state: String,
}

impl TemplateContext {
    /// 从检查和新状态构建上下文
    pub fn from_transition(check: &Check, state: CheckState) -> Self {
        Self {
            method: check.method.to_uppercase(),
            protocol: check.protocol.to_string(),
            host: check.host.clone(),
            path: check.path.clone(),
            state: state.to_string(),
        }
    }
}

/// 简单的字符串替换模板
#[derive(Debug, Clone)]
pub struct SimpleTemplate {
    /// 模板字符串
    template: String,
}

impl SimpleTemplate {
    /// 创建新的简单模板
    pub fn new(template: String) -> Self {
        Self { template }
    }

    /// 渲染模板
    ///
    /// # 参数
    /// * `context` - 模板上下文
    ///
    /// # 返回
    /// * `String` - 渲染后的消息
    pub fn render(&self, context: &TemplateContext) -> String {
        self.template
            .replace("{{method}}", &context.method)
            .replace("{{protocol}}", &context.protocol)
            .replace("{{host}}", &context.host)
            .replace("{{path}}", &context.path)
            .replace("{{state}}", &context.state)
    }
}

impl Default for SimpleTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_TEMPLATE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Protocol;

    fn create_test_check() -> Check {
        Check {
            id: "check-1".to_string(),
            protocol: Protocol::Https,
            host: "example.com".to_string(),
            path: "/health".to_string(),
            method: "get".to_string(),
            timeout_seconds: 5,
            success_codes: vec![200],
            state: Some(CheckState::Up),
            last_checked: None,
            contact: "+8613800000000".to_string(),
        }
    }

    #[test]
    fn test_default_template_rendering() {
        let check = create_test_check();
        let context = TemplateContext::from_transition(&check, CheckState::Down);
        let message = SimpleTemplate::default().render(&context);

        assert!(message.contains("GET"));
        assert!(message.contains("https"));
        assert!(message.contains("example.com"));
        assert!(message.contains("down"));
    }

    #[test]
    fn test_custom_template_rendering() {
        let check = create_test_check();
        let context = TemplateContext::from_transition(&check, CheckState::Up);
        let template = SimpleTemplate::new("{{host}} 已恢复 {{state}}".to_string());

        assert_eq!(template.render(&context), "example.com 已恢复 up");
    }
}
