//! 通知模块
//!
//! 提供告警发送接口、Twilio短信实现和消息模板功能

pub mod sender;
pub mod template;
pub mod twilio;

// 重新导出主要类型
pub use sender::{AlertSender, NoOpSender};
pub use template::{SimpleTemplate, TemplateContext, DEFAULT_ALERT_TEMPLATE};
pub use twilio::TwilioSmsSender;
