//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Uptime Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum MonitorError {
    /// 检查定义校验错误
    #[error("检查定义校验错误: {0}")]
    Validation(#[from] ValidationError),

    /// 持久化相关错误
    #[error("持久化错误: {0}")]
    Persistence(#[from] PersistenceError),

    /// 通知发送相关错误
    #[error("通知错误: {0}")]
    Delivery(#[from] DeliveryError),

    /// 日志轮转相关错误
    #[error("日志轮转错误: {0}")]
    Rotation(#[from] RotationError),

    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 检查定义校验错误
///
/// 校验失败的检查在调度周期内被跳过并记录，不会中断整个周期
#[derive(Error, Debug)]
pub enum ValidationError {
    /// 必填字段缺失或为空
    #[error("检查缺少必填字段: {field}")]
    MissingField { field: String },

    /// 成功状态码集合为空
    #[error("检查 {id} 的成功状态码集合不能为空")]
    EmptySuccessCodes { id: String },

    /// 超时时间无效
    #[error("检查 {id} 的超时时间必须大于0")]
    ZeroTimeout { id: String },

    /// HTTP方法无效
    #[error("检查 {id} 的HTTP方法无效: {method}")]
    InvalidMethod { id: String, method: String },
}

/// 持久化错误类型
///
/// 写回失败时本周期的状态变更丢失，不发送告警，下个周期自然重试
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// 读取检查列表失败
    #[error("读取检查列表失败: {0}")]
    Read(String),

    /// 写回检查失败
    #[error("写回检查 {id} 失败: {reason}")]
    Write { id: String, reason: String },
}

/// 通知发送错误类型
///
/// 通知失败只记录，不回滚已持久化的状态
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    Send(String),

    /// 通知配置错误
    #[error("通知配置错误: {0}")]
    Config(String),
}

/// 日志轮转错误类型
///
/// 单个日志流的失败不影响其他流；压缩失败的流不会被截断
#[derive(Error, Debug)]
pub enum RotationError {
    /// 枚举活动日志流失败
    #[error("枚举活动日志流失败: {0}")]
    List(String),

    /// 压缩日志流失败
    #[error("压缩日志流 {stream} 失败: {reason}")]
    Compress { stream: String, reason: String },

    /// 截断日志流失败
    #[error("截断日志流 {stream} 失败: {reason}")]
    Truncate { stream: String, reason: String },
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, MonitorError>;
