//! 配置管理模块
//!
//! 提供TOML配置文件解析、校验和环境变量替换功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{ConfigLoader, TomlConfigLoader};
pub use types::{validate_config, Config, GlobalConfig, TwilioConfig};
