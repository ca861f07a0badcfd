//! 外部协作者接口模块
//!
//! 定义检查注册表和日志存储的窄接口，核心只通过这些接口访问外部服务

pub mod logstore;
pub mod registry;

// 重新导出主要类型
pub use logstore::{FsLogStore, LogStore, MemoryLogStore};
pub use registry::{CheckRegistry, MemoryCheckRegistry};
