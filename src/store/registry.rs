//! 检查注册表接口
//!
//! 检查定义归外部注册表所有，核心每轮评估持有瞬态副本，
//! 只写回变更的运行时字段（state、last_checked）

use crate::check::Check;
use crate::error::PersistenceError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 检查注册表trait
#[async_trait]
pub trait CheckRegistry: Send + Sync {
    /// 列出当前注册的全部检查
    ///
    /// # 返回
    /// * `Result<Vec<Check>, PersistenceError>` - 检查列表
    async fn list_checks(&self) -> Result<Vec<Check>, PersistenceError>;

    /// 写回单个检查
    ///
    /// 写入以检查id为键独立作用于单条记录，并发写回不同检查互不干扰；
    /// 同一检查的并发写回采用后写者胜出语义
    ///
    /// # 参数
    /// * `check` - 要写回的检查
    ///
    /// # 返回
    /// * `Result<(), PersistenceError>` - 写回结果
    async fn write_check(&self, check: &Check) -> Result<(), PersistenceError>;
}

/// 内存检查注册表实现
///
/// 用于测试和从配置文件播种的单机运行模式
#[derive(Debug, Default)]
pub struct MemoryCheckRegistry {
    /// 检查存储，以检查id为键
    checks: RwLock<HashMap<String, Check>>,
}

impl MemoryCheckRegistry {
    /// 创建空的内存注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 用初始检查集合创建注册表
    pub fn with_checks(checks: Vec<Check>) -> Self {
        let map = checks
            .into_iter()
            .map(|check| (check.id.clone(), check))
            .collect();
        Self {
            checks: RwLock::new(map),
        }
    }

    /// 插入或覆盖一个检查
    pub async fn insert(&self, check: Check) {
        let mut checks = self.checks.write().await;
        checks.insert(check.id.clone(), check);
    }

    /// 按id读取检查
    pub async fn get(&self, id: &str) -> Option<Check> {
        let checks = self.checks.read().await;
        checks.get(id).cloned()
    }
}

#[async_trait]
impl CheckRegistry for MemoryCheckRegistry {
    async fn list_checks(&self) -> Result<Vec<Check>, PersistenceError> {
        let checks = self.checks.read().await;
        Ok(checks.values().cloned().collect())
    }

    async fn write_check(&self, check: &Check) -> Result<(), PersistenceError> {
        let mut checks = self.checks.write().await;
        checks.insert(check.id.clone(), check.clone());
        Ok(())
    }
}
