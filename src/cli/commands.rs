//! CLI子命令实现
//!
//! 实现配置校验、版本显示等辅助命令

use crate::cli::args::Args;
use crate::config::{ConfigLoader, TomlConfigLoader};
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// 命令trait，定义子命令的执行接口
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    ///
    /// # 参数
    /// * `args` - 命令行参数
    ///
    /// # 返回
    /// * `Result<()>` - 执行结果
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 配置校验命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(&args.config).await?;

        info!(
            "配置文件校验通过: {} 个检查，检查周期 {}s，轮转周期 {}s",
            config.checks.len(),
            config.global.check_interval_seconds,
            config.global.rotation_interval_seconds
        );
        println!("配置文件校验通过: {}", args.config.display());
        Ok(())
    }
}

/// 版本信息命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, _args: &Args) -> Result<()> {
        println!("{} v{}", crate::APP_NAME, crate::VERSION);
        println!("{}", crate::APP_DESCRIPTION);
        Ok(())
    }
}
