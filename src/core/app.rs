//! 监控进程组装与生命周期管理
//!
//! 将注册表、日志存储、探测执行器、结果处理器、调度器和轮转器
//! 组装为一个长期运行的进程，由两个独立的定时器驱动

use crate::config::Config;
use crate::error::Result;
use crate::notification::{AlertSender, NoOpSender, SimpleTemplate, TwilioSmsSender};
use crate::probe::HttpProbeExecutor;
use crate::process::OutcomeProcessor;
use crate::rotate::LogRotator;
use crate::schedule::{CheckScheduler, Scheduler, SchedulerStatus};
use crate::store::{CheckRegistry, FsLogStore, LogStore, MemoryCheckRegistry};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 监控应用
pub struct Monitor {
    /// 检查调度器
    scheduler: Arc<CheckScheduler>,
    /// 日志轮转器
    rotator: Arc<LogRotator>,
}

impl Monitor {
    /// 从配置组装监控应用
    ///
    /// 注册表由配置文件中的检查列表播种；未配置Twilio时
    /// 使用空发送器，告警判定照常进行但不实际发送
    ///
    /// # 参数
    /// * `config` - 应用配置
    ///
    /// # 返回
    /// * `Result<Self>` - 监控应用实例
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry: Arc<dyn CheckRegistry> =
            Arc::new(MemoryCheckRegistry::with_checks(config.checks.clone()));

        let logs: Arc<dyn LogStore> = Arc::new(
            FsLogStore::new(&config.global.log_dir)
                .with_context(|| format!("创建日志目录失败: {}", config.global.log_dir))?,
        );

        let notifier: Arc<dyn AlertSender> = match &config.global.twilio {
            Some(twilio) => Arc::new(TwilioSmsSender::new(twilio)?),
            None => {
                warn!("未配置Twilio，告警将不会实际发送");
                Arc::new(NoOpSender)
            }
        };

        let mut processor = OutcomeProcessor::new(
            Arc::clone(&registry),
            Arc::clone(&logs),
            Some(notifier),
        );
        if let Some(template) = &config.global.alert_template {
            processor = processor.with_template(SimpleTemplate::new(template.clone()));
        }

        let executor = Arc::new(
            HttpProbeExecutor::new().context("创建HTTP探测执行器失败")?,
        );

        let scheduler = Arc::new(CheckScheduler::new(
            registry,
            executor,
            Arc::new(processor),
            Duration::from_secs(config.global.check_interval_seconds),
            config.global.max_concurrent_probes,
        ));

        let rotator = Arc::new(LogRotator::new(
            logs,
            Duration::from_secs(config.global.rotation_interval_seconds),
        ));

        Ok(Self { scheduler, rotator })
    }

    /// 启动两个独立的定时循环
    pub async fn start(&self) -> Result<()> {
        self.scheduler.start().await?;
        self.rotator.start().await;
        info!("监控进程已启动");
        Ok(())
    }

    /// 停止全部定时循环
    pub async fn stop(&self) {
        self.scheduler.stop().await;
        self.rotator.stop().await;
        info!("监控进程已停止");
    }

    /// 获取调度器状态
    pub async fn scheduler_status(&self) -> SchedulerStatus {
        self.scheduler.get_status().await
    }

    /// 运行至收到中断信号
    pub async fn run_until_shutdown(&self) -> Result<()> {
        self.start().await?;

        tokio::signal::ctrl_c()
            .await
            .context("等待中断信号失败")?;
        info!("收到中断信号，开始关闭");

        self.stop().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Check, Protocol};
    use crate::config::GlobalConfig;

    fn create_test_config(log_dir: &str) -> Config {
        Config {
            global: GlobalConfig {
                log_dir: log_dir.to_string(),
                ..Default::default()
            },
            checks: vec![Check {
                id: "web".to_string(),
                protocol: Protocol::Http,
                host: "localhost:8080".to_string(),
                path: "/".to_string(),
                method: "GET".to_string(),
                timeout_seconds: 5,
                success_codes: vec![200],
                state: None,
                last_checked: None,
                contact: "+8613800000000".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_monitor_assembly_and_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let config = create_test_config(dir.path().to_str().unwrap());

        let monitor = Monitor::from_config(&config).unwrap();
        monitor.start().await.unwrap();
        assert!(monitor.scheduler_status().await.is_running);

        monitor.stop().await;
        assert!(!monitor.scheduler_status().await.is_running);
    }
}
