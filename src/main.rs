//! Uptime Vitals 主程序入口
//!
//! 端点可用性监控工具

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use uptime_vitals::cli::args::{Args, Commands};
use uptime_vitals::cli::commands::{Command, ValidateCommand, VersionCommand};
use uptime_vitals::config::{ConfigLoader, TomlConfigLoader};
use uptime_vitals::core::Monitor;
use uptime_vitals::logging::{setup_logging, LogConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.json_log,
    };
    setup_logging(&log_config).context("初始化日志系统失败")?;

    info!("Uptime Vitals v{} 启动", uptime_vitals::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
async fn execute_command(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Start {
            interval,
            rotation_interval,
        } => execute_start_command(args, *interval, *rotation_interval).await,
        Commands::Validate => ValidateCommand
            .execute(args)
            .await
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Version => VersionCommand
            .execute(args)
            .await
            .map_err(|e| anyhow::anyhow!(e)),
    }
}

/// 执行启动命令
async fn execute_start_command(
    args: &Args,
    interval: Option<u64>,
    rotation_interval: Option<u64>,
) -> Result<()> {
    let loader = TomlConfigLoader::new(true);
    let mut config = loader
        .load_from_file(&args.config)
        .await
        .with_context(|| format!("加载配置文件失败: {}", args.config.display()))?;

    // 命令行参数覆盖配置文件中的周期
    if let Some(interval) = interval {
        config.global.check_interval_seconds = interval;
    }
    if let Some(rotation_interval) = rotation_interval {
        config.global.rotation_interval_seconds = rotation_interval;
    }

    info!(
        "已加载 {} 个检查，检查周期 {}s，轮转周期 {}s",
        config.checks.len(),
        config.global.check_interval_seconds,
        config.global.rotation_interval_seconds
    );

    let monitor = Monitor::from_config(&config).map_err(|e| anyhow::anyhow!(e))?;
    monitor
        .run_until_shutdown()
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
