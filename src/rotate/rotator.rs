//! 日志轮转器实现
//!
//! 在独立的长周期定时器上运行：枚举活动日志流，逐个压缩为
//! 带时间戳后缀的归档，压缩确认成功后才截断活动流。
//! 单个流的失败不影响其他流的处理

use crate::error::RotationError;
use crate::store::LogStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// 一轮轮转的统计结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationSummary {
    /// 成功压缩并截断的流数量
    pub rotated: usize,
    /// 处理失败的流数量
    pub failed: usize,
}

/// 日志轮转器
pub struct LogRotator {
    /// 日志存储
    logs: Arc<dyn LogStore>,
    /// 轮转周期
    rotation_interval: Duration,
    /// 轮转循环任务句柄
    handle: RwLock<Option<JoinHandle<()>>>,
}

impl LogRotator {
    /// 创建新的日志轮转器
    ///
    /// # 参数
    /// * `logs` - 日志存储
    /// * `rotation_interval` - 轮转周期
    ///
    /// # 返回
    /// * `Self` - 轮转器实例
    pub fn new(logs: Arc<dyn LogStore>, rotation_interval: Duration) -> Self {
        Self {
            logs,
            rotation_interval,
            handle: RwLock::new(None),
        }
    }

    /// 为流生成带时间戳后缀的归档标识
    fn archive_id(stream_id: &str) -> String {
        format!("{}-{}", stream_id, Utc::now().format("%Y%m%d%H%M%S"))
    }

    /// 执行一轮全量轮转
    ///
    /// 流之间相互独立；截断只在同一流压缩确认成功之后执行，
    /// 避免数据丢失。没有活动流时本轮为空操作
    ///
    /// # 返回
    /// * `RotationSummary` - 本轮统计
    pub async fn rotate_all(&self) -> RotationSummary {
        Self::rotate_all_streams(self.logs.as_ref()).await
    }

    /// 静态方法执行一轮全量轮转
    async fn rotate_all_streams(logs: &dyn LogStore) -> RotationSummary {
        // failed只统计单个流的轮转失败；枚举失败时本轮放弃
        let streams = match logs.list_active_streams().await {
            Ok(streams) => streams,
            Err(e) => {
                error!("{}", RotationError::List(e.to_string()));
                return RotationSummary::default();
            }
        };

        if streams.is_empty() {
            debug!("无活动日志流，本轮轮转为空操作");
            return RotationSummary::default();
        }

        info!("开始日志轮转，共 {} 个活动流", streams.len());

        let mut summary = RotationSummary::default();
        for stream in &streams {
            match Self::rotate_stream(logs, stream).await {
                Ok(()) => summary.rotated += 1,
                Err(e) => {
                    error!("{}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "日志轮转完成: 成功 {} 个，失败 {} 个",
            summary.rotated, summary.failed
        );
        summary
    }

    /// 轮转单个日志流
    async fn rotate_stream(logs: &dyn LogStore, stream_id: &str) -> Result<(), RotationError> {
        let archive_id = Self::archive_id(stream_id);

        logs.compress(stream_id, &archive_id)
            .await
            .map_err(|e| RotationError::Compress {
                stream: stream_id.to_string(),
                reason: e.to_string(),
            })?;

        // 只有压缩确认成功后才截断
        logs.truncate(stream_id)
            .await
            .map_err(|e| RotationError::Truncate {
                stream: stream_id.to_string(),
                reason: e.to_string(),
            })?;

        debug!("日志流已轮转: {} -> {}", stream_id, archive_id);
        Ok(())
    }

    /// 启动轮转循环
    pub async fn start(&self) {
        let mut handle = self.handle.write().await;
        if handle.is_some() {
            return;
        }

        info!("启动日志轮转器，周期 {:?}", self.rotation_interval);

        let logs = Arc::clone(&self.logs);
        let rotation_interval = self.rotation_interval;
        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval(rotation_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 首个tick立即到达，跳过以避免启动时就轮转
            ticker.tick().await;

            loop {
                ticker.tick().await;
                Self::rotate_all_streams(logs.as_ref()).await;
            }
        }));
    }

    /// 停止轮转循环
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(task) = handle.take() {
            task.abort();
        }
        info!("日志轮转器已停止");
    }
}
