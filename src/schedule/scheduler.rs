//! 检查调度器实现
//!
//! 固定周期拉取全部注册检查，校验后为每个检查派发一次独立探测。
//! 周期之间不互相等待，同一检查的两次评估允许同时在途，
//! 持久化采用后写者胜出语义

use crate::check::validate_check;
use crate::probe::ProbeExecutor;
use crate::process::OutcomeProcessor;
use crate::store::CheckRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 调度器状态
#[derive(Debug, Clone)]
pub struct SchedulerStatus {
    /// 调度器是否运行中
    pub is_running: bool,
    /// 最近一个周期派发的检查数
    pub last_cycle_dispatched: usize,
    /// 最近一个周期跳过的检查数（校验失败）
    pub last_cycle_skipped: usize,
    /// 最后一次周期开始时间
    pub last_cycle_at: Option<Instant>,
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        Self {
            is_running: false,
            last_cycle_dispatched: 0,
            last_cycle_skipped: 0,
            last_cycle_at: None,
        }
    }
}

/// 调度器trait，定义调度接口
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// 启动调度循环
    async fn start(&self) -> crate::error::Result<()>;

    /// 停止调度循环
    async fn stop(&self);

    /// 获取调度器状态
    async fn get_status(&self) -> SchedulerStatus;
}

/// 检查调度器实现
pub struct CheckScheduler {
    /// 检查注册表
    registry: Arc<dyn CheckRegistry>,
    /// 探测执行器
    executor: Arc<dyn ProbeExecutor>,
    /// 结果处理器
    processor: Arc<OutcomeProcessor>,
    /// 检查周期
    check_interval: Duration,
    /// 并发控制信号量
    semaphore: Arc<Semaphore>,
    /// 调度循环任务句柄
    handle: RwLock<Option<JoinHandle<()>>>,
    /// 调度器状态
    status: Arc<RwLock<SchedulerStatus>>,
}

impl CheckScheduler {
    /// 创建新的检查调度器
    ///
    /// # 参数
    /// * `registry` - 检查注册表
    /// * `executor` - 探测执行器
    /// * `processor` - 结果处理器
    /// * `check_interval` - 检查周期
    /// * `max_concurrent_probes` - 最大并发探测数
    ///
    /// # 返回
    /// * `Self` - 调度器实例
    pub fn new(
        registry: Arc<dyn CheckRegistry>,
        executor: Arc<dyn ProbeExecutor>,
        processor: Arc<OutcomeProcessor>,
        check_interval: Duration,
        max_concurrent_probes: usize,
    ) -> Self {
        Self {
            registry,
            executor,
            processor,
            check_interval,
            semaphore: Arc::new(Semaphore::new(max_concurrent_probes)),
            handle: RwLock::new(None),
            status: Arc::new(RwLock::new(SchedulerStatus::default())),
        }
    }

    /// 执行一个检查周期
    ///
    /// 拉取全部检查，跳过校验失败的定义，为每个合法检查派发一个
    /// 独立任务。返回的句柄仅供测试等待使用；调度循环不等待它们，
    /// 因此周期之间允许重叠
    ///
    /// # 返回
    /// * `Vec<JoinHandle<()>>` - 本周期派发的任务句柄
    pub async fn run_cycle(&self) -> Vec<JoinHandle<()>> {
        let checks = match self.registry.list_checks().await {
            Ok(checks) => checks,
            Err(e) => {
                error!("读取检查列表失败，跳过本周期: {}", e);
                return Vec::new();
            }
        };

        debug!("检查周期开始，共 {} 个检查", checks.len());

        let mut handles = Vec::new();
        let mut skipped = 0usize;

        for check in checks {
            // 畸形检查跳过并记录，不影响周期内其他检查
            if let Err(e) = validate_check(&check) {
                warn!("跳过校验失败的检查: {}", e);
                skipped += 1;
                continue;
            }

            let executor = Arc::clone(&self.executor);
            let processor = Arc::clone(&self.processor);
            let semaphore = Arc::clone(&self.semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("获取并发许可失败，跳过检查: {}", check.id);
                        return;
                    }
                };

                // 单个检查的管道严格顺序：探测 → 处理 → 持久化/日志/通知
                let mut outcome = executor.probe(&check).await;
                let processed = processor.process(&check, &mut outcome).await;

                if processed.state.is_up() {
                    debug!("检查正常: {}", processed.check_id);
                } else {
                    warn!(
                        "检查异常: {} - {}",
                        processed.check_id,
                        outcome
                            .error
                            .as_ref()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| format!(
                                "状态码 {}",
                                outcome.response_code.unwrap_or(0)
                            ))
                    );
                }
            }));
        }

        {
            let mut status = self.status.write().await;
            status.last_cycle_dispatched = handles.len();
            status.last_cycle_skipped = skipped;
            status.last_cycle_at = Some(Instant::now());
        }

        handles
    }
}

#[async_trait]
impl Scheduler for Arc<CheckScheduler> {
    async fn start(&self) -> crate::error::Result<()> {
        {
            let mut status = self.status.write().await;
            if status.is_running {
                return Ok(());
            }
            status.is_running = true;
        }

        info!("启动检查调度器，周期 {:?}", self.check_interval);

        let scheduler = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = interval(scheduler.check_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                // 句柄被丢弃：新周期不等待上一周期的在途探测
                let _ = scheduler.run_cycle().await;
            }
        });

        let mut handle = self.handle.write().await;
        *handle = Some(task);
        Ok(())
    }

    async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(task) = handle.take() {
            task.abort();
        }

        let mut status = self.status.write().await;
        status.is_running = false;
        info!("检查调度器已停止");
    }

    async fn get_status(&self) -> SchedulerStatus {
        self.status.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Check, CheckState, Protocol};
    use crate::probe::{ProbeFailure, ProbeOutcome};
    use crate::store::{MemoryCheckRegistry, MemoryLogStore};
    use futures::future::join_all;

    /// 返回固定结果的测试执行器
    struct StubExecutor {
        outcome: ProbeOutcome,
    }

    #[async_trait]
    impl ProbeExecutor for StubExecutor {
        async fn probe(&self, _check: &Check) -> ProbeOutcome {
            self.outcome.clone()
        }
    }

    fn create_test_check(id: &str) -> Check {
        Check {
            id: id.to_string(),
            protocol: Protocol::Http,
            host: "localhost:8080".to_string(),
            path: "/".to_string(),
            method: "GET".to_string(),
            timeout_seconds: 5,
            success_codes: vec![200],
            state: None,
            last_checked: None,
            contact: "+8613800000000".to_string(),
        }
    }

    fn create_scheduler(
        registry: Arc<MemoryCheckRegistry>,
        logs: Arc<MemoryLogStore>,
        outcome: ProbeOutcome,
    ) -> CheckScheduler {
        let processor = Arc::new(OutcomeProcessor::new(
            registry.clone() as Arc<dyn CheckRegistry>,
            logs as Arc<dyn crate::store::LogStore>,
            None,
        ));
        CheckScheduler::new(
            registry,
            Arc::new(StubExecutor { outcome }),
            processor,
            Duration::from_secs(60),
            10,
        )
    }

    #[tokio::test]
    async fn test_run_cycle_dispatches_all_valid_checks() {
        let registry = Arc::new(MemoryCheckRegistry::with_checks(vec![
            create_test_check("a"),
            create_test_check("b"),
        ]));
        let logs = Arc::new(MemoryLogStore::new());
        let scheduler =
            create_scheduler(registry.clone(), logs.clone(), ProbeOutcome::response(200));

        let handles = scheduler.run_cycle().await;
        assert_eq!(handles.len(), 2);
        join_all(handles).await;

        // 每个检查各产生一条审计记录并写回状态
        assert_eq!(logs.records("a").await.len(), 1);
        assert_eq!(logs.records("b").await.len(), 1);
        assert_eq!(
            registry.get("a").await.unwrap().state,
            Some(CheckState::Up)
        );
    }

    #[tokio::test]
    async fn test_run_cycle_skips_malformed_checks() {
        let mut malformed = create_test_check("bad");
        malformed.success_codes = vec![];

        let registry = Arc::new(MemoryCheckRegistry::with_checks(vec![
            create_test_check("good"),
            malformed,
        ]));
        let logs = Arc::new(MemoryLogStore::new());
        let scheduler =
            create_scheduler(registry.clone(), logs.clone(), ProbeOutcome::response(200));

        let handles = scheduler.run_cycle().await;
        assert_eq!(handles.len(), 1);
        join_all(handles).await;

        let status = scheduler.status.read().await.clone();
        assert_eq!(status.last_cycle_dispatched, 1);
        assert_eq!(status.last_cycle_skipped, 1);

        // 畸形检查未被探测，合法检查正常完成
        assert!(logs.records("bad").await.is_empty());
        assert_eq!(logs.records("good").await.len(), 1);
    }

    #[tokio::test]
    async fn test_run_cycle_failure_isolated_per_check() {
        let registry = Arc::new(MemoryCheckRegistry::with_checks(vec![
            create_test_check("a"),
            create_test_check("b"),
        ]));
        let logs = Arc::new(MemoryLogStore::new());
        let scheduler = create_scheduler(
            registry.clone(),
            logs.clone(),
            ProbeOutcome::failure(ProbeFailure::Timeout),
        );

        join_all(scheduler.run_cycle().await).await;

        // 探测失败转化为down状态，两个检查都完成评估
        assert_eq!(
            registry.get("a").await.unwrap().state,
            Some(CheckState::Down)
        );
        assert_eq!(
            registry.get("b").await.unwrap().state,
            Some(CheckState::Down)
        );
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let registry = Arc::new(MemoryCheckRegistry::new());
        let logs = Arc::new(MemoryLogStore::new());
        let scheduler = Arc::new(create_scheduler(
            registry,
            logs,
            ProbeOutcome::response(200),
        ));

        scheduler.start().await.unwrap();
        assert!(scheduler.get_status().await.is_running);

        scheduler.stop().await;
        assert!(!scheduler.get_status().await.is_running);
    }
}
