//! 结果处理器实现
//!
//! 按严格顺序执行单个检查的评估管道：计算状态 → 追加审计日志 →
//! 写回检查 → 按需发送告警。每个阶段可以独立失败，失败只影响
//! 当前检查，不会中断所在的调度周期

use crate::check::{Check, CheckState};
use crate::notification::{AlertSender, SimpleTemplate, TemplateContext};
use crate::probe::ProbeOutcome;
use crate::process::record::LogRecord;
use crate::store::{CheckRegistry, LogStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 单次评估的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedOutcome {
    /// 检查id
    pub check_id: String,
    /// 计算出的新状态
    pub state: CheckState,
    /// 是否判定并发起了告警
    pub alert_raised: bool,
    /// 审计记录是否追加成功
    pub logged: bool,
    /// 检查写回是否成功
    pub persisted: bool,
}

impl ProcessedOutcome {
    /// 构造无副作用的处理结果（重复处理时返回）
    fn noop(check_id: String, state: CheckState) -> Self {
        Self {
            check_id,
            state,
            alert_raised: false,
            logged: false,
            persisted: false,
        }
    }
}

/// 结果处理器
pub struct OutcomeProcessor {
    /// 检查注册表
    registry: Arc<dyn CheckRegistry>,
    /// 日志存储
    logs: Arc<dyn LogStore>,
    /// 告警发送器（未配置时跳过通知）
    notifier: Option<Arc<dyn AlertSender>>,
    /// 告警消息模板
    template: SimpleTemplate,
}

impl OutcomeProcessor {
    /// 创建新的结果处理器
    ///
    /// # 参数
    /// * `registry` - 检查注册表
    /// * `logs` - 日志存储
    /// * `notifier` - 告警发送器（可选）
    ///
    /// # 返回
    /// * `Self` - 处理器实例
    pub fn new(
        registry: Arc<dyn CheckRegistry>,
        logs: Arc<dyn LogStore>,
        notifier: Option<Arc<dyn AlertSender>>,
    ) -> Self {
        Self {
            registry,
            logs,
            notifier,
            template: SimpleTemplate::default(),
        }
    }

    /// 替换告警消息模板
    pub fn with_template(mut self, template: SimpleTemplate) -> Self {
        self.template = template;
        self
    }

    /// 计算探测结果对应的新状态
    ///
    /// 无错误且响应状态码属于成功集合时为`up`，否则为`down`
    pub fn compute_state(check: &Check, outcome: &ProbeOutcome) -> CheckState {
        match (&outcome.error, outcome.response_code) {
            (None, Some(code)) if check.success_codes.contains(&code) => CheckState::Up,
            _ => CheckState::Down,
        }
    }

    /// 处理单次探测结果
    ///
    /// 对已标记处理的结果幂等：重复调用不产生任何副作用。
    /// 每次有效调用恰好追加一条审计记录、至多一次写回、至多一次通知
    ///
    /// # 参数
    /// * `check` - 评估时刻的检查副本
    /// * `outcome` - 探测结果
    ///
    /// # 返回
    /// * `ProcessedOutcome` - 处理结果
    pub async fn process(&self, check: &Check, outcome: &mut ProbeOutcome) -> ProcessedOutcome {
        let state = Self::compute_state(check, outcome);

        // 一次性完成标记：传输层重复回调或重复处理在此被拦截
        if !outcome.mark_sent() {
            debug!("检查 {} 的结果已处理过，跳过", check.id);
            return ProcessedOutcome::noop(check.id.clone(), state);
        }

        // 告警仅在观察到状态转换时触发；首次评估没有基线，不告警
        let alert_warranted = check.last_checked.is_some() && check.state != Some(state);

        // 1. 追加审计记录（取更新前的检查快照）
        let record = LogRecord::new(check.clone(), outcome.clone(), state, alert_warranted);
        let logged = match self.logs.append(&check.id, &record).await {
            Ok(()) => true,
            Err(e) => {
                error!("追加审计记录失败: {} - {}", check.id, e);
                false
            }
        };

        // 2. 写回更新后的运行时字段
        let mut updated = check.clone();
        updated.state = Some(state);
        updated.last_checked = Some(Utc::now());

        let persisted = match self.registry.write_check(&updated).await {
            Ok(()) => true,
            Err(e) => {
                // 本周期的状态变更丢失，下个周期以旧的last_checked重试
                error!("写回检查失败: {} - {}", check.id, e);
                false
            }
        };

        // 3. 写回成功且判定告警时发送通知，通知失败不回滚状态
        let alert_raised = persisted && alert_warranted;
        if alert_raised {
            info!("检查 {} 状态转换: {:?} -> {}", check.id, check.state, state);
            self.send_alert(check, state).await;
        } else if persisted {
            debug!("检查 {} 状态为 {}，无需告警", check.id, state);
        }

        ProcessedOutcome {
            check_id: check.id.clone(),
            state,
            alert_raised,
            logged,
            persisted,
        }
    }

    /// 渲染并发送告警消息
    async fn send_alert(&self, check: &Check, state: CheckState) {
        let Some(notifier) = &self.notifier else {
            warn!("检查 {} 需要告警但未配置通知发送器", check.id);
            return;
        };

        let context = TemplateContext::from_transition(check, state);
        let message = self.template.render(&context);

        match notifier.send(&check.contact, &message).await {
            Ok(()) => info!("告警发送成功: {} -> {}", check.id, check.contact),
            Err(e) => error!("告警发送失败: {} - {}", check.id, e),
        }
    }
}
