//! 审计日志记录数据结构
//!
//! 每次完成的探测评估产生一条只追加、不可变的审计记录

use crate::check::{Check, CheckState};
use crate::probe::ProbeOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 审计日志记录
///
/// 快照取自评估时刻、状态更新之前的检查定义；
/// 记录创建后追加到对应检查的日志流，之后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 记录ID
    pub id: Uuid,
    /// 评估时刻的检查快照（更新前）
    pub check: Check,
    /// 探测结果
    pub outcome: ProbeOutcome,
    /// 计算出的新状态
    pub state: CheckState,
    /// 本次评估是否判定需要告警
    pub alert_raised: bool,
    /// 评估时间戳
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// 创建新的审计记录
    ///
    /// # 参数
    /// * `check` - 更新前的检查快照
    /// * `outcome` - 探测结果
    /// * `state` - 计算出的新状态
    /// * `alert_raised` - 是否判定告警
    ///
    /// # 返回
    /// * `Self` - 审计记录实例
    pub fn new(check: Check, outcome: ProbeOutcome, state: CheckState, alert_raised: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            check,
            outcome,
            state,
            alert_raised,
            timestamp: Utc::now(),
        }
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从JSON字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Protocol;
    use crate::probe::ProbeFailure;

    fn create_test_check() -> Check {
        Check {
            id: "check-1".to_string(),
            protocol: Protocol::Http,
            host: "localhost:8080".to_string(),
            path: "/".to_string(),
            method: "GET".to_string(),
            timeout_seconds: 5,
            success_codes: vec![200],
            state: Some(CheckState::Up),
            last_checked: None,
            contact: "+8613800000000".to_string(),
        }
    }

    #[test]
    fn test_record_serialization_roundtrip() {
        let record = LogRecord::new(
            create_test_check(),
            ProbeOutcome::failure(ProbeFailure::Timeout),
            CheckState::Down,
            true,
        );

        let json = record.to_json().unwrap();
        assert!(json.contains("\"timeout\""));
        assert!(json.contains("\"alert_raised\":true"));

        let restored = LogRecord::from_json(&json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.state, CheckState::Down);
    }

    #[test]
    fn test_record_keeps_pre_update_snapshot() {
        let check = create_test_check();
        let record = LogRecord::new(
            check.clone(),
            ProbeOutcome::response(500),
            CheckState::Down,
            true,
        );

        // 快照保留旧状态，新状态只体现在state字段
        assert_eq!(record.check.state, Some(CheckState::Up));
        assert_eq!(record.state, CheckState::Down);
    }
}
