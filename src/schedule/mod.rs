//! 调度模块
//!
//! 提供检查周期的定时触发、并发派发和周期内隔离

pub mod scheduler;

// 重新导出主要类型
pub use scheduler::{CheckScheduler, Scheduler, SchedulerStatus};
