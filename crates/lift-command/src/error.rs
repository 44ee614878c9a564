//! 控制循环错误类型

use std::time::Duration;
use thiserror::Error;

/// 控制循环错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// 周期必须大于 0
    #[error("Invalid loop period: {period:?} (must be > 0)")]
    InvalidPeriod { period: Duration },
}
