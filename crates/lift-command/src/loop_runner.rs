//! Loop Runner - 固定周期控制循环
//!
//! 每个周期依次：
//! 1. 调用 `before_tick`（推进仿真、读取操作输入、调度新命令；返回
//!    `ControlFlow::Break` 结束循环）
//! 2. [`Scheduler::run`]
//! 3. （`realtime` 时）按绝对时间锚点休眠到下一周期
//!
//! 锚点为 `start + period × (i + 1)`，单个周期超时不会让后续周期整体漂移；
//! 超时的周期记为一次 overrun。

use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::LoopError;
use crate::scheduler::{Scheduler, Subsystem};

/// 控制循环配置
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// 调度周期
    pub period: Duration,

    /// 最大迭代次数（None 表示直到 `before_tick` 返回 Break）
    pub max_iterations: Option<usize>,

    /// 是否按墙钟时间休眠；仿真和测试中可关闭以全速运行
    pub realtime: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(20), // 50Hz
            max_iterations: None,
            realtime: true,
        }
    }
}

/// 循环统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: usize,
    pub overruns: usize,
    pub elapsed: Duration,
}

/// 运行固定周期控制循环
///
/// `before_tick` 收到调度器和当前迭代序号（从 0 开始）。
pub fn run_loop<S, F>(
    scheduler: &mut Scheduler<S>,
    config: &LoopConfig,
    mut before_tick: F,
) -> Result<LoopStats, LoopError>
where
    S: Subsystem,
    F: FnMut(&mut Scheduler<S>, usize) -> ControlFlow<()>,
{
    if config.period.is_zero() {
        return Err(LoopError::InvalidPeriod {
            period: config.period,
        });
    }

    let start = Instant::now();
    let mut stats = LoopStats::default();

    loop {
        if config.max_iterations.is_some_and(|max| stats.iterations >= max) {
            break;
        }
        if before_tick(scheduler, stats.iterations).is_break() {
            break;
        }
        scheduler.run();
        stats.iterations += 1;

        if config.realtime {
            let anchor = start + anchor_offset(config.period, stats.iterations);
            let now = Instant::now();
            if now < anchor {
                spin_sleep::sleep(anchor - now);
            } else {
                stats.overruns += 1;
                if stats.overruns == 1 {
                    warn!(
                        iteration = stats.iterations,
                        overrun = ?(now - anchor),
                        "Control loop overran its period"
                    );
                }
            }
        }
    }

    stats.elapsed = start.elapsed();
    debug!(
        iterations = stats.iterations,
        overruns = stats.overruns,
        "Control loop finished"
    );
    Ok(stats)
}

/// `period × iterations`，以纳秒整数计算，不受 `u32` 乘数限制
fn anchor_offset(period: Duration, iterations: usize) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    let nanos = period.as_nanos().saturating_mul(iterations as u128);
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}
