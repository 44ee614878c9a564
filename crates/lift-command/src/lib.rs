//! # Lift Command - 命令调度
//!
//! 协作式、固定周期的命令调度框架：
//!
//! - [`Command`] - 可调度的工作单元（initialize / execute / is_finished / end）
//! - [`InstantCommand`]、[`RunCommand`]、[`ConditionalCommand`] - 基础命令
//! - [`CommandExt`] - `unless` / `until` / `finally_do` / `with_name` 组合子
//! - [`Scheduler`] - 资源仲裁：同一资源同一时刻只属于一个命令，
//!   新命令抢占旧命令，被抢占者的 `end(interrupted = true)` 一定会执行
//! - [`run_loop`] - 固定周期控制循环（绝对时间锚点）
//!
//! # 使用示例
//!
//! ```rust
//! use lift_command::{CommandExt, InstantCommand, Resource, RunCommand, Scheduler, Subsystem};
//!
//! struct Winch {
//!     speed: f64,
//! }
//!
//! impl Subsystem for Winch {}
//!
//! const WINCH: Resource = Resource::new("winch");
//!
//! let mut scheduler = Scheduler::new(Winch { speed: 0.0 });
//!
//! let id = scheduler.schedule(
//!     RunCommand::new([WINCH], |w: &mut Winch| w.speed = 0.5)
//!         .finally_do(|w: &mut Winch, _interrupted| w.speed = 0.0),
//! );
//! scheduler.run();
//! assert_eq!(scheduler.subsystem().speed, 0.5);
//!
//! // 抢占：同一资源上的新命令取消旧命令，旧命令的清理动作先执行
//! scheduler.schedule(InstantCommand::new([WINCH], |w: &mut Winch| w.speed = -0.2));
//! assert!(!scheduler.is_scheduled(id));
//! assert_eq!(scheduler.subsystem().speed, -0.2);
//! ```

mod command;
mod commands;
mod decorators;
mod error;
mod loop_runner;
mod scheduler;

pub use command::{Command, Requirements, Resource};
pub use commands::{ConditionalCommand, InstantCommand, RunCommand};
pub use decorators::{CommandExt, FinallyDo, Named, Unless, Until};
pub use error::LoopError;
pub use loop_runner::{LoopConfig, LoopStats, run_loop};
pub use scheduler::{CommandId, Scheduler, Subsystem};
