//! Lift SDK - 升降机构控制 SDK
//!
//! 把各层 crate 汇总为一个入口：
//!
//! - **配置层** (`config`): 机器人常量、TOML 加载与校验
//! - **硬件层** (`hal`): 电机控制器/编码器/遥测抽象，`mock` feature 下的仿真机构
//! - **命令层** (`command`): 命令、组合子、调度器与固定周期循环
//! - **机构层** (`elevator`): 升降机构控制器与命令工厂
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use lift_sdk::prelude::*;
//!
//! lift_sdk::init_logging("lift=info")?;
//! let constants = RobotConstants::load_from_file("robot.toml")?;
//! let elevator = ElevatorController::new(left, right, TracingTelemetry, constants.elevator);
//! let mut scheduler = Scheduler::new(elevator);
//! ```

pub use lift_command as command;
pub use lift_config as config;
pub use lift_elevator as elevator;
pub use lift_hal as hal;

mod logging;
pub mod prelude;

pub use logging::{LoggingError, init_logging};

// 常用类型
pub use lift_command::{Command, CommandExt, LoopConfig, Scheduler, Subsystem, run_loop};
pub use lift_config::{ConfigError, RobotConstants};
pub use lift_elevator::{ElevatorController, MechanismState};
pub use lift_hal::{HalError, MotorController, RelativeEncoder, Telemetry};
