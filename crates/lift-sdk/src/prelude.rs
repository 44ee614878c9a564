//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use lift_sdk::prelude::*;
//! ```

// 配置
pub use lift_config::{ElevatorConstants, OperatorConstants, RobotConstants};

// 硬件与遥测
pub use lift_hal::{
    CanId, IdleMode, MemoryTelemetry, MotorController, NullTelemetry, RelativeEncoder, Side,
    Telemetry, TracingTelemetry,
};

// 命令框架
pub use lift_command::{
    Command, CommandExt, CommandId, LoopConfig, LoopStats, Resource, Scheduler, Subsystem,
    run_loop,
};

// 升降机构
pub use lift_elevator::{ElevatorController, MechanismState};

// 错误类型
pub use crate::logging::LoggingError;
pub use lift_command::LoopError;
pub use lift_config::ConfigError;
pub use lift_hal::HalError;
