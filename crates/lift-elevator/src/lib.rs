//! # Lift Elevator - 双电机升降机构
//!
//! 单自由度、双电机（主 + 跟随）、编码器与电流反馈的升降机构控制。
//!
//! - **状态即查询**：机构状态每次调用时从传感器实时读取，不缓存位置
//! - **开环定速**：上升/下降使用固定占空比，没有 PID 与加速度斜坡
//! - **守卫式安全**：电流超限与行程越界通过命令守卫阻止新的运动命令
//! - **清理保证**：所有到位类命令在任何退出路径上都把速度置 0
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use lift_command::Scheduler;
//! use lift_elevator::ElevatorController;
//!
//! let elevator = ElevatorController::new(left, right, telemetry, constants.elevator);
//! let mut scheduler = Scheduler::new(elevator);
//!
//! let cmd = scheduler.subsystem().set_height(20.0);
//! scheduler.schedule(cmd);
//! loop {
//!     scheduler.run(); // 每 20ms 一次
//! }
//! ```

mod commands;
mod controller;
pub mod keys;
mod state;

pub use controller::ElevatorController;
pub use state::MechanismState;
