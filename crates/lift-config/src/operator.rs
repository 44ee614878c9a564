//! 操作手柄常量

use serde::{Deserialize, Serialize};

/// 操作手柄常量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConstants {
    pub driver_controller_port1: u8,
    pub driver_controller_port2: u8,
    pub drive_deadband: f64,
    /// 手动操作升降/摆臂时的摇杆死区
    pub arm_manual_deadband: f64,
    pub arm_manual_scale: f64,
}

impl Default for OperatorConstants {
    fn default() -> Self {
        Self {
            driver_controller_port1: 0,
            driver_controller_port2: 1,
            drive_deadband: 0.05,
            arm_manual_deadband: 0.05,
            arm_manual_scale: 0.5,
        }
    }
}

impl OperatorConstants {
    /// 摇杆死区
    ///
    /// `|value| <= deadband` 时返回 0，否则将剩余区间线性映射回 (0, 1]。
    pub fn apply_deadband(value: f64, deadband: f64) -> f64 {
        if value.abs() <= deadband {
            0.0
        } else {
            value.signum() * (value.abs() - deadband) / (1.0 - deadband)
        }
    }
}
