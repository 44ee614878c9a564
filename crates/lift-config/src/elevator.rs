//! # 升降机构常量
//!
//! 长度单位统一为英寸，速度为占空比（-1.0..=1.0），电流为安培。

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// 升降机构常量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConstants {
    /// 主电机（左）是否反向
    pub motor_left_inverted: bool,

    /// 跟随电机（右）相对主电机是否反向
    pub motor_right_inverted: bool,

    /// 电流限制（A）
    ///
    /// 同时下发给电机控制器的 smart current limit，也是 `is_unsafe()` 的阈值。
    pub current_limit_amps: u32,

    /// 总减速比（5:1 × 4:1）
    pub gear_reduction: f64,

    /// 链轮节圆直径（英寸），REV 16T 链轮为 1.29
    pub sprocket_pitch_diameter_in: f64,

    /// 软件行程下限（英寸）
    pub min_travel_in: f64,

    /// 软件行程上限（英寸）
    pub max_travel_in: f64,

    /// 到位容差（英寸），约为行程的 5%
    pub tolerance_in: f64,

    /// 上升占空比（正）
    pub speed_up: f64,

    /// 下降占空比（负）
    pub speed_down: f64,
}

impl Default for ElevatorConstants {
    fn default() -> Self {
        Self {
            motor_left_inverted: false,
            motor_right_inverted: true,
            current_limit_amps: 40,
            gear_reduction: 5.0 * 4.0,
            sprocket_pitch_diameter_in: 1.29,
            min_travel_in: 0.0,
            max_travel_in: 36.0,
            tolerance_in: 1.8,
            speed_up: 0.7,
            speed_down: -0.3,
        }
    }
}

impl ElevatorConstants {
    /// 电机每转对应输出轴转数
    pub fn gear_ratio(&self) -> f64 {
        1.0 / self.gear_reduction
    }

    /// 电机转数 -> 升降行程（英寸）
    pub fn position_factor(&self) -> f64 {
        std::f64::consts::PI * self.sprocket_pitch_diameter_in * self.gear_ratio()
    }

    /// 电机 RPM -> 升降速度（英寸/秒）
    pub fn velocity_factor(&self) -> f64 {
        self.position_factor() / 60.0
    }

    pub fn current_limit(&self) -> f64 {
        f64::from(self.current_limit_amps)
    }

    /// 软件行程长度（英寸）
    pub fn travel_span(&self) -> f64 {
        self.max_travel_in - self.min_travel_in
    }

    /// 校验常量
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gear_reduction.is_finite() && self.gear_reduction > 0.0) {
            return Err(ConfigError::invalid(
                "elevator.gear_reduction",
                format!("must be > 0, got {}", self.gear_reduction),
            ));
        }
        if !(self.sprocket_pitch_diameter_in.is_finite() && self.sprocket_pitch_diameter_in > 0.0)
        {
            return Err(ConfigError::invalid(
                "elevator.sprocket_pitch_diameter_in",
                format!("must be > 0, got {}", self.sprocket_pitch_diameter_in),
            ));
        }
        if !(self.min_travel_in < self.max_travel_in) {
            return Err(ConfigError::invalid(
                "elevator.max_travel_in",
                format!(
                    "must be greater than min_travel_in ({} >= {})",
                    self.min_travel_in, self.max_travel_in
                ),
            ));
        }
        // 容差带超过半个行程时 is_at_height 在整个行程内恒为真
        if !(self.tolerance_in > 0.0 && self.tolerance_in < self.travel_span() / 2.0) {
            return Err(ConfigError::invalid(
                "elevator.tolerance_in",
                format!(
                    "must be in (0, {}), got {}",
                    self.travel_span() / 2.0,
                    self.tolerance_in
                ),
            ));
        }
        if self.current_limit_amps == 0 {
            return Err(ConfigError::invalid(
                "elevator.current_limit_amps",
                "must be > 0",
            ));
        }
        if !(self.speed_up > 0.0 && self.speed_up <= 1.0) {
            return Err(ConfigError::invalid(
                "elevator.speed_up",
                format!("must be in (0, 1], got {}", self.speed_up),
            ));
        }
        if !(self.speed_down >= -1.0 && self.speed_down < 0.0) {
            return Err(ConfigError::invalid(
                "elevator.speed_down",
                format!("must be in [-1, 0), got {}", self.speed_down),
            ));
        }
        Ok(())
    }
}
