//! 机构状态快照

use lift_config::ElevatorConstants;
use lift_hal::Side;
use serde::Serialize;

/// 某一时刻的传感器读数
///
/// 只是一次读取的值拷贝；控制器从不保存它，每次查询都重新读取。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MechanismState {
    /// 左侧行程（英寸）
    pub left_position: f64,
    /// 右侧行程（英寸）
    pub right_position: f64,
    /// 左侧速度（英寸/秒）
    pub left_velocity: f64,
    /// 右侧速度（英寸/秒）
    pub right_velocity: f64,
    /// 左侧电流（A）
    pub left_current: f64,
    /// 右侧电流（A）
    pub right_current: f64,
}

impl MechanismState {
    /// 两侧行程平均值
    pub fn height(&self) -> f64 {
        (self.left_position + self.right_position) / 2.0
    }

    pub fn position(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_position,
            Side::Right => self.right_position,
        }
    }

    pub fn velocity(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_velocity,
            Side::Right => self.right_velocity,
        }
    }

    pub fn current(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_current,
            Side::Right => self.right_current,
        }
    }

    /// 两侧都高于行程下限
    pub fn can_go_lower(&self, constants: &ElevatorConstants) -> bool {
        Side::BOTH
            .iter()
            .all(|&side| self.position(side) > constants.min_travel_in)
    }

    /// 两侧都低于行程上限
    pub fn can_go_higher(&self, constants: &ElevatorConstants) -> bool {
        Side::BOTH
            .iter()
            .all(|&side| self.position(side) < constants.max_travel_in)
    }

    /// 任一侧电流超过限制
    pub fn is_unsafe(&self, constants: &ElevatorConstants) -> bool {
        Side::BOTH
            .iter()
            .any(|&side| self.current(side) > constants.current_limit())
    }

    /// 平均高度与目标之差严格小于容差
    pub fn is_at_height(&self, target: f64, constants: &ElevatorConstants) -> bool {
        (self.height() - target).abs() < constants.tolerance_in
    }
}
