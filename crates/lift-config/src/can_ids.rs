//! CAN 设备 ID 表

use serde::{Deserialize, Serialize};

/// 机器人上所有电机控制器的 CAN ID
///
/// 升降机构只使用 `elevator_left`（主电机）与 `elevator_right`（跟随电机），
/// 其余 ID 保留给底盘、滑轨和进料机构。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanIds {
    pub drive_train_left1: u8,
    pub drive_train_left2: u8,
    pub drive_train_right1: u8,
    pub drive_train_right2: u8,
    pub elevator_left: u8,
    pub elevator_right: u8,
    pub slider: u8,
    pub intake_arm_left: u8,
    pub intake_arm_right: u8,
    pub intake_wheels: u8,
}

impl CanIds {
    /// 全部 ID（用于重复检查）
    pub fn all(&self) -> [(&'static str, u8); 10] {
        [
            ("drive_train_left1", self.drive_train_left1),
            ("drive_train_left2", self.drive_train_left2),
            ("drive_train_right1", self.drive_train_right1),
            ("drive_train_right2", self.drive_train_right2),
            ("elevator_left", self.elevator_left),
            ("elevator_right", self.elevator_right),
            ("slider", self.slider),
            ("intake_arm_left", self.intake_arm_left),
            ("intake_arm_right", self.intake_arm_right),
            ("intake_wheels", self.intake_wheels),
        ]
    }

    /// 查找第一个重复的 ID，返回两个冲突字段名
    pub fn find_duplicate(&self) -> Option<(&'static str, &'static str, u8)> {
        let all = self.all();
        for (i, (name_a, id_a)) in all.iter().enumerate() {
            for (name_b, id_b) in &all[i + 1..] {
                if id_a == id_b {
                    return Some((name_a, name_b, *id_a));
                }
            }
        }
        None
    }
}

impl Default for CanIds {
    fn default() -> Self {
        Self {
            drive_train_left1: 11,
            drive_train_left2: 12,
            drive_train_right1: 13,
            drive_train_right2: 14,
            elevator_left: 21,
            elevator_right: 22,
            slider: 23,
            intake_arm_left: 26,
            intake_arm_right: 27,
            intake_wheels: 28,
        }
    }
}
