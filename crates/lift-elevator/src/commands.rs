//! 升降机构命令工厂
//!
//! | 命令 | 守卫（初始化时判定） | 结束条件 | 退出时 |
//! |------|----------------------|----------|--------|
//! | `stop` | - | 立即 | - |
//! | `raise_step` | 不安全 或 不能再升 | 立即 | - |
//! | `lower_step` | 不安全 或 不能再降 | 立即 | - |
//! | `raise_to_height` | 不安全 或 目标不高于当前 或 已到位 | 到位 | 速度 0 |
//! | `lower_to_height` | 不安全 或 目标不低于当前 或 已到位 | 到位 | 速度 0 |
//! | `set_height` | 已到位 | 所选分支结束 | 速度 0 |
//!
//! 守卫只在初始化时判定一次；运行过程中电流超限不会打断已在执行的命令。
//! 到位类命令的速度清零在守卫跳过时同样执行；`raise_step`/`lower_step`
//! 只设置速度，电机保持该速度直到其他命令改变它。

use lift_command::{Command, CommandExt, ConditionalCommand, InstantCommand, RunCommand};
use lift_config::OperatorConstants;
use lift_hal::MotorController;

use crate::controller::ElevatorController;

impl<M: MotorController, T> ElevatorController<M, T> {
    /// 立即把速度置 0
    pub fn stop(&self) -> impl Command<Self> + use<M, T> {
        InstantCommand::new([Self::RESOURCE], |elevator: &mut Self| {
            elevator.set_speed(0.0)
        })
        .with_name("stop")
    }

    /// 把速度设为上升速度
    pub fn raise_step(&self) -> impl Command<Self> + use<M, T> {
        InstantCommand::new([Self::RESOURCE], |elevator: &mut Self| {
            let speed = elevator.constants().speed_up;
            elevator.set_speed(speed);
        })
        .unless(|elevator: &Self| elevator.is_unsafe() || !elevator.can_go_higher())
        .with_name("raise_step")
    }

    /// 把速度设为下降速度
    pub fn lower_step(&self) -> impl Command<Self> + use<M, T> {
        InstantCommand::new([Self::RESOURCE], |elevator: &mut Self| {
            let speed = elevator.constants().speed_down;
            elevator.set_speed(speed);
        })
        .unless(|elevator: &Self| elevator.is_unsafe() || !elevator.can_go_lower())
        .with_name("lower_step")
    }

    /// 上升到 `target`（英寸）
    pub fn raise_to_height(&self, target: f64) -> impl Command<Self> + use<M, T> {
        RunCommand::new([Self::RESOURCE], |elevator: &mut Self| {
            let speed = elevator.constants().speed_up;
            elevator.set_speed(speed);
        })
        .unless(move |elevator: &Self| {
            elevator.is_unsafe()
                || target <= elevator.current_height()
                || elevator.is_at_height(target)
        })
        .until(move |elevator: &Self| elevator.is_at_height(target))
        .finally_do(|elevator: &mut Self, _interrupted: bool| elevator.set_speed(0.0))
        .with_name("raise_to_height")
    }

    /// 下降到 `target`（英寸）
    pub fn lower_to_height(&self, target: f64) -> impl Command<Self> + use<M, T> {
        RunCommand::new([Self::RESOURCE], |elevator: &mut Self| {
            let speed = elevator.constants().speed_down;
            elevator.set_speed(speed);
        })
        .unless(move |elevator: &Self| {
            elevator.is_unsafe()
                || target >= elevator.current_height()
                || elevator.is_at_height(target)
        })
        .until(move |elevator: &Self| elevator.is_at_height(target))
        .finally_do(|elevator: &mut Self, _interrupted: bool| elevator.set_speed(0.0))
        .with_name("lower_to_height")
    }

    /// 按当前高度选择上升或下降到 `target`
    ///
    /// 方向在初始化时确定，之后不再改变。
    pub fn set_height(&self, target: f64) -> impl Command<Self> + use<M, T> {
        ConditionalCommand::new(
            self.raise_to_height(target),
            self.lower_to_height(target),
            move |elevator: &Self| target > elevator.current_height(),
        )
        .unless(move |elevator: &Self| elevator.is_at_height(target))
        .finally_do(|elevator: &mut Self, _interrupted: bool| elevator.set_speed(0.0))
        .with_name("set_height")
    }

    /// 手动摇杆：死区后正值上升、负值下降、零停止
    ///
    /// `axis` 为向上为正的摇杆值。方向在创建命令时确定。
    pub fn jog(&self, axis: f64, operator: &OperatorConstants) -> Box<dyn Command<Self>>
    where
        M: 'static,
        T: 'static,
    {
        let filtered = OperatorConstants::apply_deadband(axis, operator.arm_manual_deadband);
        if filtered > 0.0 {
            self.raise_step().boxed()
        } else if filtered < 0.0 {
            self.lower_step().boxed()
        } else {
            self.stop().boxed()
        }
    }
}
