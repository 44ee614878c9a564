//! 升降机构控制器：硬件配置、状态查询与遥测

use lift_command::{Resource, Subsystem};
use lift_config::ElevatorConstants;
use lift_hal::{HalError, IdleMode, MotorController, RelativeEncoder, Telemetry, clamp_duty};
use tracing::{info, warn};

use crate::keys;
use crate::state::MechanismState;

/// 双电机升降机构
///
/// `primary` 接收速度命令，`follower` 在硬件层跟随 `primary` 的输出。
/// 所有查询都直接读取两侧编码器与电流，控制器自身不缓存任何位置。
pub struct ElevatorController<M: MotorController, T> {
    primary: M,
    follower: M,
    primary_encoder: M::Encoder,
    follower_encoder: M::Encoder,
    telemetry: T,
    constants: ElevatorConstants,
}

impl<M: MotorController, T> ElevatorController<M, T> {
    /// 升降机构占用的调度资源
    pub const RESOURCE: Resource = Resource::new("elevator");

    /// 配置两个控制器并把编码器清零
    ///
    /// 配置写入失败只记录警告，不中断构造（与控制器上电后沿用旧参数的
    /// 行为一致）。
    pub fn new(mut primary: M, mut follower: M, telemetry: T, constants: ElevatorConstants) -> Self {
        let primary_id = primary.can_id();
        let follower_id = follower.can_id();

        report(primary.set_inverted(constants.motor_left_inverted), "primary inverted");
        report(primary.set_idle_mode(IdleMode::Brake), "primary idle mode");
        report(
            primary.set_smart_current_limit(constants.current_limit_amps),
            "primary current limit",
        );
        report(primary.burn_flash(), "primary burn flash");

        report(follower.set_idle_mode(IdleMode::Brake), "follower idle mode");
        report(
            follower.set_smart_current_limit(constants.current_limit_amps),
            "follower current limit",
        );
        report(
            follower.follow(primary_id, constants.motor_right_inverted),
            "follower follow",
        );
        report(follower.burn_flash(), "follower burn flash");

        let mut primary_encoder = primary.encoder();
        let mut follower_encoder = follower.encoder();
        let position_factor = constants.position_factor();
        let velocity_factor = constants.velocity_factor();
        for encoder in [&mut primary_encoder, &mut follower_encoder] {
            report(
                encoder.set_position_conversion_factor(position_factor),
                "position conversion factor",
            );
            report(
                encoder.set_velocity_conversion_factor(velocity_factor),
                "velocity conversion factor",
            );
        }

        let mut elevator = Self {
            primary,
            follower,
            primary_encoder,
            follower_encoder,
            telemetry,
            constants,
        };
        elevator.reset_encoders();

        info!(
            primary = %primary_id,
            follower = %follower_id,
            position_factor,
            "Elevator initialized"
        );
        elevator
    }

    fn reset_encoders(&mut self) {
        report(self.primary_encoder.set_position(0.0), "primary encoder reset");
        report(self.follower_encoder.set_position(0.0), "follower encoder reset");
    }

    /// 当前传感器读数
    pub fn mechanism_state(&self) -> MechanismState {
        MechanismState {
            left_position: self.primary_encoder.position(),
            right_position: self.follower_encoder.position(),
            left_velocity: self.primary_encoder.velocity(),
            right_velocity: self.follower_encoder.velocity(),
            left_current: self.primary.output_current(),
            right_current: self.follower.output_current(),
        }
    }

    pub fn current_height(&self) -> f64 {
        self.mechanism_state().height()
    }

    pub fn can_go_lower(&self) -> bool {
        self.mechanism_state().can_go_lower(&self.constants)
    }

    pub fn can_go_higher(&self) -> bool {
        self.mechanism_state().can_go_higher(&self.constants)
    }

    pub fn is_unsafe(&self) -> bool {
        self.mechanism_state().is_unsafe(&self.constants)
    }

    pub fn is_at_height(&self, target: f64) -> bool {
        self.mechanism_state().is_at_height(target, &self.constants)
    }

    /// 最近一次下发给主电机的占空比
    pub fn speed(&self) -> f64 {
        self.primary.get()
    }

    pub(crate) fn set_speed(&mut self, speed: f64) {
        self.primary.set(clamp_duty(speed));
    }

    pub fn constants(&self) -> &ElevatorConstants {
        &self.constants
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn primary(&self) -> &M {
        &self.primary
    }

    pub fn follower(&self) -> &M {
        &self.follower
    }
}

impl<M: MotorController, T: Telemetry> ElevatorController<M, T> {
    /// 发布一帧遥测
    pub fn publish_telemetry(&mut self) {
        let state = self.mechanism_state();
        let safe = !state.is_unsafe(&self.constants);
        let can_go_higher = state.can_go_higher(&self.constants);
        let can_go_lower = state.can_go_lower(&self.constants);

        let telemetry = &mut self.telemetry;
        telemetry.publish_number(keys::LEFT_POSITION, state.left_position);
        telemetry.publish_number(keys::RIGHT_POSITION, state.right_position);
        telemetry.publish_number(keys::LEFT_VELOCITY, state.left_velocity);
        telemetry.publish_number(keys::RIGHT_VELOCITY, state.right_velocity);
        telemetry.publish_boolean(keys::SAFE, safe);
        telemetry.publish_boolean(keys::CAN_GO_HIGHER, can_go_higher);
        telemetry.publish_boolean(keys::CAN_GO_LOWER, can_go_lower);
    }
}

impl<M: MotorController, T: Telemetry> Subsystem for ElevatorController<M, T> {
    fn periodic(&mut self) {
        self.publish_telemetry();
    }
}

fn report(result: Result<(), HalError>, step: &'static str) {
    if let Err(error) = result {
        warn!(%error, step, "Elevator hardware configuration failed, continuing");
    }
}
