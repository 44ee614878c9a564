//! # Lift HAL - 硬件抽象层
//!
//! 电机控制器、相对编码器与遥测输出的统一接口。
//!
//! 控制逻辑只依赖这里定义的 trait：
//!
//! - [`MotorController`] - 占空比输出、电流读取、跟随/反向/限流等配置
//! - [`RelativeEncoder`] - 位置/速度读取，支持换算系数与置零
//! - [`Telemetry`] - 键值遥测（fire-and-forget）
//!
//! 启用 `mock` feature 后，[`sim`] 模块提供无硬件依赖的仿真机构，
//! 供单元测试、集成测试和 CLI 仿真使用。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod telemetry;

#[cfg(feature = "mock")]
pub mod sim;

pub use telemetry::{MemoryTelemetry, NullTelemetry, Telemetry, TelemetryValue, TracingTelemetry};

/// 硬件层统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HalError {
    /// 总线上找不到该设备
    #[error("Device {id} not found on bus")]
    DeviceNotFound { id: CanId },

    /// 控制器拒绝了参数写入
    #[error("Device {id} rejected parameter `{parameter}`")]
    ParameterRejected { id: CanId, parameter: &'static str },

    /// 等待应答超时
    #[error("Device {id} timed out")]
    Timeout { id: CanId },
}

/// CAN 设备 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanId(pub u8);

impl fmt::Display for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAN#{}", self.0)
    }
}

impl From<u8> for CanId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// 空闲（零输出）时的电机行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleMode {
    /// 短接绕组制动
    #[default]
    Brake,
    /// 自由滑行
    Coast,
}

/// 双电机机构的左右侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// 电机内置相对编码器
///
/// 读数已经过换算系数：`position = 转数 × position_factor`，
/// `velocity = RPM × velocity_factor`。
pub trait RelativeEncoder {
    fn position(&self) -> f64;
    fn velocity(&self) -> f64;

    /// 将当前位置重置为 `position`
    fn set_position(&mut self, position: f64) -> Result<(), HalError>;

    fn set_position_conversion_factor(&mut self, factor: f64) -> Result<(), HalError>;
    fn set_velocity_conversion_factor(&mut self, factor: f64) -> Result<(), HalError>;
}

/// 智能电机控制器（CAN 总线）
///
/// 配置类方法可能因总线通信失败而返回错误；运行期的 `set`/读数
/// 假定总能在一个控制周期内完成。
pub trait MotorController {
    type Encoder: RelativeEncoder;

    fn can_id(&self) -> CanId;

    fn set_inverted(&mut self, inverted: bool) -> Result<(), HalError>;
    fn set_idle_mode(&mut self, mode: IdleMode) -> Result<(), HalError>;

    /// 控制器侧电流限制（A）
    fn set_smart_current_limit(&mut self, amps: u32) -> Result<(), HalError>;

    /// 跟随 `leader` 的输出；`invert` 为相对主电机的反向
    fn follow(&mut self, leader: CanId, invert: bool) -> Result<(), HalError>;

    /// 将当前配置写入控制器 flash（掉电保持）
    fn burn_flash(&mut self) -> Result<(), HalError>;

    /// 设置占空比输出，超出 `-1.0..=1.0` 的值被钳位
    fn set(&mut self, speed: f64);

    /// 最近一次 `set` 的占空比
    fn get(&self) -> f64;

    /// 输出电流（A）
    fn output_current(&self) -> f64;

    /// 该控制器的编码器句柄
    fn encoder(&self) -> Self::Encoder;
}

/// 占空比钳位（NaN 视为 0）
pub fn clamp_duty(speed: f64) -> f64 {
    if speed.is_nan() {
        0.0
    } else {
        speed.clamp(-1.0, 1.0)
    }
}
