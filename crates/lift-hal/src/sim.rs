//! 仿真机构（`mock` feature）
//!
//! 模拟一组机械耦合在同一机构上的电机控制器：
//!
//! - 非跟随电机（leader）的占空比驱动机构运动，多个 leader 取平均
//! - 跟随电机镜像 leader 的输出（可相对反向）
//! - 所有电机转子随机构一起转动；`slip` 为单侧额外偏移，用于模拟两侧不同步
//! - 机构行程可被硬限位钳住，顶住限位时输出电流上升到堵转电流
//!
//! 控制器的 inverted 标志同时翻转输出和编码器方向，因此不改变读数方向，
//! 仿真中只记录该配置，不参与运动计算。
//!
//! # 使用示例
//!
//! ```rust
//! use lift_hal::sim::{SimConfig, SimRig};
//! use lift_hal::{CanId, MotorController, RelativeEncoder};
//! use std::time::Duration;
//!
//! let rig = SimRig::new(SimConfig::default());
//! let mut motor = rig.motor(CanId(21));
//! let encoder = motor.encoder();
//!
//! motor.set(0.5);
//! rig.step(Duration::from_millis(20));
//! assert!(encoder.position() > 0.0);
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::{CanId, HalError, IdleMode, MotorController, RelativeEncoder, clamp_duty};

/// 仿真参数
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// 满占空比时的空载转速（RPM）
    pub free_speed_rpm: f64,

    /// 有输出时的空载电流（A）
    pub free_current: f64,

    /// 满占空比时叠加的负载电流（A）
    pub load_current: f64,

    /// 满占空比堵转电流（A）
    pub stall_current: f64,

    /// 机构下硬限位（电机转数），`None` 表示无限位
    pub lower_hard_stop: Option<f64>,

    /// 机构上硬限位（电机转数）
    pub upper_hard_stop: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        // NEO 无刷电机的典型参数
        Self {
            free_speed_rpm: 5676.0,
            free_current: 1.8,
            load_current: 20.0,
            stall_current: 105.0,
            lower_hard_stop: None,
            upper_hard_stop: None,
        }
    }
}

/// 单个仿真控制器的配置/状态快照
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub id: CanId,
    pub inverted: bool,
    pub idle_mode: IdleMode,
    pub current_limit: Option<u32>,
    pub follower_of: Option<(CanId, bool)>,
    pub flash_burns: u32,
    pub setpoint: f64,
    pub applied: f64,
    pub current: f64,
    pub position_factor: f64,
    pub velocity_factor: f64,
}

#[derive(Debug)]
struct Device {
    id: CanId,
    inverted: bool,
    idle_mode: IdleMode,
    current_limit: Option<u32>,
    follower_of: Option<(CanId, bool)>,
    flash_burns: u32,
    setpoint: f64,
    slip: f64,
    zero_ref: f64,
    position_factor: f64,
    velocity_factor: f64,
    current_override: Option<f64>,
    reject_config: bool,
}

impl Device {
    fn new(id: CanId) -> Self {
        Self {
            id,
            inverted: false,
            idle_mode: IdleMode::Brake,
            current_limit: None,
            follower_of: None,
            flash_burns: 0,
            setpoint: 0.0,
            slip: 0.0,
            zero_ref: 0.0,
            position_factor: 1.0,
            velocity_factor: 1.0,
            current_override: None,
            reject_config: false,
        }
    }
}

#[derive(Debug)]
struct RigState {
    config: SimConfig,
    /// 机构行程（电机转数）
    travel: f64,
    /// 最近一步的机构转速（RPM）
    rpm: f64,
    /// 最近一步是否顶在硬限位上
    stalled: bool,
    devices: Vec<Device>,
}

impl RigState {
    fn index(&self, id: CanId) -> Option<usize> {
        self.devices.iter().position(|d| d.id == id)
    }

    fn device(&self, id: CanId) -> &Device {
        // SimMotor/SimEncoder 只能通过 SimRig::motor 创建，设备必然已注册
        &self.devices[self.index(id).unwrap_or_default()]
    }

    fn device_mut(&mut self, id: CanId) -> &mut Device {
        let idx = self.index(id).unwrap_or_default();
        &mut self.devices[idx]
    }

    fn applied(&self, id: CanId) -> f64 {
        let device = self.device(id);
        match device.follower_of {
            Some((leader, invert)) => match self.index(leader) {
                Some(idx) => {
                    let out = self.devices[idx].setpoint;
                    if invert { -out } else { out }
                },
                None => 0.0,
            },
            None => device.setpoint,
        }
    }

    /// leader 的平均占空比
    fn drive(&self) -> f64 {
        let leaders: Vec<f64> = self
            .devices
            .iter()
            .filter(|d| d.follower_of.is_none())
            .map(|d| d.setpoint)
            .collect();
        if leaders.is_empty() {
            0.0
        } else {
            leaders.iter().sum::<f64>() / leaders.len() as f64
        }
    }

    fn current(&self, id: CanId) -> f64 {
        let device = self.device(id);
        if let Some(amps) = device.current_override {
            return amps;
        }
        let applied = self.applied(id).abs();
        if applied == 0.0 {
            0.0
        } else if self.stalled {
            self.config.stall_current * applied
        } else {
            self.config.free_current + self.config.load_current * applied
        }
    }

    fn rotor(&self, id: CanId) -> f64 {
        self.travel + self.device(id).slip
    }

    fn configure(
        &mut self,
        id: CanId,
        parameter: &'static str,
        apply: impl FnOnce(&mut Device),
    ) -> Result<(), HalError> {
        let device = self.device_mut(id);
        if device.reject_config {
            return Err(HalError::ParameterRejected { id, parameter });
        }
        apply(device);
        Ok(())
    }
}

/// 仿真机构
///
/// 克隆得到的句柄共享同一机构。
#[derive(Debug, Clone)]
pub struct SimRig {
    state: Arc<Mutex<RigState>>,
}

impl SimRig {
    pub fn new(config: SimConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(RigState {
                config,
                travel: 0.0,
                rpm: 0.0,
                stalled: false,
                devices: Vec::new(),
            })),
        }
    }

    /// 获取（必要时注册）指定 ID 的电机控制器
    pub fn motor(&self, id: CanId) -> SimMotor {
        let mut state = self.state.lock();
        if state.index(id).is_none() {
            state.devices.push(Device::new(id));
        }
        SimMotor {
            state: Arc::clone(&self.state),
            id,
        }
    }

    /// 推进仿真 `dt`
    pub fn step(&self, dt: Duration) {
        let mut state = self.state.lock();
        let secs = dt.as_secs_f64();
        let drive = state.drive();
        let target = state.travel + drive * state.config.free_speed_rpm / 60.0 * secs;

        let mut next = target;
        if let Some(lower) = state.config.lower_hard_stop {
            next = next.max(lower);
        }
        if let Some(upper) = state.config.upper_hard_stop {
            next = next.min(upper);
        }

        state.stalled = next != target;
        state.rpm = if secs > 0.0 {
            (next - state.travel) / secs * 60.0
        } else {
            0.0
        };
        state.travel = next;
    }

    /// 机构行程（电机转数）
    pub fn travel(&self) -> f64 {
        self.state.lock().travel
    }

    /// 直接把机构放到指定行程（电机转数），不影响编码器零点
    pub fn set_travel(&self, rotations: f64) {
        let mut state = self.state.lock();
        state.travel = rotations;
        state.rpm = 0.0;
        state.stalled = false;
    }

    /// 单侧相对机构的额外转数（模拟链条跳齿/两侧不同步）
    pub fn set_slip(&self, id: CanId, rotations: f64) {
        let mut state = self.state.lock();
        if state.index(id).is_some() {
            state.device_mut(id).slip = rotations;
        }
    }

    /// 强制某个控制器报告的输出电流
    pub fn set_current_override(&self, id: CanId, amps: Option<f64>) {
        let mut state = self.state.lock();
        if state.index(id).is_some() {
            state.device_mut(id).current_override = amps;
        }
    }

    /// 让某个控制器拒绝后续所有配置写入
    pub fn reject_configuration(&self, id: CanId, reject: bool) {
        let mut state = self.state.lock();
        if state.index(id).is_some() {
            state.device_mut(id).reject_config = reject;
        }
    }

    pub fn is_stalled(&self) -> bool {
        self.state.lock().stalled
    }

    pub fn device(&self, id: CanId) -> Option<DeviceSnapshot> {
        let state = self.state.lock();
        state.index(id)?;
        let device = state.device(id);
        Some(DeviceSnapshot {
            id,
            inverted: device.inverted,
            idle_mode: device.idle_mode,
            current_limit: device.current_limit,
            follower_of: device.follower_of,
            flash_burns: device.flash_burns,
            setpoint: device.setpoint,
            applied: state.applied(id),
            current: state.current(id),
            position_factor: device.position_factor,
            velocity_factor: device.velocity_factor,
        })
    }
}

/// 仿真电机控制器句柄
#[derive(Debug, Clone)]
pub struct SimMotor {
    state: Arc<Mutex<RigState>>,
    id: CanId,
}

impl MotorController for SimMotor {
    type Encoder = SimEncoder;

    fn can_id(&self) -> CanId {
        self.id
    }

    fn set_inverted(&mut self, inverted: bool) -> Result<(), HalError> {
        self.state
            .lock()
            .configure(self.id, "inverted", |d| d.inverted = inverted)
    }

    fn set_idle_mode(&mut self, mode: IdleMode) -> Result<(), HalError> {
        self.state
            .lock()
            .configure(self.id, "idle_mode", |d| d.idle_mode = mode)
    }

    fn set_smart_current_limit(&mut self, amps: u32) -> Result<(), HalError> {
        self.state
            .lock()
            .configure(self.id, "smart_current_limit", |d| {
                d.current_limit = Some(amps)
            })
    }

    fn follow(&mut self, leader: CanId, invert: bool) -> Result<(), HalError> {
        let mut state = self.state.lock();
        if state.index(leader).is_none() {
            return Err(HalError::DeviceNotFound { id: leader });
        }
        state.configure(self.id, "follow", |d| d.follower_of = Some((leader, invert)))
    }

    fn burn_flash(&mut self) -> Result<(), HalError> {
        self.state
            .lock()
            .configure(self.id, "burn_flash", |d| d.flash_burns += 1)
    }

    fn set(&mut self, speed: f64) {
        self.state.lock().device_mut(self.id).setpoint = clamp_duty(speed);
    }

    fn get(&self) -> f64 {
        self.state.lock().device(self.id).setpoint
    }

    fn output_current(&self) -> f64 {
        self.state.lock().current(self.id)
    }

    fn encoder(&self) -> SimEncoder {
        SimEncoder {
            state: Arc::clone(&self.state),
            id: self.id,
        }
    }
}

/// 仿真编码器句柄
#[derive(Debug, Clone)]
pub struct SimEncoder {
    state: Arc<Mutex<RigState>>,
    id: CanId,
}

impl RelativeEncoder for SimEncoder {
    fn position(&self) -> f64 {
        let state = self.state.lock();
        let device = state.device(self.id);
        (state.rotor(self.id) - device.zero_ref) * device.position_factor
    }

    fn velocity(&self) -> f64 {
        let state = self.state.lock();
        state.rpm * state.device(self.id).velocity_factor
    }

    fn set_position(&mut self, position: f64) -> Result<(), HalError> {
        let mut state = self.state.lock();
        let rotor = state.rotor(self.id);
        state.configure(self.id, "position", |d| {
            d.zero_ref = if d.position_factor != 0.0 {
                rotor - position / d.position_factor
            } else {
                rotor
            };
        })
    }

    fn set_position_conversion_factor(&mut self, factor: f64) -> Result<(), HalError> {
        self.state
            .lock()
            .configure(self.id, "position_conversion_factor", |d| {
                d.position_factor = factor
            })
    }

    fn set_velocity_conversion_factor(&mut self, factor: f64) -> Result<(), HalError> {
        self.state
            .lock()
            .configure(self.id, "velocity_conversion_factor", |d| {
                d.velocity_factor = factor
            })
    }
}
