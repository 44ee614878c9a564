//! 仿真会话：仿真机构 + 升降机构 + 调度器

use lift_sdk::hal::TelemetryValue;
use lift_sdk::hal::sim::{SimConfig, SimMotor, SimRig};
use lift_sdk::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub type SimElevator = ElevatorController<SimMotor, MemoryTelemetry>;

/// 调度周期
pub const PERIOD: Duration = Duration::from_millis(20);

pub struct SimSession {
    pub rig: SimRig,
    pub scheduler: Scheduler<SimElevator>,
    pub telemetry: MemoryTelemetry,
    pub constants: RobotConstants,
}

/// 会话结束时的状态
#[derive(Debug, Serialize)]
pub struct SimReport {
    pub ticks: u64,
    pub height: f64,
    pub speed: f64,
    pub at_target: Option<bool>,
    pub state: MechanismState,
    pub telemetry: BTreeMap<String, TelemetryValue>,
}

impl SimSession {
    /// 机构放在 `start_height`（英寸）处
    pub fn new(constants: RobotConstants, start_height: f64) -> Self {
        let rig = SimRig::new(SimConfig::default());
        let telemetry = MemoryTelemetry::new();
        let elevator = ElevatorController::new(
            rig.motor(CanId(constants.can_ids.elevator_left)),
            rig.motor(CanId(constants.can_ids.elevator_right)),
            telemetry.clone(),
            constants.elevator,
        );
        rig.set_travel(start_height / constants.elevator.position_factor());

        Self {
            rig,
            scheduler: Scheduler::new(elevator),
            telemetry,
            constants,
        }
    }

    pub fn elevator(&self) -> &SimElevator {
        self.scheduler.subsystem()
    }

    pub fn side_id(&self, side: Side) -> CanId {
        match side {
            Side::Left => CanId(self.constants.can_ids.elevator_left),
            Side::Right => CanId(self.constants.can_ids.elevator_right),
        }
    }

    /// 先推进物理，再运行一次调度
    pub fn tick(&mut self) {
        self.rig.step(PERIOD);
        self.scheduler.run();
    }

    /// 运行直到没有命令在调度中，返回用掉的周期数；超过 `max_ticks` 返回 None
    pub fn run_until_idle(&mut self, max_ticks: usize) -> Option<usize> {
        for tick in 0..max_ticks {
            if self.scheduler.scheduled_count() == 0 {
                return Some(tick);
            }
            self.tick();
        }
        (self.scheduler.scheduled_count() == 0).then_some(max_ticks)
    }

    pub fn report(&self, target: Option<f64>) -> SimReport {
        let elevator = self.elevator();
        let state = elevator.mechanism_state();
        SimReport {
            ticks: self.scheduler.tick_count(),
            height: state.height(),
            speed: elevator.speed(),
            at_target: target.map(|t| state.is_at_height(t, elevator.constants())),
            state,
            telemetry: self.telemetry.snapshot(),
        }
    }
}

impl SimReport {
    pub fn print_human(&self) {
        println!("📏 高度: {:.2} in", self.height);
        println!(
            "   左/右: {:.2} / {:.2} in",
            self.state.left_position, self.state.right_position
        );
        println!("⚡ 速度: {:.2}", self.speed);
        if let Some(at_target) = self.at_target {
            println!("🎯 到位: {}", if at_target { "是" } else { "否" });
        }
        println!("⏱️  周期数: {}", self.ticks);
    }
}
