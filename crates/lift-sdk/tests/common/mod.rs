//! 集成测试公共设施：仿真机构 + 调度器
#![allow(dead_code)]

use lift_sdk::hal::sim::{SimConfig, SimMotor, SimRig};
use lift_sdk::prelude::*;
use std::time::Duration;

pub type SimElevator = ElevatorController<SimMotor, MemoryTelemetry>;

pub const TICK: Duration = Duration::from_millis(20);

pub struct Harness {
    pub rig: SimRig,
    pub scheduler: Scheduler<SimElevator>,
    pub telemetry: MemoryTelemetry,
    pub constants: RobotConstants,
}

impl Harness {
    /// 默认常量，机构放在 `height`（英寸）处
    pub fn at_height(height: f64) -> Self {
        Self::with_constants(RobotConstants::default(), height)
    }

    pub fn with_constants(constants: RobotConstants, height: f64) -> Self {
        let rig = SimRig::new(SimConfig::default());
        let telemetry = MemoryTelemetry::new();
        let elevator = ElevatorController::new(
            rig.motor(CanId(constants.can_ids.elevator_left)),
            rig.motor(CanId(constants.can_ids.elevator_right)),
            telemetry.clone(),
            constants.elevator,
        );
        rig.set_travel(height / constants.elevator.position_factor());
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

    pub fn schedule<C>(&mut self, make: impl FnOnce(&SimElevator) -> C) -> CommandId
    where
        C: Command<SimElevator> + 'static,
    {
        let command = make(self.scheduler.subsystem());
        self.scheduler.schedule(command)
    }

    /// 推进一个 20ms 周期：先物理，再调度
    pub fn tick(&mut self) {
        self.rig.step(TICK);
        self.scheduler.run();
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// 运行直到命令结束，返回用掉的周期数
    pub fn run_until_done(&mut self, id: CommandId, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while self.scheduler.is_scheduled(id) {
            assert!(ticks < max_ticks, "command {id} still running after {max_ticks} ticks");
            self.tick();
            ticks += 1;
        }
        ticks
    }

    pub fn height(&self) -> f64 {
        self.elevator().current_height()
    }

    pub fn speed(&self) -> f64 {
        self.elevator().speed()
    }

    pub fn left_id(&self) -> CanId {
        CanId(self.constants.can_ids.elevator_left)
    }

    pub fn right_id(&self) -> CanId {
        CanId(self.constants.can_ids.elevator_right)
    }

    pub fn inject_current(&self, side: Side, amps: f64) {
        let id = match side {
            Side::Left => self.left_id(),
            Side::Right => self.right_id(),
        };
        self.rig.set_current_override(id, Some(amps));
    }
}
