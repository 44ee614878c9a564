//! 脚本系统
//!
//! JSON 脚本在仿真机构上按步执行

use anyhow::{Context, Result, bail};
use lift_sdk::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::rig::{SimElevator, SimReport, SimSession};

/// 不带 `ticks` 的 wait 默认最多等待的周期数
pub const MAX_WAIT_TICKS: usize = 3000;

/// 脚本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 起始高度（英寸）
    #[serde(default)]
    pub start_height: f64,

    /// 步骤序列
    pub steps: Vec<ScriptStep>,
}

/// 脚本步骤
///
/// 调度类步骤只调度命令，不推进时间；时间由 `wait` 推进。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    SetHeight { target: f64 },
    RaiseToHeight { target: f64 },
    LowerToHeight { target: f64 },
    RaiseStep,
    LowerStep,
    Stop,

    /// 操作员摇杆值（向上为正）
    Jog { axis: f64 },

    /// 推进 `ticks` 个周期；缺省时等到没有命令在运行
    Wait {
        #[serde(default)]
        ticks: Option<usize>,
    },

    /// 强制某侧电流读数
    InjectCurrent { side: Side, amps: f64 },

    /// 撤销电流注入；缺省 `side` 时两侧都撤销
    ClearCurrent {
        #[serde(default)]
        side: Option<Side>,
    },
}

impl ScriptStep {
    pub fn label(&self) -> &'static str {
        match self {
            ScriptStep::SetHeight { .. } => "set_height",
            ScriptStep::RaiseToHeight { .. } => "raise_to_height",
            ScriptStep::LowerToHeight { .. } => "lower_to_height",
            ScriptStep::RaiseStep => "raise_step",
            ScriptStep::LowerStep => "lower_step",
            ScriptStep::Stop => "stop",
            ScriptStep::Jog { .. } => "jog",
            ScriptStep::Wait { .. } => "wait",
            ScriptStep::InjectCurrent { .. } => "inject_current",
            ScriptStep::ClearCurrent { .. } => "clear_current",
        }
    }
}

/// 单步执行后的状态
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: &'static str,
    pub ticks: u64,
    pub height: f64,
    pub speed: f64,
    /// 执行后占用升降机构的命令
    pub active: Option<String>,
}

/// 脚本执行结果
#[derive(Debug, Serialize)]
pub struct ScriptResult {
    pub script_name: String,
    pub steps: Vec<StepRecord>,
    pub report: SimReport,
}

/// 脚本执行器
pub struct ScriptExecutor {
    session: SimSession,
    max_wait_ticks: usize,
}

impl ScriptExecutor {
    pub fn new(constants: RobotConstants, start_height: f64) -> Self {
        Self {
            session: SimSession::new(constants, start_height),
            max_wait_ticks: MAX_WAIT_TICKS,
        }
    }

    /// 设置不带 `ticks` 的 wait 的等待上限
    pub fn with_max_wait_ticks(mut self, ticks: usize) -> Self {
        self.max_wait_ticks = ticks;
        self
    }

    /// 加载脚本文件
    pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Script> {
        let content = fs::read_to_string(path).context("读取脚本文件失败")?;

        let script: Script = serde_json::from_str(&content).context("解析脚本 JSON 失败")?;

        Ok(script)
    }

    /// 执行脚本；任一步骤失败即中止
    pub fn execute(&mut self, script: &Script) -> Result<ScriptResult> {
        let mut steps = Vec::with_capacity(script.steps.len());

        for (index, step) in script.steps.iter().enumerate() {
            tracing::debug!(index, step = step.label(), "Executing script step");
            self.execute_step(step)
                .with_context(|| format!("步骤 {} ({}) 执行失败", index + 1, step.label()))?;
            steps.push(self.record(index, step));
        }

        Ok(ScriptResult {
            script_name: script.name.clone(),
            steps,
            report: self.session.report(None),
        })
    }

    fn execute_step(&mut self, step: &ScriptStep) -> Result<()> {
        match *step {
            ScriptStep::SetHeight { target } => self.schedule(|e| e.set_height(target)),
            ScriptStep::RaiseToHeight { target } => self.schedule(|e| e.raise_to_height(target)),
            ScriptStep::LowerToHeight { target } => self.schedule(|e| e.lower_to_height(target)),
            ScriptStep::RaiseStep => self.schedule(|e| e.raise_step()),
            ScriptStep::LowerStep => self.schedule(|e| e.lower_step()),
            ScriptStep::Stop => self.schedule(|e| e.stop()),

            ScriptStep::Jog { axis } => {
                let operator = self.session.constants.operator;
                let command = self.session.elevator().jog(axis, &operator);
                self.session.scheduler.schedule(command);
            },

            ScriptStep::Wait { ticks: Some(ticks) } => {
                for _ in 0..ticks {
                    self.session.tick();
                }
            },

            ScriptStep::Wait { ticks: None } => {
                if self.session.run_until_idle(self.max_wait_ticks).is_none() {
                    bail!("命令在 {} 个周期内未结束", self.max_wait_ticks);
                }
            },

            ScriptStep::InjectCurrent { side, amps } => {
                if !amps.is_finite() {
                    bail!("无效电流值: {amps}");
                }
                let id = self.session.side_id(side);
                self.session.rig.set_current_override(id, Some(amps));
            },

            ScriptStep::ClearCurrent { side } => {
                let sides = match side {
                    Some(side) => vec![side],
                    None => Side::BOTH.to_vec(),
                };
                for side in sides {
                    let id = self.session.side_id(side);
                    self.session.rig.set_current_override(id, None);
                }
            },
        }
        Ok(())
    }

    fn schedule<C>(&mut self, make: impl FnOnce(&SimElevator) -> C)
    where
        C: Command<SimElevator> + 'static,
    {
        let command = make(self.session.elevator());
        self.session.scheduler.schedule(command);
    }

    fn record(&self, index: usize, step: &ScriptStep) -> StepRecord {
        let scheduler = &self.session.scheduler;
        let elevator = self.session.elevator();
        StepRecord {
            index,
            step: step.label(),
            ticks: scheduler.tick_count(),
            height: elevator.current_height(),
            speed: elevator.speed(),
            active: scheduler
                .owner_of(SimElevator::RESOURCE)
                .and_then(|id| scheduler.command_name(id))
                .map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Script {
        serde_json::from_str(json).unwrap()
    }

    fn run(script: &Script) -> Result<ScriptResult> {
        ScriptExecutor::new(RobotConstants::default(), script.start_height).execute(script)
    }

    #[test]
    fn test_parse_steps() {
        let script = parse(
            r#"{
                "name": "demo",
                "steps": [
                    {"type": "set_height", "target": 20.0},
                    {"type": "wait"},
                    {"type": "wait", "ticks": 5},
                    {"type": "jog", "axis": -0.5},
                    {"type": "inject_current", "side": "left", "amps": 55.0},
                    {"type": "clear_current"},
                    {"type": "stop"}
                ]
            }"#,
        );
        assert_eq!(script.start_height, 0.0);
        assert_eq!(script.steps[0], ScriptStep::SetHeight { target: 20.0 });
        assert_eq!(script.steps[1], ScriptStep::Wait { ticks: None });
        assert_eq!(script.steps[2], ScriptStep::Wait { ticks: Some(5) });
        assert_eq!(
            script.steps[4],
            ScriptStep::InjectCurrent {
                side: Side::Left,
                amps: 55.0
            }
        );
        assert_eq!(script.steps[5], ScriptStep::ClearCurrent { side: None });
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result: Result<Script, _> =
            serde_json::from_str(r#"{"name": "x", "steps": [{"type": "teleport"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_height_then_wait() {
        let script = parse(
            r#"{
                "name": "up",
                "steps": [
                    {"type": "set_height", "target": 20.0},
                    {"type": "wait"}
                ]
            }"#,
        );
        let result = run(&script).unwrap();

        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].active.as_deref(), Some("set_height"));
        assert_eq!(result.steps[0].ticks, 0);
        assert!(result.steps[1].active.is_none());
        assert!(result.report.height > 18.2 && result.report.height < 21.8);
        assert_eq!(result.report.speed, 0.0);
    }

    #[test]
    fn test_overcurrent_blocks_raise_step() {
        let script = parse(
            r#"{
                "name": "blocked",
                "start_height": 10.0,
                "steps": [
                    {"type": "inject_current", "side": "right", "amps": 45.0},
                    {"type": "raise_step"},
                    {"type": "wait", "ticks": 5},
                    {"type": "clear_current", "side": "right"},
                    {"type": "raise_step"},
                    {"type": "wait", "ticks": 5}
                ]
            }"#,
        );
        let result = run(&script).unwrap();

        assert_eq!(result.steps[2].speed, 0.0);
        assert!((result.steps[2].height - 10.0).abs() < 1e-9);
        assert_eq!(result.steps[5].speed, 0.7);
        assert!(result.steps[5].height > 10.0);
    }

    #[test]
    fn test_jog_and_stop() {
        let script = parse(
            r#"{
                "name": "jog",
                "start_height": 10.0,
                "steps": [
                    {"type": "jog", "axis": -1.0},
                    {"type": "wait", "ticks": 3},
                    {"type": "stop"}
                ]
            }"#,
        );
        let result = run(&script).unwrap();

        assert_eq!(result.steps[0].active.as_deref(), Some("lower_step"));
        assert_eq!(result.steps[1].speed, -0.3);
        assert!(result.steps[1].active.is_none());
        assert!(result.steps[1].height < 10.0);
        assert_eq!(result.steps[2].speed, 0.0);
    }

    #[test]
    fn test_wait_times_out() {
        let script = parse(
            r#"{
                "name": "slow",
                "steps": [
                    {"type": "set_height", "target": 30.0},
                    {"type": "wait"}
                ]
            }"#,
        );
        let err = ScriptExecutor::new(RobotConstants::default(), 0.0)
            .with_max_wait_ticks(10)
            .execute(&script)
            .unwrap_err();
        assert!(format!("{err:#}").contains("wait"));
    }

    #[test]
    fn test_load_script_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        fs::write(&path, r#"{"name": "f", "steps": [{"type": "stop"}]}"#).unwrap();

        let script = ScriptExecutor::load_script(&path).unwrap();
        assert_eq!(script.name, "f");
        assert_eq!(script.steps, vec![ScriptStep::Stop]);

        assert!(ScriptExecutor::load_script(dir.path().join("missing.json")).is_err());
    }
}
