//! sim 命令
//!
//! 在仿真机构上调度 `set_height` 并运行固定周期循环

use anyhow::{Context, Result};
use clap::Args;
use lift_sdk::prelude::*;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::commands::config::load_constants;
use crate::rig::{PERIOD, SimReport, SimSession};

/// 仿真命令参数
#[derive(Args, Debug)]
pub struct SimCommand {
    /// 起始高度（英寸）
    #[arg(long, default_value_t = 0.0, value_parser = parse_finite)]
    pub start: f64,

    /// 目标高度（英寸）
    #[arg(long, value_parser = parse_finite)]
    pub target: f64,

    /// 最大周期数
    #[arg(long, default_value_t = 1500)]
    pub ticks: usize,

    /// 按 20ms 墙钟周期运行
    #[arg(long)]
    pub realtime: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    pub json: bool,

    /// 常量文件
    #[arg(short, long)]
    pub constants: Option<PathBuf>,
}

/// 解析有限的高度值；NaN 会让 `set_height` 锁定下降分支且永不到位
fn parse_finite(value: &str) -> Result<f64, String> {
    let height: f64 = value.parse().map_err(|e| format!("无效数值 '{value}': {e}"))?;
    if height.is_finite() {
        Ok(height)
    } else {
        Err(format!("高度必须是有限值: {value}"))
    }
}

impl SimCommand {
    pub fn execute(&self) -> Result<()> {
        let constants = load_constants(self.constants.as_deref())?
            .install()
            .context("安装全局常量失败")?;

        // Ctrl-C 结束循环；调度器析构时取消命令，速度归零
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("注册 Ctrl-C 处理器失败")?;

        let report = self.simulate(constants.clone(), &interrupted)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("🛗 set_height({:.2}) 从 {:.2} in 开始", self.target, self.start);
            report.print_human();
        }
        Ok(())
    }

    fn simulate(&self, constants: RobotConstants, interrupted: &AtomicBool) -> Result<SimReport> {
        let mut session = SimSession::new(constants, self.start);
        let command = session.elevator().set_height(self.target);
        let id = session.scheduler.schedule(command);

        let config = LoopConfig {
            period: PERIOD,
            max_iterations: Some(self.ticks),
            realtime: self.realtime,
        };
        let rig = session.rig.clone();
        let stats = run_loop(&mut session.scheduler, &config, |scheduler, _| {
            if !scheduler.is_scheduled(id) || interrupted.load(Ordering::SeqCst) {
                return ControlFlow::Break(());
            }
            rig.step(PERIOD);
            ControlFlow::Continue(())
        })?;

        if session.scheduler.is_scheduled(id) {
            tracing::warn!(
                ticks = stats.iterations,
                "set_height still running when the tick budget ran out"
            );
        }
        tracing::debug!(
            iterations = stats.iterations,
            overruns = stats.overruns,
            "Simulation finished"
        );
        Ok(session.report(Some(self.target)))
    }
}
