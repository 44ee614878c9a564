//! run 命令
//!
//! 在仿真机构上执行脚本文件

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::commands::config::load_constants;
use crate::script::{MAX_WAIT_TICKS, ScriptExecutor, ScriptResult};

/// 脚本执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 脚本文件路径
    #[arg(short, long)]
    pub script: PathBuf,

    /// 以 JSON 输出结果
    #[arg(long)]
    pub json: bool,

    /// 常量文件
    #[arg(short, long)]
    pub constants: Option<PathBuf>,

    /// 不带 `ticks` 的 wait 最多等待的周期数
    #[arg(long, default_value_t = MAX_WAIT_TICKS)]
    pub max_wait_ticks: usize,
}

impl RunCommand {
    /// 执行脚本
    pub fn execute(&self) -> Result<()> {
        let constants = load_constants(self.constants.as_deref())?
            .install()
            .context("安装全局常量失败")?;
        let script = ScriptExecutor::load_script(&self.script)?;

        if !self.json {
            println!("📜 脚本: {}", script.name);
            if !script.description.is_empty() {
                println!("    {}", script.description);
            }
            println!("    {} 个步骤", script.steps.len());
            println!();
        }

        let mut executor = ScriptExecutor::new(constants.clone(), script.start_height)
            .with_max_wait_ticks(self.max_wait_ticks);
        let result = executor.execute(&script)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result);
        }
        Ok(())
    }
}

fn print_result(result: &ScriptResult) {
    for record in &result.steps {
        println!(
            "  {:>3}. {:<16} tick {:>5}  高度 {:>6.2} in  速度 {:>5.2}  {}",
            record.index + 1,
            record.step,
            record.ticks,
            record.height,
            record.speed,
            record.active.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!("📊 执行结果:");
    result.report.print_human();
}
