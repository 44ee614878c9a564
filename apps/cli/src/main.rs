//! # Lift CLI
//!
//! 升降机构命令行工具：常量查看/校验、仿真与脚本执行。
//!
//! ```bash
//! # 查看生效常量（TOML）
//! lift-cli config show --file robot.toml
//!
//! # 仿真：从 0 英寸升到 20 英寸
//! lift-cli sim --start 0 --target 20
//!
//! # 在仿真机构上执行 JSON 脚本
//! lift-cli run --script demo.json --json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod rig;
mod script;

use commands::{ConfigCommand, RunCommand, SimCommand};

/// Lift CLI - 升降机构命令行工具
#[derive(Parser, Debug)]
#[command(name = "lift-cli")]
#[command(about = "Command-line interface for the lift elevator subsystem", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 常量管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 在仿真机构上运行 set_height
    Sim {
        #[command(flatten)]
        args: SimCommand,
    },

    /// 在仿真机构上执行脚本
    Run {
        #[command(flatten)]
        args: RunCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    lift_sdk::init_logging("lift_cli=info")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(),

        Commands::Sim { args } => args.execute(),

        Commands::Run { args } => args.execute(),
    }
}
