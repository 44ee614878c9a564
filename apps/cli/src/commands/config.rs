//! 常量管理命令
//!
//! 查看与校验机器人常量文件（TOML）

use anyhow::{Context, Result};
use clap::Subcommand;
use lift_sdk::RobotConstants;
use std::path::{Path, PathBuf};

/// 加载常量：未指定文件时使用内置默认值
pub fn load_constants(file: Option<&Path>) -> Result<RobotConstants> {
    match file {
        Some(path) => RobotConstants::load_from_file(path)
            .with_context(|| format!("加载常量文件失败: {}", path.display())),
        None => Ok(RobotConstants::default()),
    }
}

/// 常量命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效的常量（TOML）
    Show {
        /// 常量文件，缺省为内置默认值
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 校验常量文件
    Check {
        /// 常量文件
        #[arg(short, long)]
        file: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Show { file } => {
                print!("{}", Self::show_(file.as_deref())?);
                Ok(())
            },

            ConfigCommand::Check { file } => {
                let constants = load_constants(Some(&file))?;
                println!("✅ 常量文件有效: {}", file.display());
                println!(
                    "  升降机构: CAN#{} (主) / CAN#{} (跟随)",
                    constants.can_ids.elevator_left, constants.can_ids.elevator_right
                );
                println!(
                    "  行程: {:.1} ~ {:.1} in, 容差 {:.2} in",
                    constants.elevator.min_travel_in,
                    constants.elevator.max_travel_in,
                    constants.elevator.tolerance_in
                );
                Ok(())
            },
        }
    }

    fn show_(file: Option<&Path>) -> Result<String> {
        let constants = load_constants(file)?;
        let mut out = constants.to_toml_string().context("序列化常量失败")?;

        // 派生量只作为注释输出，不参与解析
        out.push_str(&format!(
            "\n# position_factor = {:.9} in/rev\n# velocity_factor = {:.9} in/s per rpm\n",
            constants.elevator.position_factor(),
            constants.elevator.velocity_factor()
        ));
        Ok(out)
    }
}
