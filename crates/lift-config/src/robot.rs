//! # 机器人常量汇总
//!
//! 启动时从 TOML 加载一次，之后通过 [`RobotConstants::global`] 只读访问。
//! 文件中缺失的字段取默认值，因此一个空文件等价于默认配置。
//!
//! ```toml
//! [can_ids]
//! elevator_left = 21
//! elevator_right = 22
//!
//! [elevator]
//! max_travel_in = 36.0
//! tolerance_in = 1.8
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::{CanIds, ConfigError, ElevatorConstants, OperatorConstants};

static GLOBAL: OnceLock<RobotConstants> = OnceLock::new();

/// 机器人常量（按子系统分组）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConstants {
    pub can_ids: CanIds,
    pub elevator: ElevatorConstants,
    pub operator: OperatorConstants,
}

impl RobotConstants {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let constants: Self = toml::from_str(content)?;
        constants.validate()?;
        Ok(constants)
    }

    /// 从文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let constants = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded robot constants");
        Ok(constants)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验所有分组
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((a, b, id)) = self.can_ids.find_duplicate() {
            return Err(ConfigError::invalid(
                "can_ids",
                format!("`{a}` and `{b}` share CAN id {id}"),
            ));
        }
        self.elevator.validate()?;

        let deadband = self.operator.arm_manual_deadband;
        if !(0.0..1.0).contains(&deadband) {
            return Err(ConfigError::invalid(
                "operator.arm_manual_deadband",
                format!("must be in [0, 1), got {deadband}"),
            ));
        }
        Ok(())
    }

    /// 安装为进程级常量（只能调用一次）
    pub fn install(self) -> Result<&'static RobotConstants, ConfigError> {
        self.validate()?;
        GLOBAL.set(self).map_err(|_| ConfigError::AlreadyInstalled)?;
        info!("Robot constants installed");
        Ok(Self::global())
    }

    /// 进程级常量
    ///
    /// 未调用 [`install`](Self::install) 时返回默认值。
    pub fn global() -> &'static RobotConstants {
        GLOBAL.get_or_init(RobotConstants::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_is_default() {
        let constants = RobotConstants::from_toml_str("").unwrap();
        assert_eq!(constants, RobotConstants::default());
    }

    #[test]
    fn test_partial_override() {
        let constants = RobotConstants::from_toml_str(
            r#"
[elevator]
max_travel_in = 30.0
speed_up = 0.5

[can_ids]
elevator_left = 31
elevator_right = 32
"#,
        )
        .unwrap();

        assert_eq!(constants.elevator.max_travel_in, 30.0);
        assert_eq!(constants.elevator.speed_up, 0.5);
        // 未覆盖字段保持默认
        assert_eq!(constants.elevator.tolerance_in, 1.8);
        assert_eq!(constants.can_ids.elevator_left, 31);
        assert_eq!(constants.can_ids.slider, 23);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = RobotConstants::from_toml_str("[elevator]\ntolerance_in = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = RobotConstants::from_toml_str("[can_ids]\nelevator_right = 21\n").unwrap_err();
        assert!(err.to_string().contains("elevator_left"));

        let err =
            RobotConstants::from_toml_str("[operator]\narm_manual_deadband = 1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "operator.arm_manual_deadband",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = RobotConstants::from_toml_str("[elevator\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let mut constants = RobotConstants::default();
        constants.elevator.max_travel_in = 40.0;

        let file = tempfile::NamedTempFile::new().unwrap();
        constants.save_to_file(file.path()).unwrap();

        let loaded = RobotConstants::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, constants);
    }

    #[test]
    fn test_load_from_handwritten_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[elevator]\nspeed_down = -0.25").unwrap();

        let loaded = RobotConstants::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.elevator.speed_down, -0.25);
    }

    #[test]
    fn test_missing_file() {
        let err = RobotConstants::load_from_file("/nonexistent/lift/constants.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_global_install_once() {
        // 同一测试进程中 GLOBAL 只能初始化一次，因此 install 与 global 放在同一测试里
        let first = RobotConstants::default().install();
        let global = RobotConstants::global();
        assert_eq!(global, &RobotConstants::default());

        if first.is_ok() {
            assert!(matches!(
                RobotConstants::default().install(),
                Err(ConfigError::AlreadyInstalled)
            ));
        }
    }
}
