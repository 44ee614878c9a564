//! # Lift Config - 机器人常量
//!
//! 启动时加载一次、运行期只读的常量，按子系统分组：
//!
//! - `can_ids` - 各电机控制器的 CAN 设备 ID
//! - `elevator` - 升降机构几何、行程、电流限制、开环速度
//! - `operator` - 操作手柄端口与死区
//! - `robot` - 汇总结构、TOML 加载/保存、进程级安装
//!
//! ## 使用示例
//!
//! ```rust
//! use lift_config::RobotConstants;
//!
//! let constants = RobotConstants::default();
//! assert_eq!(constants.can_ids.elevator_left, 21);
//! assert!(constants.elevator.position_factor() > 0.0);
//! ```

pub mod can_ids;
pub mod elevator;
mod error;
pub mod operator;
pub mod robot;

// 重新导出常用类型
pub use can_ids::CanIds;
pub use elevator::ElevatorConstants;
pub use error::ConfigError;
pub use operator::OperatorConstants;
pub use robot::RobotConstants;
