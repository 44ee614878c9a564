//! 遥测键名

pub const LEFT_POSITION: &str = "LeftPosition";
pub const RIGHT_POSITION: &str = "RightPosition";
pub const LEFT_VELOCITY: &str = "LeftVelocity";
pub const RIGHT_VELOCITY: &str = "RightVelocity";
/// 注意语义为"安全"，即 `!is_unsafe()`
pub const SAFE: &str = "Is Elevator in Safe position?";
pub const CAN_GO_HIGHER: &str = "ElevatorCanGoHigher";
pub const CAN_GO_LOWER: &str = "ElevatorCanGoLower";
