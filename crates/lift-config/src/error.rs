//! 配置层错误类型定义

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML 解析错误
    #[error("Failed to parse constants: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化错误
    #[error("Failed to serialize constants: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 常量取值非法
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// 进程级常量已经安装过
    #[error("Robot constants already installed for this process")]
    AlreadyInstalled,
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::invalid("elevator.tolerance_in", "must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid value for `elevator.tolerance_in`: must be > 0"
        );
    }

    #[test]
    fn test_from_parse_error() {
        let parse_err = toml::from_str::<toml::Table>("not = [valid").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse constants"));
    }
}
