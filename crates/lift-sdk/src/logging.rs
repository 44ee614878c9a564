//! 日志初始化

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, ParseError};

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log directive: {0}")]
    Directive(#[from] ParseError),

    #[error("Global subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("log bridge already installed: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

/// 安装全局 tracing subscriber
///
/// `RUST_LOG` 中的指令优先，`default_directive`（如 `"lift=info"`）追加其后。
/// 输出到 stderr，stdout 留给命令结果。`log` crate 的记录通过 `tracing-log`
/// 转发。进程内只能调用一次。
pub fn init_logging(default_directive: &str) -> Result<(), LoggingError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_directive)?)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init_with_filter(log::LevelFilter::Trace)?;
    Ok(())
}

fn build_filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    let directive: Directive = default_directive.parse()?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}
