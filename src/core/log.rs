//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 特性
//!
//! - 结构化日志：支持键值对
//! - 灵活输出：支持控制台和文件输出
//! - 日志级别：trace, debug, info, warn, error
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_model::core::log;
//! use dist_model::core::config::LogLevel;
//!
//! log::init_logger(LogLevel::Info, false, None)?;
//! tracing::info!(vertices = 128, "Model loaded");
//! # Ok::<(), dist_model::core::DistModelError>(())
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;
use super::error::{DistModelError, Result};

/// 初始化日志系统
///
/// 必须在程序开始时调用一次，重复初始化会返回 `DistModelError::Log`。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "dist_model.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let filter = EnvFilter::new(level.as_filter());

    let result = if file_output {
        let log_path = log_file_path.unwrap_or("dist_model.log");
        let path = Path::new(log_path);
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let filename = path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("dist_model.log");

        // 每天滚动的文件 appender
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            directory,
            filename
        );

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };

    result.map_err(|e| DistModelError::Log(e.to_string()))
}

impl LogLevel {
    /// `EnvFilter` 使用的指令字符串
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 加载器内部日志 - Info 级别
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "dist_model::engine", $($arg)*)
    };
}

/// 加载器内部日志 - Warn 级别
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "dist_model::engine", $($arg)*)
    };
}

/// 加载器内部日志 - Error 级别
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "dist_model::engine", $($arg)*)
    };
}

/// 应用层日志 - Info 级别
#[macro_export]
macro_rules! app_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "dist_model::app", $($arg)*)
    };
}

/// 应用层日志 - Error 级别
#[macro_export]
macro_rules! app_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "dist_model::app", $($arg)*)
    };
}

/// 性能追踪宏
///
/// 创建一个 TRACE 级别的 span，配合 `FmtSpan::CLOSE` 在结束时输出耗时。
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::span!(tracing::Level::TRACE, $name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_strings() {
        assert_eq!(LogLevel::Debug.as_filter(), "debug");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }
}
