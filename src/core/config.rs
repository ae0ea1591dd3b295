//! 配置管理模块
//!
//! 提供加载器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [model]
//! path = "two_materials.obj"
//! asset_root = "assets"   # 为空时使用可执行文件所在目录
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! log_file = "dist_model.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use super::path::{ExecutableDirResolver, PathResolver, RootDirResolver};

/// 加载器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 模型配置
    #[serde(default)]
    pub model: ModelConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 模型文件路径（相对于资源根目录）
    #[serde(default = "default_model_path")]
    pub path: String,

    /// 资源根目录，为空时使用可执行文件所在目录
    #[serde(default)]
    pub asset_root: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_model_path() -> String { "model.obj".to_string() }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "dist_model.log".to_string() }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            asset_root: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl LogLevel {
    /// 从字符串解析日志级别（不区分大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl ModelConfig {
    /// 根据 `asset_root` 构造路径解析器
    pub fn resolver(&self) -> Result<Box<dyn PathResolver>> {
        if self.asset_root.is_empty() {
            Ok(Box::new(ExecutableDirResolver::new()?))
        } else {
            Ok(Box::new(RootDirResolver::new(PathBuf::from(&self.asset_root))))
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--model <path>`: 模型文件路径
    /// - `--asset-root <dir>`: 资源根目录
    /// - `--log-level <level>`: 日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let value_of = |flag: &str| -> Option<&String> {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
        };

        if let Some(path) = value_of("--model") {
            self.model.path = path.clone();
        }

        if let Some(root) = value_of("--asset-root") {
            self.model.asset_root = root.clone();
        }

        if let Some(level) = value_of("--log-level").and_then(|l| LogLevel::parse(l)) {
            self.logging.level = level;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.model.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model.path".to_string(),
                reason: "Model path must not be empty".to_string(),
            }.into());
        }

        if self.logging.file_output && self.logging.log_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.log_file".to_string(),
                reason: "Log file path is required when file output is enabled".to_string(),
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.path, "model.obj");
        assert!(config.model.asset_root.is_empty());
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [model]
            path = "assets/sponza.obj"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.path, "assets/sponza.obj");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.logging.file_output);
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "dist_model",
            "--model",
            "scene.obj",
            "--asset-root",
            "/tmp/assets",
            "--log-level",
            "WARN",
        ]);

        assert_eq!(config.model.path, "scene.obj");
        assert_eq!(config.model.asset_root, "/tmp/assets");
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.model.path = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.file_output = true;
        config.logging.log_file.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolver_uses_configured_root() {
        let config = ModelConfig {
            path: "cube.obj".to_string(),
            asset_root: "/srv/models".to_string(),
        };
        let resolver = config.resolver().unwrap();
        assert_eq!(resolver.asset_root(), Path::new("/srv/models"));
    }
}
