//! 错误处理模块
//!
//! 定义了加载器中使用的统一错误类型，使用 `thiserror` 提供友好的错误消息。
//!
//! # 设计原则
//!
//! - 使用 `thiserror` 自动实现 `Error` trait
//! - 为每种错误类型提供清晰的上下文信息
//! - 加载期错误整体中止加载，访问期错误（材质索引越界）可由调用方恢复

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, DistModelError>;

/// 顶层错误类型
#[derive(Debug, Error)]
pub enum DistModelError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 网格加载错误
    #[error("Mesh loading error: {0}")]
    MeshLoading(#[from] MeshLoadError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 日志系统错误
    #[error("Log error: {0}")]
    Log(String),
}

/// 配置相关的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件未找到
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// 配置值无效
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 顶点属性的种类，用于越界错误的上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    Normal,
    Texcoord,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Position => write!(f, "position"),
            AttributeKind::Normal => write!(f, "normal"),
            AttributeKind::Texcoord => write!(f, "texcoord"),
        }
    }
}

/// 网格加载相关的错误
#[derive(Debug, Error)]
pub enum MeshLoadError {
    /// 文件不存在或无法读取
    #[error("Mesh file not found or unreadable: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// 解析失败（携带解析器给出的消息）
    #[error("Failed to parse mesh: {0}")]
    ParseError(String),

    /// 面引用了超出属性数组范围的索引
    #[error("{kind} index {index} out of range (attribute count {len})")]
    AttributeIndexOutOfRange {
        kind: AttributeKind,
        index: usize,
        len: usize,
    },

    /// 材质索引越界
    #[error("Material index {material_id} out of range (material count {material_count})")]
    MaterialIndexOutOfRange {
        material_id: usize,
        material_count: usize,
    },

    /// 数据验证失败
    #[error("Mesh validation failed: {0}")]
    ValidationError(String),
}
