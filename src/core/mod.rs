//! 核心功能模块
//!
//! 本模块提供了加载器的基础功能，包括数学类型、日志系统、配置管理、
//! 资源路径解析和错误处理。这些模块与具体的模型格式无关。
//!
//! # 模块组织
//!
//! - `math`：向量类型别名和坐标系转换
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从配置文件加载设置
//! - `path`：资源根目录与路径解析
//! - `error`：错误处理，定义统一的错误类型

pub mod math;
pub mod log;
pub mod config;
pub mod path;
pub mod error;

// 重新导出常用类型，方便使用
pub use math::{Vector2, Vector3};
pub use error::{Result, DistModelError, MeshLoadError};
pub use config::Config;
pub use path::{PathResolver, ExecutableDirResolver, RootDirResolver};
