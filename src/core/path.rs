//! 资源路径解析
//!
//! 模型文件和纹理文件名都是相对于资源根目录给出的。默认的资源根目录是
//! 当前可执行文件所在目录，也可以通过配置显式指定。

use std::path::{Path, PathBuf};

use super::error::Result;

/// 资源路径解析器
///
/// 把相对的资源文件名解析成完整路径。绝对路径按 `Path::join` 的语义原样返回。
pub trait PathResolver: Send + Sync {
    /// 资源根目录
    fn asset_root(&self) -> &Path;

    /// 将相对文件名拼接到资源根目录上
    fn resolve(&self, relative: &Path) -> PathBuf {
        self.asset_root().join(relative)
    }
}

/// 以可执行文件所在目录为根的解析器
#[derive(Debug, Clone)]
pub struct ExecutableDirResolver {
    root: PathBuf,
}

impl ExecutableDirResolver {
    /// 查询当前可执行文件路径并取其父目录
    pub fn new() -> Result<Self> {
        let exe = std::env::current_exe()?;
        let root = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self { root })
    }
}

impl PathResolver for ExecutableDirResolver {
    fn asset_root(&self) -> &Path {
        &self.root
    }
}

/// 以固定目录为根的解析器
#[derive(Debug, Clone)]
pub struct RootDirResolver {
    root: PathBuf,
}

impl RootDirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathResolver for RootDirResolver {
    fn asset_root(&self) -> &Path {
        &self.root
    }
}
