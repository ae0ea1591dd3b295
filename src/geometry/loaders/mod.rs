/// 模型解析器模块
///
/// 提供统一的属性提取接口和具体格式的实现。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（使用 tobj crate，附带 MTL 材质库）
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_model::geometry::loaders::{AttributeExtractor, ObjLoader};
/// use std::path::Path;
///
/// let mesh = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// println!("形状数: {}", mesh.shapes.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::extract::ExtractedMesh;
use std::path::Path;

pub mod obj_loader;

// 重新导出加载器
pub use obj_loader::ObjLoader;

/// 属性提取器 trait
///
/// 定义统一的解析接口，所有格式的解析器都实现此 trait。
///
/// # 实现要求
///
/// - 解析器应该是无状态的（使用静态方法）
/// - 返回与格式无关的 `ExtractedMesh`，不做去重和分区
/// - 非致命问题写入 `ExtractedMesh::warnings`，致命问题返回 `ParseError`
pub trait AttributeExtractor {
    /// 从文件路径解析
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取：`FileNotFound`
    /// - 文件内容无法解析：`ParseError`
    fn load_from_file(path: &Path) -> Result<ExtractedMesh>;

    /// 从内存数据解析
    fn load_from_memory(data: &[u8]) -> Result<ExtractedMesh>;

    /// 获取支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的解析器
///
/// # 示例
///
/// ```rust,no_run
/// use dist_model::geometry::loaders::load_extracted;
/// use std::path::Path;
///
/// let mesh = load_extracted(Path::new("model.obj"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_extracted(path: &Path) -> Result<ExtractedMesh> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string())
        })?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!(
            "不支持的文件格式: .{}",
            extension
        ))
        .into())
    }
}
