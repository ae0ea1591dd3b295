/// 模型加载器
///
/// 驱动 解析 → 去重 → 分区 的整个流程，并持有当前的几何快照。
///
/// # 状态机
///
/// ```text
/// Unloaded ──load_model──▶ Loading ──成功──▶ Loaded
///                             │
///                             └────失败──▶ Failed
/// ```
///
/// `Loaded` 和 `Failed` 都是终态，直到下一次 `load_model` 重新进入 `Loading`。
/// 每次成功加载都会构建一个全新的 `ModelGeometry` 再整体替换旧快照，
/// 之前通过 [`ModelLoader::geometry`] 取得的快照保持不变。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::extract::ExtractedMesh;
use super::loaders::load_extracted;
use super::mesh::{DrawCallRange, ModelGeometry};
use super::vertex::FullVertex;
use crate::core::config::ModelConfig;
use crate::core::error::{MeshLoadError, Result};
use crate::core::path::{ExecutableDirResolver, PathResolver};

/// 加载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// 模型加载器
///
/// 未加载或加载失败时，所有计数类查询返回 0，按材质查询返回
/// `MaterialIndexOutOfRange`，不会暴露旧的或不完整的数据。
///
/// # 示例
///
/// ```rust,no_run
/// use dist_model::geometry::ModelLoader;
///
/// let mut loader = ModelLoader::with_executable_dir()?;
/// loader.load_model("assets/two_materials.obj")?;
///
/// for material_id in 0..loader.material_count() {
///     let range = loader.draw_call_range(material_id)?;
///     println!("{}: {:?}", material_id, range);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ModelLoader {
    resolver: Box<dyn PathResolver>,
    state: LoadState,
    geometry: Option<Arc<ModelGeometry>>,
}

impl ModelLoader {
    /// 使用指定的路径解析器创建加载器
    pub fn new(resolver: impl PathResolver + 'static) -> Self {
        Self::with_resolver(Box::new(resolver))
    }

    pub fn with_resolver(resolver: Box<dyn PathResolver>) -> Self {
        Self {
            resolver,
            state: LoadState::Unloaded,
            geometry: None,
        }
    }

    /// 以可执行文件所在目录为资源根目录
    pub fn with_executable_dir() -> Result<Self> {
        Ok(Self::new(ExecutableDirResolver::new()?))
    }

    /// 根据模型配置创建加载器
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Ok(Self::with_resolver(config.resolver()?))
    }

    /// 加载模型文件
    ///
    /// `path` 相对于资源根目录解析。失败时加载器进入 `Failed`，不保留任何几何数据。
    ///
    /// # 错误
    ///
    /// - `FileNotFound`：文件不存在或无法读取
    /// - `ParseError`：解析器报告致命错误
    /// - `AttributeIndexOutOfRange` / `MaterialIndexOutOfRange`：面数据引用越界
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let model_file = self.resolver.resolve(path.as_ref());
        let _span = crate::span_trace!("load_model").entered();

        self.begin_load();
        tracing::info!(path = %model_file.display(), "Loading model");

        let name = model_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed")
            .to_string();

        let result = load_extracted(&model_file).and_then(|mesh| self.build(&mesh, name));
        self.finish_load(result)
    }

    /// 从已解析的数据加载
    ///
    /// 与 [`ModelLoader::load_model`] 走同一个状态机，用于自定义解析器或内存数据。
    pub fn load_extracted_mesh(&mut self, mesh: &ExtractedMesh, name: &str) -> Result<()> {
        self.begin_load();
        let result = self.build(mesh, name.to_string());
        self.finish_load(result)
    }

    fn begin_load(&mut self) {
        self.state = LoadState::Loading;
        self.geometry = None;
    }

    fn build(&self, mesh: &ExtractedMesh, name: String) -> Result<ModelGeometry> {
        for warning in &mesh.warnings {
            crate::engine_warn!("OBJ 读取警告: {}", warning);
        }

        let geometry = ModelGeometry::build(mesh, self.resolver.asset_root())?.with_name(name);

        geometry
            .validate()
            .map_err(MeshLoadError::ValidationError)?;

        Ok(geometry)
    }

    fn finish_load(&mut self, result: Result<ModelGeometry>) -> Result<()> {
        match result {
            Ok(geometry) => {
                for (material_id, range) in geometry.draw_call_ranges().iter().enumerate() {
                    tracing::debug!(
                        material_id,
                        index_count = range.index_count,
                        start_index = range.start_index,
                        start_vertex = range.start_vertex,
                        "Draw call range"
                    );
                }

                crate::engine_info!(
                    "成功加载模型: {} 个顶点, {} 个索引, {} 个材质 ({} 个带纹理)",
                    geometry.vertex_count(),
                    geometry.index_count(),
                    geometry.material_count(),
                    geometry.textured_material_count()
                );

                self.geometry = Some(Arc::new(geometry));
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                crate::engine_error!("模型加载失败: {}", e);
                self.geometry = None;
                self.state = LoadState::Failed;
                Err(e)
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// 当前快照，可跨线程共享
    pub fn geometry(&self) -> Option<Arc<ModelGeometry>> {
        self.geometry.clone()
    }

    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver.as_ref()
    }

    // ---- 委托给当前快照的查询 ----

    pub fn vertex_buffer(&self) -> &[FullVertex] {
        self.geometry.as_deref().map_or(&[][..], |g| g.vertex_buffer())
    }

    pub fn vertex_buffer_size(&self) -> usize {
        self.geometry.as_deref().map_or(0, ModelGeometry::vertex_buffer_size)
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.as_deref().map_or(0, ModelGeometry::vertex_count)
    }

    pub fn index_buffer(&self) -> &[u32] {
        self.geometry.as_deref().map_or(&[][..], |g| g.index_buffer())
    }

    pub fn index_buffer_size(&self) -> usize {
        self.geometry.as_deref().map_or(0, ModelGeometry::index_buffer_size)
    }

    pub fn index_count(&self) -> usize {
        self.geometry.as_deref().map_or(0, ModelGeometry::index_count)
    }

    pub fn material_count(&self) -> usize {
        self.geometry.as_deref().map_or(0, ModelGeometry::material_count)
    }

    pub fn draw_call_range(&self, material_id: usize) -> Result<DrawCallRange> {
        self.loaded(material_id)?.draw_call_range(material_id)
    }

    pub fn texture_path(&self, material_id: usize) -> Result<Option<PathBuf>> {
        self.loaded(material_id)?.texture_path(material_id)
    }

    pub fn has_texture(&self, material_id: usize) -> Result<bool> {
        self.loaded(material_id)?.has_texture(material_id)
    }

    pub fn textured_material_count(&self) -> usize {
        self.geometry.as_deref().map_or(0, ModelGeometry::textured_material_count)
    }

    fn loaded(&self, material_id: usize) -> Result<&ModelGeometry> {
        self.geometry.as_deref().ok_or_else(|| {
            MeshLoadError::MaterialIndexOutOfRange {
                material_id,
                material_count: 0,
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistModelError;
    use crate::core::path::RootDirResolver;
    use crate::geometry::extract::{AttributeKey, Face, Material, Shape};

    fn triangle_mesh(material_count: usize) -> ExtractedMesh {
        ExtractedMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            shapes: vec![Shape {
                name: "tri".to_string(),
                faces: vec![Face::new(
                    (0..3).map(|p| AttributeKey::new(p, None, None)).collect(),
                    0,
                )],
            }],
            materials: (0..material_count).map(|_| Material::implicit_default()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unloaded_reports_zero() {
        let loader = ModelLoader::new(RootDirResolver::new("/assets"));

        assert_eq!(loader.state(), LoadState::Unloaded);
        assert_eq!(loader.vertex_count(), 0);
        assert_eq!(loader.index_count(), 0);
        assert_eq!(loader.vertex_buffer_size(), 0);
        assert_eq!(loader.material_count(), 0);
        assert!(loader.vertex_buffer().is_empty());
        assert!(loader.draw_call_range(0).is_err());
        assert!(loader.has_texture(0).is_err());
        assert!(loader.geometry().is_none());
    }

    #[test]
    fn test_load_extracted_mesh() {
        let mut loader = ModelLoader::new(RootDirResolver::new("/assets"));
        loader.load_extracted_mesh(&triangle_mesh(1), "tri").unwrap();

        assert_eq!(loader.state(), LoadState::Loaded);
        assert!(loader.is_loaded());
        assert_eq!(loader.vertex_count(), 3);
        assert_eq!(loader.draw_call_range(0).unwrap(), DrawCallRange::new(3, 0, 0));
        assert_eq!(loader.geometry().unwrap().name(), Some("tri"));
    }

    #[test]
    fn test_failed_load_drops_previous_geometry() {
        let mut loader = ModelLoader::new(RootDirResolver::new("/assets"));
        loader.load_extracted_mesh(&triangle_mesh(1), "tri").unwrap();

        // 面引用的材质 0 不存在
        let err = loader.load_extracted_mesh(&triangle_mesh(0), "broken").unwrap_err();
        assert!(matches!(
            err,
            DistModelError::MeshLoading(MeshLoadError::MaterialIndexOutOfRange { .. })
        ));

        assert_eq!(loader.state(), LoadState::Failed);
        assert_eq!(loader.vertex_count(), 0);
        assert_eq!(loader.material_count(), 0);
        assert!(loader.draw_call_range(0).is_err());
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let mut loader = ModelLoader::new(RootDirResolver::new("/assets"));
        loader.load_extracted_mesh(&triangle_mesh(1), "first").unwrap();
        let first = loader.geometry().unwrap();

        loader.load_extracted_mesh(&triangle_mesh(3), "second").unwrap();
        let second = loader.geometry().unwrap();

        assert_eq!(first.material_count(), 1);
        assert_eq!(first.name(), Some("first"));
        assert_eq!(second.material_count(), 3);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_file_fails() {
        let mut loader = ModelLoader::new(RootDirResolver::new("/definitely/not/here"));
        let err = loader.load_model("cube.obj").unwrap_err();

        assert!(matches!(
            err,
            DistModelError::MeshLoading(MeshLoadError::FileNotFound(_))
        ));
        assert_eq!(loader.state(), LoadState::Failed);
    }
}
