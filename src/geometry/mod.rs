/// 几何体加载和处理模块
///
/// 把 OBJ 模型转换成适合 GPU 上传的数据：按材质分区的全局顶点缓冲、
/// 全局索引缓冲，以及每个材质一次绘制调用所需的范围。
///
/// # 模块结构
///
/// - `extract`: 与格式无关的解析结果（属性数组、面、材质）
/// - `loaders`: 各种格式的解析器
/// - `vertex`: 顶点数据结构定义
/// - `dedup`: 按材质的顶点去重
/// - `partition`: 材质分区与绘制范围
/// - `mesh`: 不可变的模型几何快照
/// - `model_loader`: 加载状态机
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ + MTL)
///     ↓
/// ObjLoader → ExtractedMesh
///     ↓
/// VertexDeduplicator → MaterialBucket × N
///     ↓
/// flatten → ModelGeometry (顶点缓冲 / 索引缓冲 / DrawCallRange × N)
///     ↓
/// Renderer (上传到GPU)
/// ```
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_model::core::RootDirResolver;
/// use dist_model::geometry::ModelLoader;
///
/// let mut loader = ModelLoader::new(RootDirResolver::new("assets"));
/// loader.load_model("two_materials.obj")?;
///
/// println!("顶点数: {}", loader.vertex_count());
/// println!("索引数: {}", loader.index_count());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```

pub mod extract;
pub mod loaders;
pub mod vertex;
pub mod dedup;
pub mod partition;
pub mod mesh;
pub mod model_loader;

// 重新导出常用类型
pub use extract::{AttributeKey, ExtractedMesh, Material};
pub use vertex::FullVertex;
pub use mesh::{DrawCallRange, ModelGeometry};
pub use model_loader::{LoadState, ModelLoader};
