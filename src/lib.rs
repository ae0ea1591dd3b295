//! DistModel - 按材质分区的 OBJ 模型加载器
//!
//! 读取 Wavefront OBJ 模型及其 MTL 材质库，按材质对面顶点去重，
//! 并产出一个全局顶点缓冲、一个全局索引缓冲和每个材质的绘制范围，
//! 使渲染器可以对每个材质发出一次索引绘制调用。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、路径解析、错误处理）
//! - `geometry`: 几何体加载模块（解析、去重、分区、加载状态机）
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_model::core::RootDirResolver;
//! use dist_model::geometry::ModelLoader;
//!
//! let mut loader = ModelLoader::new(RootDirResolver::new("assets"));
//! loader.load_model("two_materials.obj")?;
//!
//! for material_id in 0..loader.material_count() {
//!     let range = loader.draw_call_range(material_id)?;
//!     // DrawIndexedInstanced(index_count, 1, start_index, start_vertex, 0)
//!     println!(
//!         "材质 {}: {} 个索引, 起始索引 {}, 基准顶点 {}",
//!         material_id, range.index_count, range.start_index, range.start_vertex
//!     );
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod geometry;
