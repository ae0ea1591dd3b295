/// 模型几何数据模块
///
/// 定义加载完成后的不可变几何快照 `ModelGeometry` 和每个材质的绘制范围
/// `DrawCallRange`。快照构建之后只提供只读访问，可在多个线程间共享。

use std::path::{Path, PathBuf};

use super::dedup::VertexDeduplicator;
use super::extract::{ExtractedMesh, Material};
use super::partition::{self, PartitionedBuffers};
use super::vertex::{FullVertex, INDEX_STRIDE, VERTEX_STRIDE};
use crate::core::error::{DistModelError, MeshLoadError, Result};

/// 单个材质的绘制范围
///
/// 描述索引缓冲中的一段连续区间以及该区间的基准顶点偏移。
/// 区间内的索引是材质内的局部索引。
///
/// # 示例
///
/// ```rust
/// use dist_model::geometry::DrawCallRange;
///
/// let range = DrawCallRange::new(36, 120, 48);
/// assert_eq!(range.end_index(), 156);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawCallRange {
    /// 索引数量
    pub index_count: u32,

    /// 在全局索引缓冲中的起始位置
    pub start_index: u32,

    /// 加到局部索引上的基准顶点
    pub start_vertex: u32,
}

impl DrawCallRange {
    #[inline]
    pub fn new(index_count: u32, start_index: u32, start_vertex: u32) -> Self {
        Self {
            index_count,
            start_index,
            start_vertex,
        }
    }

    /// 区间结束位置（不含）
    #[inline]
    pub fn end_index(&self) -> u32 {
        self.start_index + self.index_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }
}

/// 加载完成的模型几何快照
///
/// 包含去重后的全局顶点缓冲、按材质分段的局部索引缓冲、每个材质的绘制范围，
/// 以及纹理路径查询所需的材质信息和资源根目录。
///
/// # 架构说明
///
/// - **CPU侧**: `ModelGeometry` 只持有内存中的数据
/// - **GPU侧**: 渲染端通过 `vertex_bytes` / `index_bytes` 上传缓冲，并按
///   `draw_call_ranges` 逐材质发起绘制
#[derive(Debug, Clone)]
pub struct ModelGeometry {
    name: Option<String>,
    vertices: Vec<FullVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCallRange>,
    vertex_counts: Vec<u32>,
    materials: Vec<Material>,
    asset_root: PathBuf,
    warnings: Vec<String>,
}

impl ModelGeometry {
    /// 从解析结果构建快照
    ///
    /// 按 形状 → 面 → 面顶点 的声明顺序折叠进每个材质的去重桶，
    /// 再按材质 ID 拼接。任何越界的属性或材质索引都会使整个构建失败。
    ///
    /// # 参数
    ///
    /// - `mesh`: 解析器输出
    /// - `asset_root`: 拼接纹理路径使用的资源根目录
    pub fn build(mesh: &ExtractedMesh, asset_root: impl Into<PathBuf>) -> Result<Self> {
        let dedup = mesh.face_vertices().try_fold(
            VertexDeduplicator::new(mesh),
            |mut dedup, (material_id, key)| {
                dedup.push_face_vertex(material_id, key)?;
                Ok::<_, DistModelError>(dedup)
            },
        )?;

        let PartitionedBuffers {
            vertices,
            indices,
            ranges,
            vertex_counts,
        } = partition::flatten(dedup.into_buckets())?;

        Ok(Self {
            name: None,
            vertices,
            indices,
            draw_calls: ranges,
            vertex_counts,
            materials: mesh.materials.clone(),
            asset_root: asset_root.into(),
            warnings: mesh.warnings.clone(),
        })
    }

    /// 设置模型名称（通常为文件名）
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 解析阶段产生的非致命警告
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    // ---- 顶点缓冲 ----

    pub fn vertex_buffer(&self) -> &[FullVertex] {
        &self.vertices
    }

    /// 顶点缓冲的字节视图，可直接上传
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// 顶点缓冲字节数 = 顶点数 × 44
    #[inline]
    pub fn vertex_buffer_size(&self) -> usize {
        self.vertices.len() * VERTEX_STRIDE
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn vertex_stride(&self) -> usize {
        VERTEX_STRIDE
    }

    // ---- 索引缓冲 ----

    pub fn index_buffer(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// 索引缓冲字节数 = 索引数 × 4
    #[inline]
    pub fn index_buffer_size(&self) -> usize {
        self.indices.len() * INDEX_STRIDE
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    // ---- 材质与绘制范围 ----

    #[inline]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// 获取材质的绘制范围
    ///
    /// # 错误
    ///
    /// `material_id >= material_count()` 时返回 `MaterialIndexOutOfRange`。
    pub fn draw_call_range(&self, material_id: usize) -> Result<DrawCallRange> {
        self.draw_calls
            .get(material_id)
            .copied()
            .ok_or_else(|| self.material_out_of_range(material_id))
    }

    /// 全部绘制范围，按材质 ID 排列
    pub fn draw_call_ranges(&self) -> &[DrawCallRange] {
        &self.draw_calls
    }

    /// 材质去重后的顶点数
    pub fn material_vertex_count(&self, material_id: usize) -> Result<u32> {
        self.vertex_counts
            .get(material_id)
            .copied()
            .ok_or_else(|| self.material_out_of_range(material_id))
    }

    /// 材质纹理的完整路径
    ///
    /// 返回资源根目录与纹理文件名的拼接；材质没有纹理时返回 `Ok(None)`。
    pub fn texture_path(&self, material_id: usize) -> Result<Option<PathBuf>> {
        let material = self.material(material_id)?;
        Ok(material
            .texture_filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| self.asset_root.join(name)))
    }

    pub fn has_texture(&self, material_id: usize) -> Result<bool> {
        Ok(self.material(material_id)?.has_texture())
    }

    /// 带纹理的材质数量
    pub fn textured_material_count(&self) -> usize {
        self.materials.iter().filter(|m| m.has_texture()).count()
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// 验证快照的有效性
    ///
    /// 检查：
    /// - 绘制范围与材质一一对应
    /// - 范围首尾相接且覆盖整个索引缓冲
    /// - 基准顶点按各材质顶点数累加且覆盖整个顶点缓冲
    /// - 每个局部索引都小于所属材质的顶点数
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.draw_calls.len() != self.materials.len()
            || self.vertex_counts.len() != self.materials.len()
        {
            return Err(format!(
                "绘制范围数量 {} 与材质数量 {} 不一致",
                self.draw_calls.len(),
                self.materials.len()
            ));
        }

        let mut next_index = 0u32;
        let mut next_vertex = 0u32;
        for (material_id, (range, &vertex_count)) in
            self.draw_calls.iter().zip(&self.vertex_counts).enumerate()
        {
            if range.start_index != next_index || range.start_vertex != next_vertex {
                return Err(format!(
                    "材质 {} 的范围不连续: start_index={}, start_vertex={}, 期望 {}/{}",
                    material_id, range.start_index, range.start_vertex, next_index, next_vertex
                ));
            }

            let local = self
                .indices
                .get(range.start_index as usize..range.end_index() as usize)
                .ok_or_else(|| format!("材质 {} 的索引范围超出索引缓冲", material_id))?;

            if let Some(&bad) = local.iter().find(|&&index| index >= vertex_count) {
                return Err(format!(
                    "材质 {} 的局部索引 {} 超出顶点范围 (0-{})",
                    material_id,
                    bad,
                    vertex_count.saturating_sub(1)
                ));
            }

            next_index = range.end_index();
            next_vertex += vertex_count;
        }

        if next_index as usize != self.indices.len() || next_vertex as usize != self.vertices.len() {
            return Err(format!(
                "绘制范围未覆盖全部缓冲: 索引 {}/{}, 顶点 {}/{}",
                next_index,
                self.indices.len(),
                next_vertex,
                self.vertices.len()
            ));
        }

        Ok(())
    }

    fn material(&self, material_id: usize) -> Result<&Material> {
        self.materials
            .get(material_id)
            .ok_or_else(|| self.material_out_of_range(material_id))
    }

    fn material_out_of_range(&self, material_id: usize) -> DistModelError {
        MeshLoadError::MaterialIndexOutOfRange {
            material_id,
            material_count: self.materials.len(),
        }
        .into()
    }
}
