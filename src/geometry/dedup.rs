/// 顶点去重
///
/// 每个材质维护一个独立的 `AttributeKey -> 顶点槽位` 映射。相同的属性三元组
/// 在同一材质内只生成一个顶点；在不同材质中各自生成顶点，因为顶点里带有材质的
/// 漫反射颜色。

use std::collections::HashMap;

use super::extract::{AttributeKey, ExtractedMesh};
use super::partition::index_u32;
use super::vertex::FullVertex;
use crate::core::error::{MeshLoadError, Result};
use crate::core::math::{flip_v, mirror_depth, Vector2, Vector3};

/// 单个材质的工作集：顶点列表、局部索引列表和去重映射
#[derive(Debug, Clone, Default)]
pub struct MaterialBucket {
    vertices: Vec<FullVertex>,
    indices: Vec<u32>,
    slots: HashMap<AttributeKey, u32>,
}

impl MaterialBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// 把属性三元组映射到顶点槽位
    ///
    /// 命中时直接返回已有槽位；否则从 `source` 中取出属性，转换到渲染端坐标系，
    /// 追加新顶点并记录槽位。
    ///
    /// # 错误
    ///
    /// 任何属性索引超出 `source` 中对应数组的范围时返回
    /// `MeshLoadError::AttributeIndexOutOfRange`，此时桶不会被修改。
    pub fn dedup(
        &mut self,
        key: AttributeKey,
        source: &ExtractedMesh,
        diffuse_color: [f32; 3],
    ) -> Result<u32> {
        if let Some(&slot) = self.slots.get(&key) {
            return Ok(slot);
        }

        let position = mirror_depth(source.position(key.position)?);
        let normal = match key.normal {
            Some(index) => mirror_depth(source.normal(index)?),
            None => Vector3::zeros(),
        };
        let texcoord = match key.texcoord {
            Some(index) => flip_v(source.texcoord(index)?),
            None => Vector2::zeros(),
        };

        let slot = index_u32(self.vertices.len(), "材质顶点数")?;
        self.vertices.push(FullVertex::from_vectors(
            position,
            Vector3::from(diffuse_color),
            normal,
            texcoord,
        ));
        self.slots.insert(key, slot);

        Ok(slot)
    }

    /// 去重后把槽位追加到局部索引列表
    pub fn push_face_vertex(
        &mut self,
        key: AttributeKey,
        source: &ExtractedMesh,
        diffuse_color: [f32; 3],
    ) -> Result<u32> {
        let slot = self.dedup(key, source, diffuse_color)?;
        self.indices.push(slot);
        Ok(slot)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[FullVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// 拆出顶点和局部索引，丢弃去重映射
    pub fn into_parts(self) -> (Vec<FullVertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}

/// 按材质 ID 分桶的去重器
///
/// 材质数量由 `source.materials` 决定，每个材质一个桶（包括没有任何面的材质）。
pub struct VertexDeduplicator<'a> {
    source: &'a ExtractedMesh,
    buckets: Vec<MaterialBucket>,
}

impl<'a> VertexDeduplicator<'a> {
    pub fn new(source: &'a ExtractedMesh) -> Self {
        let buckets = source
            .materials
            .iter()
            .map(|_| MaterialBucket::new())
            .collect();

        Self { source, buckets }
    }

    /// 在 `material_id` 的桶内去重，返回槽位
    pub fn dedup(&mut self, material_id: usize, key: AttributeKey) -> Result<u32> {
        let source = self.source;
        let (bucket, diffuse_color) = self.bucket_mut(material_id)?;
        bucket.dedup(key, source, diffuse_color)
    }

    /// 去重并把槽位追加到该材质的局部索引列表
    pub fn push_face_vertex(&mut self, material_id: usize, key: AttributeKey) -> Result<u32> {
        let source = self.source;
        let (bucket, diffuse_color) = self.bucket_mut(material_id)?;
        bucket.push_face_vertex(key, source, diffuse_color)
    }

    pub fn buckets(&self) -> &[MaterialBucket] {
        &self.buckets
    }

    pub fn into_buckets(self) -> Vec<MaterialBucket> {
        self.buckets
    }

    fn bucket_mut(&mut self, material_id: usize) -> Result<(&mut MaterialBucket, [f32; 3])> {
        let materials = &self.source.materials;
        let material_count = materials.len();
        let material = materials.get(material_id).ok_or(
            MeshLoadError::MaterialIndexOutOfRange {
                material_id,
                material_count,
            },
        )?;

        // 桶与材质一一对应，上面的检查保证下标有效
        let bucket = &mut self.buckets[material_id];
        Ok((bucket, material.diffuse_color))
    }
}
