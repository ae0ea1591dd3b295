/// 材质分区
///
/// 把各材质桶按材质 ID 升序拼接成一个全局顶点缓冲和一个全局索引缓冲，
/// 并为每个材质记录一次绘制调用所需的 `DrawCallRange`。
///
/// 索引保持为材质内的局部索引，绘制时与 `start_vertex` 组合使用：
///
/// ```text
/// DrawIndexedInstanced(index_count, 1, start_index, start_vertex, 0)
/// ```

use super::dedup::MaterialBucket;
use super::mesh::DrawCallRange;
use super::vertex::FullVertex;
use crate::core::error::{MeshLoadError, Result};

/// 分区结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedBuffers {
    pub vertices: Vec<FullVertex>,
    pub indices: Vec<u32>,
    /// 每个材质一个范围，按材质 ID 排列
    pub ranges: Vec<DrawCallRange>,
    /// 每个材质去重后的顶点数
    pub vertex_counts: Vec<u32>,
}

/// 把缓冲长度转换成 `u32` 索引空间
///
/// 超出 `u32` 范围时返回 `ValidationError`，而不是截断。
pub fn index_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        MeshLoadError::ValidationError(format!("{} {} 超出 u32 索引范围", what, value)).into()
    })
}

/// 按材质 ID 升序拼接所有桶
///
/// 没有面的材质同样得到一个 `index_count == 0` 的范围，且不会在后续材质的
/// 范围中留下空隙。
pub fn flatten(buckets: Vec<MaterialBucket>) -> Result<PartitionedBuffers> {
    let vertex_total = buckets.iter().map(MaterialBucket::vertex_count).sum();
    let index_total = buckets.iter().map(MaterialBucket::index_count).sum();

    let init = PartitionedBuffers {
        vertices: Vec::with_capacity(vertex_total),
        indices: Vec::with_capacity(index_total),
        ranges: Vec::with_capacity(buckets.len()),
        vertex_counts: Vec::with_capacity(buckets.len()),
    };

    buckets.into_iter().try_fold(init, |mut out, bucket| {
        let (vertices, indices) = bucket.into_parts();
        let range = DrawCallRange::new(
            index_u32(indices.len(), "材质索引数")?,
            index_u32(out.indices.len(), "起始索引")?,
            index_u32(out.vertices.len(), "基准顶点")?,
        );

        out.vertex_counts.push(index_u32(vertices.len(), "材质顶点数")?);
        out.vertices.extend(vertices);
        out.indices.extend(indices);
        out.ranges.push(range);
        Ok(out)
    })
}
