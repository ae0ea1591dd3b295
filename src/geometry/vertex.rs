/// 几何体顶点定义模块
///
/// 定义加载器输出的完整顶点结构：位置、漫反射颜色、法线和纹理坐标。

use bytemuck::{Pod, Zeroable};
use crate::core::math::{Vector2, Vector3};

/// 每个顶点的字节跨度
pub const VERTEX_STRIDE: usize = std::mem::size_of::<FullVertex>();

/// 每个索引的字节跨度（32 位索引）
pub const INDEX_STRIDE: usize = std::mem::size_of::<u32>();

/// 完整的3D顶点结构
///
/// 内存布局与GPU输入布局一致，使用 `#[repr(C)]` 保证顺序和对齐。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)，偏移 0
/// - diffuse_color: 12 bytes (3 * f32)，偏移 12
/// - normal: 12 bytes (3 * f32)，偏移 24
/// - texcoord: 8 bytes (2 * f32)，偏移 36
/// - **总计**: 44 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FullVertex {
    /// 顶点位置 (x, y, z)，已转换到渲染端坐标系
    pub position: [f32; 3],

    /// 材质的漫反射颜色 (r, g, b)
    pub diffuse_color: [f32; 3],

    /// 法线向量 (nx, ny, nz)
    ///
    /// 源数据没有法线时为零向量。
    pub normal: [f32; 3],

    /// 纹理坐标 (u, v)，原点在左上角
    pub texcoord: [f32; 2],
}

impl FullVertex {
    #[inline]
    pub fn new(
        position: [f32; 3],
        diffuse_color: [f32; 3],
        normal: [f32; 3],
        texcoord: [f32; 2],
    ) -> Self {
        Self {
            position,
            diffuse_color,
            normal,
            texcoord,
        }
    }

    /// 从数学库的 Vector 类型创建顶点
    pub fn from_vectors(
        position: Vector3,
        diffuse_color: Vector3,
        normal: Vector3,
        texcoord: Vector2,
    ) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            diffuse_color: [diffuse_color.x, diffuse_color.y, diffuse_color.z],
            normal: [normal.x, normal.y, normal.z],
            texcoord: [texcoord.x, texcoord.y],
        }
    }
}
