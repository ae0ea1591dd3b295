//! 数学类型与坐标系转换
//!
//! 基于 `nalgebra` 提供加载器使用的向量类型别名，以及 OBJ 资源坐标系到
//! 渲染端坐标系的转换函数。
//!
//! # 坐标约定
//!
//! - OBJ 使用右手坐标系，渲染端使用左手坐标系：深度轴镜像为 `z' = -1 - z`
//! - OBJ 纹理坐标原点在左下角，渲染端在左上角：`v' = 1 - v`

pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};

// 类型别名，使用更简洁的名称
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;

/// 镜像深度轴：`(x, y, z) -> (x, y, -1 - z)`
///
/// 位置和法线都经过这一步转换。
#[inline]
pub fn mirror_depth(v: Vector3) -> Vector3 {
    Vector3::new(v.x, v.y, -1.0 - v.z)
}

/// 翻转纹理坐标 V 轴：`(u, v) -> (u, 1 - v)`
#[inline]
pub fn flip_v(t: Vector2) -> Vector2 {
    Vector2::new(t.x, 1.0 - t.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_depth() {
        let v = mirror_depth(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(v, Vector3::new(1.0, 2.0, -4.0));

        let origin = mirror_depth(Vector3::zeros());
        assert_eq!(origin.z, -1.0);
    }

    #[test]
    fn test_flip_v() {
        assert_eq!(flip_v(Vector2::new(0.25, 0.0)), Vector2::new(0.25, 1.0));
        assert_eq!(flip_v(Vector2::new(0.5, 0.75)), Vector2::new(0.5, 0.25));
    }
}
