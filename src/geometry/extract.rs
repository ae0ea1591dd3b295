/// 属性提取结果
///
/// 解析器（见 `loaders`）输出的与格式无关的中间表示：扁平的属性数组、
/// 按形状分组的面列表、材质列表以及非致命警告。后续的去重和分区只依赖这里的类型。

use crate::core::error::{AttributeKind, MeshLoadError, Result};
use crate::core::math::{Vector2, Vector3};

/// 未指定漫反射颜色时使用的颜色
pub const DEFAULT_DIFFUSE: [f32; 3] = [1.0, 1.0, 1.0];

/// 面顶点的属性索引三元组
///
/// 法线和纹理坐标可以缺省（`None`）。同一材质内相同的三元组只生成一个顶点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    pub position: usize,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

impl AttributeKey {
    #[inline]
    pub fn new(position: usize, normal: Option<usize>, texcoord: Option<usize>) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// 一个多边形面
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// 按声明顺序排列的面顶点，顺序决定三角形绕序
    pub vertices: Vec<AttributeKey>,

    /// 面所使用的材质 ID（材质列表中的下标）
    pub material_id: usize,
}

impl Face {
    pub fn new(vertices: Vec<AttributeKey>, material_id: usize) -> Self {
        Self {
            vertices,
            material_id,
        }
    }
}

/// 形状：一组面
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub faces: Vec<Face>,
}

/// 材质
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse_color: [f32; 3],
    /// 漫反射纹理文件名（相对于资源根目录）
    pub texture_filename: Option<String>,
}

impl Material {
    /// 为没有 `usemtl` 的面准备的隐式默认材质
    pub fn implicit_default() -> Self {
        Self {
            name: "default".to_string(),
            diffuse_color: DEFAULT_DIFFUSE,
            texture_filename: None,
        }
    }

    /// 是否带有非空的纹理文件名
    pub fn has_texture(&self) -> bool {
        self.texture_filename
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }
}

/// 解析器输出
#[derive(Debug, Clone, Default)]
pub struct ExtractedMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub shapes: Vec<Shape>,
    pub materials: Vec<Material>,
    /// 解析过程中的非致命异常
    pub warnings: Vec<String>,
}

impl ExtractedMesh {
    /// 按位置索引读取位置（带边界检查）
    pub fn position(&self, index: usize) -> Result<Vector3> {
        self.positions
            .get(index)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .ok_or_else(|| out_of_range(AttributeKind::Position, index, self.positions.len()))
    }

    /// 按法线索引读取法线（带边界检查）
    pub fn normal(&self, index: usize) -> Result<Vector3> {
        self.normals
            .get(index)
            .map(|n| Vector3::new(n[0], n[1], n[2]))
            .ok_or_else(|| out_of_range(AttributeKind::Normal, index, self.normals.len()))
    }

    /// 按纹理坐标索引读取纹理坐标（带边界检查）
    pub fn texcoord(&self, index: usize) -> Result<Vector2> {
        self.texcoords
            .get(index)
            .map(|t| Vector2::new(t[0], t[1]))
            .ok_or_else(|| out_of_range(AttributeKind::Texcoord, index, self.texcoords.len()))
    }

    /// 按 形状 → 面 → 面顶点 的顺序遍历，产出 `(material_id, key)`
    pub fn face_vertices(&self) -> impl Iterator<Item = (usize, AttributeKey)> + '_ {
        self.shapes.iter().flat_map(|shape| {
            shape.faces.iter().flat_map(|face| {
                face.vertices.iter().map(move |&key| (face.material_id, key))
            })
        })
    }

    /// 所有面的面顶点总数
    pub fn face_vertex_count(&self) -> usize {
        self.shapes
            .iter()
            .flat_map(|shape| shape.faces.iter())
            .map(|face| face.vertices.len())
            .sum()
    }

    pub fn face_count(&self) -> usize {
        self.shapes.iter().map(|shape| shape.faces.len()).sum()
    }
}

fn out_of_range(kind: AttributeKind, index: usize, len: usize) -> crate::core::error::DistModelError {
    MeshLoadError::AttributeIndexOutOfRange { kind, index, len }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistModelError;

    fn sample() -> ExtractedMesh {
        ExtractedMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]],
            texcoords: vec![[0.0, 0.0]],
            shapes: vec![
                Shape {
                    name: "a".to_string(),
                    faces: vec![Face::new(
                        vec![
                            AttributeKey::new(0, Some(0), Some(0)),
                            AttributeKey::new(1, Some(0), None),
                            AttributeKey::new(2, None, None),
                        ],
                        0,
                    )],
                },
                Shape {
                    name: "b".to_string(),
                    faces: vec![Face::new(
                        vec![
                            AttributeKey::new(2, None, None),
                            AttributeKey::new(1, None, None),
                            AttributeKey::new(0, None, None),
                        ],
                        1,
                    )],
                },
            ],
            materials: vec![Material::implicit_default(), Material::implicit_default()],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_bounds_checked_lookup() {
        let mesh = sample();
        assert_eq!(mesh.position(1).unwrap(), Vector3::new(1.0, 0.0, 0.0));

        let err = mesh.normal(3).unwrap_err();
        assert!(matches!(
            err,
            DistModelError::MeshLoading(MeshLoadError::AttributeIndexOutOfRange {
                kind: AttributeKind::Normal,
                index: 3,
                len: 1,
            })
        ));
        assert!(mesh.texcoord(1).is_err());
        assert!(mesh.position(3).is_err());
    }

    #[test]
    fn test_face_vertices_order() {
        let mesh = sample();
        let visited: Vec<(usize, usize)> = mesh
            .face_vertices()
            .map(|(material, key)| (material, key.position))
            .collect();

        assert_eq!(visited, vec![(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0)]);
        assert_eq!(mesh.face_vertex_count(), 6);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_material_has_texture() {
        let mut material = Material::implicit_default();
        assert!(!material.has_texture());

        material.texture_filename = Some(String::new());
        assert!(!material.has_texture());

        material.texture_filename = Some("brick.png".to_string());
        assert!(material.has_texture());
    }
}
