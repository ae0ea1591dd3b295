/// OBJ 文件解析器
///
/// 使用 tobj crate 解析 Wavefront OBJ 格式的模型和 MTL 材质库，
/// 并转换成与格式无关的 `ExtractedMesh`。
///
/// tobj 以多索引模式加载（位置、法线、纹理坐标各自独立编号），
/// 这样面顶点的属性三元组能原样交给去重器。
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use super::AttributeExtractor;
use crate::core::error::{AttributeKind, MeshLoadError, Result};
use crate::geometry::extract::{
    AttributeKey, ExtractedMesh, Face, Material, Shape, DEFAULT_DIFFUSE,
};

/// OBJ 格式解析器
///
/// # 特性
///
/// - 自动三角化多边形面
/// - 忽略点和线图元
/// - 按 `usemtl` 拆分形状，每个面携带所属材质 ID
/// - 没有材质的面归入追加在末尾的隐式默认材质
/// - MTL 加载失败只记为警告，不中止解析
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_model::geometry::loaders::{AttributeExtractor, ObjLoader};
/// use std::path::Path;
///
/// let mesh = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// println!("{} 个位置, {} 个材质", mesh.positions.len(), mesh.materials.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,    // 自动三角化
            single_index: false,  // 保留各属性独立的索引
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    /// 从内存解析 OBJ，并可选地提供 `mtllib` 引用的材质库内容
    ///
    /// OBJ 中的任何 `mtllib` 语句都会解析为 `mtl`；未提供时记一条警告。
    pub fn load_from_memory_with_mtl(obj: &[u8], mtl: Option<&[u8]>) -> Result<ExtractedMesh> {
        let mut reader = Cursor::new(obj);

        let (models, materials) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_| {
            match mtl {
                Some(bytes) => tobj::load_mtl_buf(&mut Cursor::new(bytes)),
                None => Err(tobj::LoadError::OpenFileFailed),
            }
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        convert(models, materials)
    }
}

impl AttributeExtractor for ObjLoader {
    fn load_from_file(path: &Path) -> Result<ExtractedMesh> {
        // 检查文件是否存在
        if !path.is_file() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let (models, materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|e| match e {
                tobj::LoadError::OpenFileFailed | tobj::LoadError::ReadError => {
                    MeshLoadError::FileNotFound(path.to_path_buf())
                }
                other => MeshLoadError::ParseError(format!("tobj 解析失败: {}", other)),
            })?;

        convert(models, materials)
    }

    fn load_from_memory(data: &[u8]) -> Result<ExtractedMesh> {
        Self::load_from_memory_with_mtl(data, None)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

/// 按值去重的全局属性表
///
/// tobj 在每个 `o` / `g` / `usemtl` 处开始新模型并重新编号属性，
/// 同一个 OBJ 属性在不同模型里会得到不同的局部下标。这里按精确的位模式
/// 把属性值归并到一张全局表里，同一个 OBJ 属性总是得到同一个全局下标。
struct AttributeTable<const N: usize> {
    values: Vec<[f32; N]>,
    lookup: HashMap<[u32; N], usize>,
}

impl<const N: usize> AttributeTable<N> {
    fn new() -> Self {
        Self {
            values: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    fn intern(&mut self, value: [f32; N]) -> usize {
        let bits = value.map(f32::to_bits);
        let values = &mut self.values;
        *self.lookup.entry(bits).or_insert_with(|| {
            values.push(value);
            values.len() - 1
        })
    }

    /// 归并一个模型的扁平属性数组，返回 局部下标 → 全局下标 的映射
    fn intern_all(&mut self, flat: &[f32]) -> Vec<usize> {
        flat.chunks_exact(N)
            .map(|chunk| {
                let mut value = [0.0; N];
                value.copy_from_slice(chunk);
                self.intern(value)
            })
            .collect()
    }

    fn into_values(self) -> Vec<[f32; N]> {
        self.values
    }
}

/// 把模型局部下标映射到全局下标
fn remap(
    table: &[usize],
    local: u32,
    kind: AttributeKind,
) -> std::result::Result<usize, MeshLoadError> {
    table
        .get(local as usize)
        .copied()
        .ok_or(MeshLoadError::AttributeIndexOutOfRange {
            kind,
            index: local as usize,
            len: table.len(),
        })
}

/// 把 tobj 的输出合并成全局属性数组
///
/// 每个模型的属性先经 `AttributeTable` 归并，面索引再经映射表改写成全局下标，
/// 因此同一个 OBJ 属性三元组无论落在哪个 tobj 模型里都得到相同的 `AttributeKey`。
fn convert(
    models: Vec<tobj::Model>,
    materials: std::result::Result<Vec<tobj::Material>, tobj::LoadError>,
) -> Result<ExtractedMesh> {
    let mut out = ExtractedMesh::default();

    out.materials = match materials {
        Ok(materials) => materials.into_iter().map(convert_material).collect(),
        Err(e) => {
            out.warnings.push(format!("材质库加载失败: {}", e));
            Vec::new()
        }
    };

    let default_material = out.materials.len();
    let mut uses_default_material = false;

    let mut positions = AttributeTable::<3>::new();
    let mut normals = AttributeTable::<3>::new();
    let mut texcoords = AttributeTable::<2>::new();

    for model in models {
        let mesh = &model.mesh;

        let position_map = positions.intern_all(&mesh.positions);
        let normal_map = normals.intern_all(&mesh.normals);
        let texcoord_map = texcoords.intern_all(&mesh.texcoords);

        let normal_indices =
            index_stream(&mesh.normal_indices, mesh.indices.len(), "法线", &model.name, &mut out.warnings);
        let texcoord_indices =
            index_stream(&mesh.texcoord_indices, mesh.indices.len(), "纹理坐标", &model.name, &mut out.warnings);

        let material_id = mesh.material_id.unwrap_or_else(|| {
            uses_default_material = true;
            default_material
        });

        // 三角化后 face_arities 为空，每个面 3 个顶点
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut faces = Vec::with_capacity(arities.len());
        let mut offset = 0;
        for arity in arities {
            let corners = offset..offset + arity;
            let corner_positions = mesh.indices.get(corners.clone()).ok_or_else(|| {
                MeshLoadError::ParseError(format!(
                    "形状 '{}' 的面顶点数超出索引数组 ({} > {})",
                    model.name,
                    corners.end,
                    mesh.indices.len()
                ))
            })?;

            let vertices = corner_positions
                .iter()
                .zip(corners.clone())
                .map(|(&position, corner)| -> std::result::Result<AttributeKey, MeshLoadError> {
                    let normal = normal_indices
                        .map(|n| remap(&normal_map, n[corner], AttributeKind::Normal))
                        .transpose()?;
                    let texcoord = texcoord_indices
                        .map(|t| remap(&texcoord_map, t[corner], AttributeKind::Texcoord))
                        .transpose()?;
                    Ok(AttributeKey::new(
                        remap(&position_map, position, AttributeKind::Position)?,
                        normal,
                        texcoord,
                    ))
                })
                .collect::<std::result::Result<Vec<_>, MeshLoadError>>()?;

            faces.push(Face::new(vertices, material_id));
            offset = corners.end;
        }

        out.shapes.push(Shape {
            name: model.name,
            faces,
        });
    }

    out.positions = positions.into_values();
    out.normals = normals.into_values();
    out.texcoords = texcoords.into_values();

    if uses_default_material {
        out.warnings.push(format!(
            "存在未指定材质的面，使用隐式默认材质 (ID {})",
            default_material
        ));
        out.materials.push(Material::implicit_default());
    }

    Ok(out)
}

/// 取出与位置索引一一对应的属性索引流
///
/// 为空表示该属性缺省；长度与位置索引不一致时丢弃并记警告。
fn index_stream<'a>(
    stream: &'a [u32],
    expected: usize,
    label: &str,
    shape: &str,
    warnings: &mut Vec<String>,
) -> Option<&'a [u32]> {
    if stream.is_empty() {
        None
    } else if stream.len() == expected {
        Some(stream)
    } else {
        warnings.push(format!(
            "形状 '{}' 的{}索引数 {} 与位置索引数 {} 不一致，已忽略",
            shape,
            label,
            stream.len(),
            expected
        ));
        None
    }
}

fn convert_material(material: tobj::Material) -> Material {
    Material {
        name: material.name,
        diffuse_color: material.diffuse.unwrap_or(DEFAULT_DIFFUSE),
        texture_filename: material.diffuse_texture.filter(|name| !name.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistModelError;
    use crate::geometry::mesh::ModelGeometry;

    const TWO_MATERIALS_OBJ: &str = "\
mtllib scene.mtl
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
usemtl red
f 1/1/1 2/2/1 3/3/1
usemtl blue
f 1/1/1 2/2/1 3/3/1
";

    const SCENE_MTL: &str = "\
newmtl red
Kd 1 0 0
map_Kd red.png

newmtl blue
Kd 0 0 1

newmtl unused
Kd 0 1 0
";

    #[test]
    fn test_supported_extensions() {
        let exts = ObjLoader::supported_extensions();
        assert_eq!(exts, &["obj"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ObjLoader::load_from_file(Path::new("nonexistent.obj"));
        assert!(matches!(
            result,
            Err(DistModelError::MeshLoading(MeshLoadError::FileNotFound(_)))
        ));
    }

    #[test]
    fn test_materials_and_faces() {
        let mesh = ObjLoader::load_from_memory_with_mtl(
            TWO_MATERIALS_OBJ.as_bytes(),
            Some(SCENE_MTL.as_bytes()),
        )
        .unwrap();

        assert_eq!(mesh.materials.len(), 3);
        assert_eq!(mesh.materials[0].name, "red");
        assert_eq!(mesh.materials[0].diffuse_color, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.materials[0].texture_filename.as_deref(), Some("red.png"));
        assert_eq!(mesh.materials[1].texture_filename, None);

        let material_ids: Vec<usize> = mesh
            .shapes
            .iter()
            .flat_map(|s| s.faces.iter())
            .map(|f| f.material_id)
            .collect();
        assert_eq!(material_ids, vec![0, 1]);
        assert_eq!(mesh.face_vertex_count(), 6);
        assert!(mesh.warnings.is_empty());
    }

    #[test]
    fn test_attribute_indices_resolve() {
        let mesh = ObjLoader::load_from_memory_with_mtl(
            TWO_MATERIALS_OBJ.as_bytes(),
            Some(SCENE_MTL.as_bytes()),
        )
        .unwrap();

        for (_, key) in mesh.face_vertices() {
            assert!(mesh.position(key.position).is_ok());
            assert!(key.normal.is_some_and(|n| mesh.normal(n).is_ok()));
            assert!(key.texcoord.is_some_and(|t| mesh.texcoord(t).is_ok()));
        }

        let first = mesh.shapes[0].faces[0].vertices[1];
        assert_eq!(mesh.position(first.position).unwrap().x, 1.0);
        assert_eq!(mesh.texcoord(first.texcoord.unwrap()).unwrap().x, 1.0);
    }

    #[test]
    fn test_missing_mtl_is_a_warning() {
        let mesh = ObjLoader::load_from_memory(TWO_MATERIALS_OBJ.as_bytes()).unwrap();

        assert!(!mesh.warnings.is_empty());
        // 材质库缺失时所有面都落到隐式默认材质
        assert_eq!(mesh.materials, vec![Material::implicit_default()]);
        assert!(mesh
            .shapes
            .iter()
            .flat_map(|s| s.faces.iter())
            .all(|f| f.material_id == 0));
    }

    #[test]
    fn test_quad_is_triangulated() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = ObjLoader::load_from_memory(obj.as_bytes()).unwrap();

        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.face_vertex_count(), 6);
        for (_, key) in mesh.face_vertices() {
            assert_eq!(key.normal, None);
            assert_eq!(key.texcoord, None);
        }
    }

    const QUAD_POSITIONS: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
";

    fn keys_of(mesh: &ExtractedMesh, material_id: usize) -> Vec<AttributeKey> {
        mesh.face_vertices()
            .filter(|&(id, _)| id == material_id)
            .map(|(_, key)| key)
            .collect()
    }

    #[test]
    fn test_repeated_usemtl_blocks_share_keys() {
        let obj = format!(
            "{}usemtl red\nf 1 2 3\nusemtl blue\nf 2 4 3\nusemtl red\nf 2 4 3\n",
            QUAD_POSITIONS
        );
        let mesh = ObjLoader::load_from_memory_with_mtl(obj.as_bytes(), Some(SCENE_MTL.as_bytes()))
            .unwrap();

        // tobj 在每个 usemtl 处拆分，键仍然按 OBJ 属性对齐
        assert!(mesh.shapes.len() >= 3);
        assert_eq!(mesh.positions.len(), 4);

        let red = keys_of(&mesh, 0);
        assert_eq!(red.len(), 6);
        assert_eq!(red[1], red[3]); // v2
        assert_eq!(red[2], red[5]); // v3

        let geometry = ModelGeometry::build(&mesh, "").unwrap();
        assert_eq!(geometry.material_vertex_count(0).unwrap(), 4);
        assert_eq!(geometry.material_vertex_count(1).unwrap(), 3);

        let range = geometry.draw_call_range(0).unwrap();
        let red_indices = &geometry.index_buffer()[range.start_index as usize..range.end_index() as usize];
        assert_eq!(red_indices, &[0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_groups_under_one_material_share_keys() {
        let obj = format!(
            "{}usemtl red\ng a\nf 1 2 3\ng b\nf 2 4 3\n",
            QUAD_POSITIONS
        );
        let mesh = ObjLoader::load_from_memory_with_mtl(obj.as_bytes(), Some(SCENE_MTL.as_bytes()))
            .unwrap();

        assert_eq!(mesh.shapes.len(), 2);
        assert_eq!(mesh.shapes[0].faces[0].vertices[1], mesh.shapes[1].faces[0].vertices[0]);

        let geometry = ModelGeometry::build(&mesh, "").unwrap();
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.index_count(), 6);
    }

    #[test]
    fn test_attribute_table_interns_by_value() {
        let mut table = AttributeTable::<2>::new();
        let first = table.intern_all(&[0.0, 1.0, 0.5, 0.5]);
        let second = table.intern_all(&[0.5, 0.5, 0.0, 1.0, 0.25, 0.0]);

        assert_eq!(first, vec![0, 1]);
        assert_eq!(second, vec![1, 0, 2]);
        assert_eq!(table.into_values(), vec![[0.0, 1.0], [0.5, 0.5], [0.25, 0.0]]);
    }

    #[test]
    fn test_malformed_obj_is_parse_error() {
        let obj = "v 0 0 0\nv 1 nope 0\nv 0 1 0\nf 1 2 3\n";
        let result = ObjLoader::load_from_memory(obj.as_bytes());

        assert!(matches!(
            result,
            Err(DistModelError::MeshLoading(MeshLoadError::ParseError(_)))
        ));
    }
}
