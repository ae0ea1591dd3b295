/// OBJ 模型加载示例
///
/// 演示如何使用 DistModel 的 geometry 模块加载 OBJ 文件并逐材质发出绘制调用。
///
/// 运行方式：
/// ```
/// cargo run --example load_obj
/// ```

use dist_model::core::RootDirResolver;
use dist_model::geometry::ModelLoader;

fn main() {
    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== DistModel OBJ 加载器示例 ===\n");

    let asset_root = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
    let mut loader = ModelLoader::new(RootDirResolver::new(asset_root));

    println!("正在加载: {}/two_materials.obj", asset_root);

    if let Err(e) = loader.load_model("two_materials.obj") {
        eprintln!("\n✗ 加载失败: {}", e);
        std::process::exit(1);
    }

    println!("\n✓ 加载成功！\n");
    println!("网格信息:");
    println!("  顶点数: {}", loader.vertex_count());
    println!("  索引数: {}", loader.index_count());
    println!("  材质数: {}", loader.material_count());

    // 显示前几个顶点的数据
    println!("\n顶点数据（前 {} 个）:", loader.vertex_count().min(3));
    for (i, vertex) in loader.vertex_buffer().iter().take(3).enumerate() {
        println!("  顶点 {}:", i);
        println!("    位置: [{:.3}, {:.3}, {:.3}]",
            vertex.position[0], vertex.position[1], vertex.position[2]);
        println!("    颜色: [{:.3}, {:.3}, {:.3}]",
            vertex.diffuse_color[0], vertex.diffuse_color[1], vertex.diffuse_color[2]);
        println!("    法线: [{:.3}, {:.3}, {:.3}]",
            vertex.normal[0], vertex.normal[1], vertex.normal[2]);
        println!("    UV: [{:.3}, {:.3}]",
            vertex.texcoord[0], vertex.texcoord[1]);
    }

    // 模拟渲染器的绘制循环
    println!("\n绘制调用:");
    for material_id in 0..loader.material_count() {
        let range = match loader.draw_call_range(material_id) {
            Ok(range) => range,
            Err(e) => {
                eprintln!("  材质 {}: {}", material_id, e);
                continue;
            }
        };

        if range.is_empty() {
            println!("  材质 {}: 无面，跳过", material_id);
            continue;
        }

        println!(
            "  DrawIndexedInstanced({}, 1, {}, {}, 0)",
            range.index_count, range.start_index, range.start_vertex
        );

        if let Ok(Some(texture)) = loader.texture_path(material_id) {
            println!("    纹理: {}", texture.display());
        }
    }

    println!("\n=== 示例完成 ===");
}
