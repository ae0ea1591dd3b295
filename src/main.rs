//! DistModel - 模型加载命令行工具
//!
//! 加载一个 OBJ 模型，打印顶点/索引缓冲的大小以及每个材质的绘制范围。
//! 可以通过配置文件或命令行参数指定模型和资源目录。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件
//! cargo run
//!
//! # 命令行覆盖
//! cargo run -- --asset-root assets --model two_materials.obj --log-level debug
//! ```
//!
//! # 流程概览
//!
//! ```text
//! ┌─────────────┐
//! │   main.rs   │  读取配置、初始化日志
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ ModelLoader │  解析 → 去重 → 分区
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ DrawCallRange × N │  每个材质一次绘制
//! └─────────────┘
//! ```

use anyhow::Context;
use dist_model::core::{log, Config};
use dist_model::geometry::{ModelGeometry, ModelLoader};
use tracing::info;

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml）
/// 2. 应用命令行参数覆盖
/// 3. 初始化日志系统
/// 4. 加载模型并输出绘制范围
///
/// # 命令行参数
///
/// - `--model <path>`: 模型文件路径（相对于资源根目录）
/// - `--asset-root <dir>`: 资源根目录
/// - `--log-level <level>`: 日志级别
fn main() -> anyhow::Result<()> {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("config.toml");

    // 2. 应用命令行参数
    config.apply_args(std::env::args());

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // 3. 初始化日志系统
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("Failed to initialize logger")?;

    info!("DistModel starting...");
    info!(version = env!("CARGO_PKG_VERSION"), "Application initialized");

    // 4. 加载模型
    let mut loader = ModelLoader::from_config(&config.model)
        .context("Failed to resolve asset root")?;

    info!(
        asset_root = %loader.resolver().asset_root().display(),
        model_path = %config.model.path,
        "Model configuration"
    );

    if let Err(e) = loader.load_model(&config.model.path) {
        dist_model::app_error!("Failed to load model: {}", e);
        return Err(e).with_context(|| format!("Failed to load model '{}'", config.model.path));
    }

    if let Some(geometry) = loader.geometry() {
        print_summary(&geometry)?;
    }

    dist_model::app_info!("Done");
    Ok(())
}

fn print_summary(geometry: &ModelGeometry) -> anyhow::Result<()> {
    println!("模型: {}", geometry.name().unwrap_or("未命名"));
    println!(
        "  顶点缓冲: {} 个顶点 × {} 字节 = {} 字节",
        geometry.vertex_count(),
        geometry.vertex_stride(),
        geometry.vertex_buffer_size()
    );
    println!(
        "  索引缓冲: {} 个索引 = {} 字节",
        geometry.index_count(),
        geometry.index_buffer_size()
    );
    println!(
        "  材质: {} 个 ({} 个带纹理)",
        geometry.material_count(),
        geometry.textured_material_count()
    );

    println!("\n{:>4}  {:<20} {:>10} {:>12} {:>12}  纹理", "ID", "材质", "索引数", "起始索引", "基准顶点");
    for (material_id, material) in geometry.materials().iter().enumerate() {
        let range = geometry.draw_call_range(material_id)?;
        let texture = geometry
            .texture_path(material_id)?
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>4}  {:<20} {:>10} {:>12} {:>12}  {}",
            material_id,
            material.name,
            range.index_count,
            range.start_index,
            range.start_vertex,
            texture
        );
    }

    if !geometry.warnings().is_empty() {
        println!("\n警告:");
        for warning in geometry.warnings() {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
