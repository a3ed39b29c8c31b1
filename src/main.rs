use std::process;

use clap::Parser;
use epubnav::{
    Container, NavigationOptions, NavigationTable, NavigationType, Package, Result, TreeStyle,
    TreeView,
};
use log::{LevelFilter, debug};

/// 📚 epubnav - EPUB导航结构查看工具
#[derive(Parser)]
#[command(name = "epubnav")]
#[command(about = "显示EPUB文件的目录、页码列表和地标")]
#[command(version)]
struct Args {
    /// EPUB文件路径
    #[arg(help = "要查看的EPUB文件路径", required_unless_present = "generate_config")]
    epub_file: Option<String>,

    /// 显示目录
    #[arg(short, long, help = "显示目录（未指定任何导航表时的默认行为）")]
    toc: bool,

    /// 显示页码列表
    #[arg(short, long, help = "显示页码列表")]
    page_list: bool,

    /// 显示地标
    #[arg(short, long, help = "显示地标")]
    landmarks: bool,

    /// 显示全部导航表
    #[arg(short, long, help = "显示导航文档中的全部导航表")]
    all: bool,

    /// 导航树显示样式
    #[arg(long, value_enum, default_value = "tree", help = "导航树的显示样式")]
    style: DisplayStyle,

    /// 显示内容定位符
    #[arg(long, help = "在每个条目后显示它指向的内容")]
    show_paths: bool,

    /// 最大显示深度
    #[arg(long, help = "导航树的最大显示深度")]
    max_depth: Option<u32>,

    /// 配置文件路径
    #[arg(long, value_name = "FILE", help = "导航解析配置文件（YAML）")]
    config: Option<String>,

    /// 生成默认配置文件
    #[arg(long, value_name = "FILE", help = "生成默认配置文件后退出")]
    generate_config: Option<String>,

    /// 详细输出模式
    #[arg(short, long, help = "输出调试日志")]
    verbose: bool,
}

/// 导航树显示样式
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DisplayStyle {
    /// 树状符号
    Tree,
    /// 缩进
    Indented,
}

impl From<DisplayStyle> for TreeStyle {
    fn from(style: DisplayStyle) -> Self {
        match style {
            DisplayStyle::Tree => TreeStyle::TreeSymbols,
            DisplayStyle::Indented => TreeStyle::Indented,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ 错误: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if let Some(config_path) = &args.generate_config {
        NavigationOptions::generate_default_config(config_path)?;
        println!("✅ 已生成默认配置文件: {}", config_path);
        if args.epub_file.is_none() {
            return Ok(());
        }
    }

    let options = match &args.config {
        Some(config_path) => NavigationOptions::from_file(config_path)?,
        None => NavigationOptions::default(),
    };

    let Some(epub_file) = &args.epub_file else {
        return Ok(());
    };

    let container = Container::open(epub_file)?;
    let package = container.default_package_with_options(options)?;

    println!("📚 {} (EPUB {})", epub_file, package.version());
    match package.navigation_source() {
        Some(source) => debug!("导航文档: {} ({})", source.path, source.dialect),
        None => debug!("没有找到导航文档"),
    }

    if args.all {
        let tables = package.navigation_tables()?;
        if tables.is_empty() {
            println!("\n⚠️  没有找到任何导航表");
        }
        for table in &tables {
            display_table(table, args);
        }
        return Ok(());
    }

    let mut requested = Vec::new();
    if args.toc || (!args.page_list && !args.landmarks) {
        requested.push(NavigationType::TableOfContents);
    }
    if args.page_list {
        requested.push(NavigationType::PageList);
    }
    if args.landmarks {
        requested.push(NavigationType::Landmarks);
    }

    for nav_type in &requested {
        display_requested(&package, nav_type, args)?;
    }

    Ok(())
}

/// 显示一种导航表，不存在时给出提示
fn display_requested(package: &Package, nav_type: &NavigationType, args: &Args) -> Result<()> {
    match package.navigation_table(nav_type)? {
        Some(table) => display_table(&table, args),
        None => println!("\n⚠️  [{}] 不存在", nav_type),
    }
    Ok(())
}

/// 显示导航树和统计信息
fn display_table(table: &NavigationTable, args: &Args) {
    let view = TreeView::new(table)
        .with_style(args.style.into())
        .with_show_paths(args.show_paths)
        .with_max_depth(args.max_depth);

    println!("\n{}", view);
    println!("📊 {}", view.statistics());
}
