pub mod epub;

// === 核心API重新导出 ===

/// EPUB容器和包（主要接口）
pub use epub::{Container, Package, RootFile};

/// 错误处理
pub use epub::{EpubError, Result};

/// 导航解析配置
pub use epub::NavigationOptions;

// === 导航模型 ===

/// 导航树的节点
pub use epub::{ElementKind, NavigationElement, NavigationPoint, NavigationTable, NavigationType};

/// 树形显示
pub use epub::{NavigationStatistics, TreeStyle, TreeView};

// === 底层组件（高级用法） ===

/// 导航文档解析
pub use epub::{
    CacheState,
    NavDialect,
    NavigationCache,
    NavigationParser,
    NavigationSource,
    NcxParser,
    XhtmlNavParser,
    parse_epub2,
    parse_epub3,
};

/// OPF组件
pub use epub::{ManifestItem, Opf};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// === 便捷函数 ===

/// 快速打开EPUB文件
///
/// 这是 `Container::open` 的便捷包装函数。
///
/// # 参数
/// * `path` - EPUB文件路径
///
/// # 返回值
/// * `Result<Container>` - 打开的容器
///
/// # 示例
///
/// ```no_run
/// use epubnav::NavigationElement;
///
/// let container = epubnav::open("book.epub")?;
/// let package = container.default_package()?;
/// if let Some(toc) = package.table_of_contents()? {
///     println!("目录: {} 个顶层条目", toc.children().len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Container> {
    Container::open(path)
}
