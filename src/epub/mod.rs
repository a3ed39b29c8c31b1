mod archive;
pub mod config;
pub mod container;
pub mod error;
pub mod nav;
pub mod opf;
pub mod package;

#[cfg(test)]
mod test_support;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出配置
pub use config::NavigationOptions;

// 重新导出容器和包
pub use container::{Container, RootFile};
pub use package::{NavigationSource, Package};

// 重新导出OPF相关
pub use opf::{ManifestItem, Opf};

// 重新导出导航相关
pub use nav::{
    CacheState,
    ElementKind,
    NavDialect,
    NavigationCache,
    NavigationElement,
    NavigationParser,
    NavigationPoint,
    NavigationStatistics,
    NavigationTable,
    NavigationType,
    NcxParser,
    TreeStyle,
    TreeView,
    XhtmlNavParser,
    parse_epub2,
    parse_epub3,
};
