//! 导航模型模块
//!
//! 把EPUB2的NCX文件和EPUB3的XHTML导航文档统一表示为导航树：
//! 导航表（树根）下挂着按文档顺序排列、可以嵌套的导航点。

pub mod cache;
pub mod locator;
pub mod navigation;
pub mod ncx;
pub mod parser;
pub mod tree_view;
pub mod xhtml;

// 重新导出公共类型
pub use cache::{CacheState, NavigationCache};
pub use navigation::{
    ElementKind, NavigationElement, NavigationPoint, NavigationTable, NavigationType,
};
pub use ncx::parse_epub2;
pub use parser::{NCX_MEDIA_TYPE, NavDialect, NavigationParser, NcxParser};
pub use tree_view::{NavigationStatistics, TreeStyle, TreeView};
pub use xhtml::{XhtmlNavParser, parse_epub3};

/// 把连续空白折叠为单个空格并去掉首尾空白
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
