//! 导航解析器的统一入口
//!
//! 两种方言各有一个解析器实现，由[`NavDialect`]选择。

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::epub::config::NavigationOptions;
use crate::epub::error::Result;
use crate::epub::nav::{NavigationTable, XhtmlNavParser, parse_epub2};

/// NCX文件的媒体类型
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// 导航文档方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDialect {
    /// EPUB2 NCX导航控制文件
    Ncx,
    /// EPUB3 XHTML导航文档
    XhtmlNav,
}

impl NavDialect {
    /// 创建对应方言的解析器
    pub fn parser(self, options: &NavigationOptions) -> Box<dyn NavigationParser> {
        match self {
            NavDialect::Ncx => Box::new(NcxParser),
            NavDialect::XhtmlNav => Box::new(XhtmlNavParser::new(options)),
        }
    }
}

impl Display for NavDialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            NavDialect::Ncx => write!(f, "NCX"),
            NavDialect::XhtmlNav => write!(f, "XHTML nav"),
        }
    }
}

/// 导航解析器
pub trait NavigationParser: Send + Sync {
    /// 解析导航文档，返回其中所有的导航表
    ///
    /// # 参数
    /// * `document` - 导航文档内容
    /// * `base_path` - 导航文档所在目录（容器内路径）
    fn parse(&self, document: &str, base_path: &str) -> Result<Vec<NavigationTable>>;

    /// 解析器处理的方言
    fn dialect(&self) -> NavDialect;
}

/// NCX解析器，只产生一张目录表
#[derive(Debug, Clone, Copy, Default)]
pub struct NcxParser;

impl NavigationParser for NcxParser {
    fn parse(&self, document: &str, base_path: &str) -> Result<Vec<NavigationTable>> {
        parse_epub2(document, base_path).map(|table| vec![table])
    }

    fn dialect(&self) -> NavDialect {
        NavDialect::Ncx
    }
}

impl NavigationParser for XhtmlNavParser {
    fn parse(&self, document: &str, base_path: &str) -> Result<Vec<NavigationTable>> {
        XhtmlNavParser::parse(self, document, base_path)
    }

    fn dialect(&self) -> NavDialect {
        NavDialect::XhtmlNav
    }
}
