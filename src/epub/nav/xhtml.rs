//! EPUB3 XHTML导航文档解析
//!
//! 导航文档中每个带类型的`nav`元素对应一张导航表。列表的嵌套结构决定层级，
//! `a`元素同时提供标题和引用；只有标题（`span`等）的列表项也会成为导航点，
//! 只是没有内容定位符。

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use scraper::{ElementRef, Html, Selector};

use crate::epub::config::NavigationOptions;
use crate::epub::error::{EpubError, Result};
use crate::epub::nav::{
    NavigationElement, NavigationPoint, NavigationTable, NavigationType, collapse_whitespace,
};

const TABLE_HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// 列表项的标签元素
enum ItemLabel<'a> {
    Anchor(ElementRef<'a>),
    Heading(ElementRef<'a>),
}

/// EPUB3导航文档解析器
#[derive(Debug, Clone)]
pub struct XhtmlNavParser {
    heading_elements: Vec<String>,
}

impl XhtmlNavParser {
    /// 使用配置中的标题元素创建解析器
    pub fn new(options: &NavigationOptions) -> Self {
        Self {
            heading_elements: options
                .heading_elements
                .iter()
                .map(|name| name.to_ascii_lowercase())
                .collect(),
        }
    }

    /// 解析导航文档
    ///
    /// # 参数
    /// * `document` - 导航文档的XHTML内容
    /// * `base_path` - 导航文档所在目录（容器内路径）
    ///
    /// # 返回值
    /// * `Result<Vec<NavigationTable>>` - 按文档顺序排列的导航表，没有带类型的nav时为空
    pub fn parse(&self, document: &str, base_path: &str) -> Result<Vec<NavigationTable>> {
        let expanded = expand_empty_elements(document)?;

        let html = Html::parse_document(&expanded);
        let nav_selector = Selector::parse("nav")
            .map_err(|e| EpubError::NavParseError(format!("选择器错误: {:?}", e)))?;

        let mut tables = Vec::new();
        for nav in html.select(&nav_selector) {
            let Some(nav_type) = nav_type_of(nav) else {
                debug!("跳过没有类型的nav元素");
                continue;
            };

            let mut table = NavigationTable::new(nav_type, base_path);

            if let Some(heading) = child_elements(nav)
                .find(|child| TABLE_HEADINGS.contains(&child.value().name()))
            {
                table.set_title(element_text(heading));
            }

            if let Some(list) = child_elements(nav).find(|child| is_list(*child)) {
                let points = self.walk_list(list, &table);
                table.extend_children(points);
            }

            debug!(
                "导航表 {} 解析完成: {} 个顶层条目",
                table.nav_type(),
                table.children().len()
            );
            tables.push(table);
        }

        Ok(tables)
    }

    /// 深度优先遍历一个列表
    fn walk_list(&self, list: ElementRef<'_>, table: &NavigationTable) -> Vec<NavigationPoint> {
        let mut points = Vec::new();
        for item in child_elements(list).filter(|child| child.value().name() == "li") {
            points.extend(self.build_item(item, table));
        }
        points
    }

    /// 把一个列表项转换为导航点
    ///
    /// 既没有链接也没有标题文字的列表项不会产生节点，它的子列表条目提升到上一级。
    fn build_item(&self, item: ElementRef<'_>, table: &NavigationTable) -> Vec<NavigationPoint> {
        let children = child_elements(item)
            .find(|child| is_list(*child))
            .map(|list| self.walk_list(list, table))
            .unwrap_or_default();

        match self.find_label(item) {
            Some(ItemLabel::Anchor(anchor)) => {
                let href = anchor.value().attr("href").unwrap_or_default();
                let point = NavigationPoint::new(anchor_title(anchor), table.resolve(href))
                    .with_id(anchor.value().id().map(str::to_string))
                    .with_point_type(epub_type_of(anchor))
                    .with_children(children);
                vec![point]
            }
            Some(ItemLabel::Heading(heading)) if !element_text(heading).is_empty() => {
                let point = NavigationPoint::new(element_text(heading), String::new())
                    .with_id(heading.value().id().map(str::to_string))
                    .with_children(children);
                vec![point]
            }
            _ => {
                if !children.is_empty() {
                    warn!("列表项没有标签，{} 个子条目提升到上一级", children.len());
                }
                children
            }
        }
    }

    /// 在列表项中查找第一个链接或有文字的标题元素，不进入嵌套列表
    fn find_label<'a>(&self, element: ElementRef<'a>) -> Option<ItemLabel<'a>> {
        for child in child_elements(element) {
            let name = child.value().name();
            if name == "a" {
                return Some(ItemLabel::Anchor(child));
            }
            if self.heading_elements.iter().any(|heading| heading == name) {
                // 标题里包着链接时以链接为准，空标题不算标签
                match self.find_label(child) {
                    Some(ItemLabel::Anchor(anchor)) => return Some(ItemLabel::Anchor(anchor)),
                    _ if !element_text(child).is_empty() => {
                        return Some(ItemLabel::Heading(child));
                    }
                    _ => continue,
                }
            }
            if is_list(child) {
                continue;
            }
            if let Some(label) = self.find_label(child) {
                return Some(label);
            }
        }
        None
    }
}

impl Default for XhtmlNavParser {
    fn default() -> Self {
        Self::new(&NavigationOptions::default())
    }
}

/// 使用默认配置解析EPUB3导航文档
pub fn parse_epub3(document: &str, base_path: &str) -> Result<Vec<NavigationTable>> {
    XhtmlNavParser::default().parse(document, base_path)
}

/// HTML中没有结束标签的空元素
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// 检查导航文档是格式良好的XML，并把非空元素的自闭合写法展开为成对标签
///
/// HTML解析器不认识`<title/>`、`<span/>`这样的XML写法，会把后面的内容当成元素内容，
/// 所以交给scraper之前先按XML语义重写一遍。
fn expand_empty_elements(document: &str) -> Result<String> {
    let mut reader = Reader::from_str(document);
    let mut writer = Writer::new(Vec::with_capacity(document.len()));
    let mut open_elements: usize = 0;
    let mut root_seen = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                root_seen = true;
                open_elements += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) => {
                root_seen = true;
                let name = e.local_name();
                let is_void = VOID_ELEMENTS
                    .iter()
                    .any(|void| void.as_bytes().eq_ignore_ascii_case(name.as_ref()));
                if is_void {
                    writer.write_event(Event::Empty(e))?;
                } else {
                    let end = e.to_end().into_owned();
                    writer.write_event(Event::Start(e))?;
                    writer.write_event(Event::End(end))?;
                }
            }
            Event::End(e) => {
                open_elements = open_elements.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    if !root_seen {
        return Err(EpubError::NavParseError("导航文档中没有任何元素".to_string()));
    }
    if open_elements != 0 {
        return Err(EpubError::NavParseError(format!(
            "导航文档意外结束，仍有 {} 个元素未闭合",
            open_elements
        )));
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| EpubError::NavParseError(format!("导航文档编码错误: {}", e)))
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn is_list(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "ol" | "ul")
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// 读取epub:type（或任何前缀的type）属性
fn epub_type_of(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attrs()
        .find(|(name, _)| *name == "epub:type" || name.ends_with(":type"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// nav元素的类型，优先使用epub:type，其次是ARIA role
fn nav_type_of(nav: ElementRef<'_>) -> Option<NavigationType> {
    let declared = epub_type_of(nav).and_then(|value| NavigationType::from_type_attr(&value));
    if declared.is_some() {
        return declared;
    }
    match nav.value().attr("role").map(str::trim) {
        Some("doc-toc") => Some(NavigationType::TableOfContents),
        Some("doc-pagelist") => Some(NavigationType::PageList),
        _ => None,
    }
}

/// 链接的标题：文字内容，其次是title属性，再次是图片的alt
fn anchor_title(anchor: ElementRef<'_>) -> String {
    let text = element_text(anchor);
    if !text.is_empty() {
        return text;
    }
    if let Some(title) = anchor.value().attr("title") {
        return collapse_whitespace(title);
    }
    anchor
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "img")
        .and_then(|img| img.value().attr("alt"))
        .map(collapse_whitespace)
        .unwrap_or_default()
}
