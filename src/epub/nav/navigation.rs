//! 导航元素数据结构定义
//!
//! 定义导航树中的各种节点：抽象的导航元素能力、带内容引用的导航点，
//! 以及作为树根的导航表。

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::epub::nav::locator;

/// 节点种类，用于代替运行时的向下转型
#[derive(Debug, Clone, Copy)]
pub enum ElementKind<'a> {
    /// 导航点
    Point(&'a NavigationPoint),
    /// 导航表（树根）
    Table(&'a NavigationTable),
}

/// 导航元素：所有导航节点共有的能力
///
/// 每个元素都有标题（可能为空，但不会缺失）以及按文档顺序排列的子导航点。
pub trait NavigationElement {
    /// 标题
    fn title(&self) -> &str;

    /// 子导航点（文档顺序）
    fn children(&self) -> &[NavigationPoint];

    /// 节点种类
    fn kind(&self) -> ElementKind<'_>;

    /// 如果是导航点则返回它
    fn as_point(&self) -> Option<&NavigationPoint> {
        match self.kind() {
            ElementKind::Point(point) => Some(point),
            ElementKind::Table(_) => None,
        }
    }

    /// 如果是导航表则返回它
    fn as_table(&self) -> Option<&NavigationTable> {
        match self.kind() {
            ElementKind::Table(table) => Some(table),
            ElementKind::Point(_) => None,
        }
    }

    /// 是否为导航点
    fn is_point(&self) -> bool {
        self.as_point().is_some()
    }

    /// 子树深度（不含自身）
    fn depth(&self) -> u32 {
        self.children()
            .iter()
            .map(|child| 1 + child.depth())
            .max()
            .unwrap_or(0)
    }

    /// 所有后代节点的数量
    fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// 导航点
///
/// 一个可以跳转的条目。`content` 是已经基于导航表基础路径解析过的定位符，
/// 可能带有片段标识（`#id`），也可能为空（仅作为标题使用的条目）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPoint {
    title: String,
    content: String,
    id: Option<String>,
    play_order: Option<u32>,
    point_type: Option<String>,
    children: Vec<NavigationPoint>,
}

impl NavigationPoint {
    /// 创建新的导航点
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            id: None,
            play_order: None,
            point_type: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub(crate) fn with_play_order(mut self, play_order: Option<u32>) -> Self {
        self.play_order = play_order;
        self
    }

    pub(crate) fn with_point_type(mut self, point_type: Option<String>) -> Self {
        self.point_type = point_type;
        self
    }

    pub(crate) fn with_children(mut self, children: Vec<NavigationPoint>) -> Self {
        self.children = children;
        self
    }

    /// 添加子导航点
    pub(crate) fn add_child(&mut self, child: NavigationPoint) {
        self.children.push(child);
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// 内容定位符（可能为空）
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 是否带有内容定位符
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// 定位符中的资源路径部分（去掉片段标识）
    pub fn path(&self) -> &str {
        locator::split_fragment(&self.content).0
    }

    /// 定位符中的片段标识（不含`#`）
    pub fn fragment(&self) -> Option<&str> {
        locator::split_fragment(&self.content).1
    }

    /// 源文档中的ID
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// NCX中的playOrder，仅供参考，不影响顺序
    pub fn play_order(&self) -> Option<u32> {
        self.play_order
    }

    /// 条目类型（EPUB3地标的epub:type或NCX的class）
    pub fn point_type(&self) -> Option<&str> {
        self.point_type.as_deref()
    }

    /// 是否为叶子条目
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl NavigationElement for NavigationPoint {
    fn title(&self) -> &str {
        &self.title
    }

    fn children(&self) -> &[NavigationPoint] {
        &self.children
    }

    fn kind(&self) -> ElementKind<'_> {
        ElementKind::Point(self)
    }
}

/// 导航列表类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NavigationType {
    /// 目录（toc）
    TableOfContents,
    /// 页码列表（page-list）
    PageList,
    /// 地标（landmarks）
    Landmarks,
    /// 自定义导航列表
    Other(String),
}

impl NavigationType {
    /// 从epub:type属性值解析类型
    ///
    /// 属性值是以空白分隔的词列表，优先取第一个已知类型，否则取第一个词作为自定义类型。
    pub fn from_type_attr(value: &str) -> Option<Self> {
        let mut first = None;
        for token in value.split_whitespace() {
            let token = token.rsplit(':').next().unwrap_or(token);
            match Self::from_token(token) {
                Self::Other(_) => {
                    if first.is_none() {
                        first = Some(token);
                    }
                }
                known => return Some(known),
            }
        }
        first.map(|token| Self::Other(token.to_string()))
    }

    fn from_token(token: &str) -> Self {
        match token {
            "toc" => Self::TableOfContents,
            "page-list" => Self::PageList,
            "landmarks" => Self::Landmarks,
            other => Self::Other(other.to_string()),
        }
    }

    /// 类型的字符串形式
    pub fn as_str(&self) -> &str {
        match self {
            Self::TableOfContents => "toc",
            Self::PageList => "page-list",
            Self::Landmarks => "landmarks",
            Self::Other(name) => name,
        }
    }
}

impl Display for NavigationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// 导航表
///
/// 一个有类型的导航列表的根节点。类型在构造时确定，之后不可修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTable {
    nav_type: NavigationType,
    title: String,
    base_path: String,
    children: Vec<NavigationPoint>,
}

impl NavigationTable {
    /// 创建新的导航表
    ///
    /// # 参数
    /// * `nav_type` - 导航列表类型
    /// * `base_path` - 解析相对定位符所用的目录（容器内路径）
    pub fn new(nav_type: NavigationType, base_path: impl Into<String>) -> Self {
        Self {
            nav_type,
            title: String::new(),
            base_path: base_path.into(),
            children: Vec::new(),
        }
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn add_child(&mut self, child: NavigationPoint) {
        self.children.push(child);
    }

    pub(crate) fn extend_children(&mut self, children: Vec<NavigationPoint>) {
        self.children.extend(children);
    }

    /// 导航列表类型
    pub fn nav_type(&self) -> &NavigationType {
        &self.nav_type
    }

    /// 基础路径
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// 基于本表的基础路径解析一个原始引用
    pub fn resolve(&self, href: &str) -> String {
        locator::resolve(&self.base_path, href)
    }

    /// 是否没有任何条目
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// 深度优先的平铺列表，元素为(深度, 导航点)，顶层深度为0
    pub fn flatten(&self) -> Vec<(usize, &NavigationPoint)> {
        fn walk<'a>(
            points: &'a [NavigationPoint],
            depth: usize,
            out: &mut Vec<(usize, &'a NavigationPoint)>,
        ) {
            for point in points {
                out.push((depth, point));
                walk(&point.children, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.children, 0, &mut out);
        out
    }

    /// 根据ID查找导航点
    pub fn find_by_id(&self, id: &str) -> Option<&NavigationPoint> {
        self.flatten()
            .into_iter()
            .map(|(_, point)| point)
            .find(|point| point.id() == Some(id))
    }

    /// 根据定位符查找第一个导航点
    ///
    /// 传入值不带片段时按资源路径匹配，带片段时要求完全一致。
    pub fn find_by_content(&self, content: &str) -> Option<&NavigationPoint> {
        let with_fragment = content.contains('#');
        self.flatten()
            .into_iter()
            .map(|(_, point)| point)
            .find(|point| {
                if with_fragment {
                    point.content() == content
                } else {
                    point.path() == content
                }
            })
    }
}

impl NavigationElement for NavigationTable {
    fn title(&self) -> &str {
        &self.title
    }

    fn children(&self) -> &[NavigationPoint] {
        &self.children
    }

    fn kind(&self) -> ElementKind<'_> {
        ElementKind::Table(self)
    }
}
