//! 导航树的文本显示
//!
//! 提供导航表的树形文本渲染和统计信息。

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::epub::nav::{NavigationElement, NavigationPoint, NavigationTable};

/// 导航树显示样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStyle {
    /// 使用树状符号（├── └──）
    TreeSymbols,
    /// 使用缩进和符号（• ）
    Indented,
}

/// 导航表的树形视图
#[derive(Debug, Clone)]
pub struct TreeView<'a> {
    table: &'a NavigationTable,
    style: TreeStyle,
    show_paths: bool,
    max_depth: Option<u32>,
}

impl<'a> TreeView<'a> {
    /// 创建新的树形视图
    pub fn new(table: &'a NavigationTable) -> Self {
        Self {
            table,
            style: TreeStyle::TreeSymbols,
            show_paths: false,
            max_depth: None,
        }
    }

    /// 设置显示样式
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// 设置是否显示内容定位符
    pub fn with_show_paths(mut self, show_paths: bool) -> Self {
        self.show_paths = show_paths;
        self
    }

    /// 设置最大显示深度（None表示显示所有）
    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 获取统计信息
    pub fn statistics(&self) -> NavigationStatistics {
        NavigationStatistics::of(self.table)
    }

    fn label(&self, point: &NavigationPoint) -> String {
        let title = if point.title().is_empty() {
            "(无标题)"
        } else {
            point.title()
        };
        if self.show_paths && point.has_content() {
            format!("{} → {}", title, point.content())
        } else {
            title.to_string()
        }
    }

    fn within_depth(&self, depth: u32) -> bool {
        self.max_depth.is_none_or(|max_depth| depth < max_depth)
    }

    /// 渲染树状符号风格
    fn render_tree_style(
        &self,
        point: &NavigationPoint,
        depth: u32,
        is_last: bool,
        prefix: &str,
        result: &mut String,
    ) {
        if !self.within_depth(depth) {
            return;
        }

        let branch = if is_last { "└── " } else { "├── " };
        result.push_str(&format!("{}{}{}\n", prefix, branch, self.label(point)));

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        let children = point.children();
        for (index, child) in children.iter().enumerate() {
            let is_child_last = index == children.len() - 1;
            self.render_tree_style(child, depth + 1, is_child_last, &child_prefix, result);
        }
    }

    /// 渲染缩进风格
    fn render_indent_style(&self, point: &NavigationPoint, depth: u32, result: &mut String) {
        if !self.within_depth(depth) {
            return;
        }

        let indent = "  ".repeat(depth as usize);
        result.push_str(&format!("{}• {}\n", indent, self.label(point)));

        for child in point.children() {
            self.render_indent_style(child, depth + 1, result);
        }
    }
}

impl Display for TreeView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut result = String::new();

        let heading = if self.table.title().is_empty() {
            format!("[{}]", self.table.nav_type())
        } else {
            format!("[{}] {}", self.table.nav_type(), self.table.title())
        };
        result.push_str(&heading);
        result.push('\n');

        let roots = self.table.children();
        for (index, root) in roots.iter().enumerate() {
            match self.style {
                TreeStyle::TreeSymbols => {
                    let is_last = index == roots.len() - 1;
                    self.render_tree_style(root, 0, is_last, "", &mut result);
                }
                TreeStyle::Indented => {
                    self.render_indent_style(root, 0, &mut result);
                }
            }
        }

        write!(f, "{}", result)
    }
}

/// 导航表统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationStatistics {
    /// 总条目数
    pub total_nodes: usize,
    /// 最大深度
    pub max_depth: u32,
    /// 叶子条目数
    pub leaf_count: usize,
    /// 顶层条目数
    pub root_count: usize,
}

impl NavigationStatistics {
    /// 统计一张导航表
    pub fn of(table: &NavigationTable) -> Self {
        let flat = table.flatten();
        Self {
            total_nodes: flat.len(),
            max_depth: table.depth(),
            leaf_count: flat.iter().filter(|(_, point)| point.is_leaf()).count(),
            root_count: table.children().len(),
        }
    }
}

impl Display for NavigationStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "导航统计: {} 个条目, {} 个顶层条目, {} 个叶子条目, 最大深度: {}",
            self.total_nodes, self.root_count, self.leaf_count, self.max_depth
        )
    }
}
