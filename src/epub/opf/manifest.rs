//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。

use crate::epub::nav::NCX_MEDIA_TYPE;

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: String, href: String, media_type: String) -> Self {
        Self {
            id,
            href,
            media_type,
            properties: None,
        }
    }

    /// 检查是否包含指定属性
    pub fn has_property(&self, property: &str) -> bool {
        if let Some(properties) = &self.properties {
            properties.split_whitespace().any(|p| p == property)
        } else {
            false
        }
    }

    /// 检查是否为EPUB3导航文档
    pub fn is_nav(&self) -> bool {
        self.has_property("nav")
    }

    /// 检查是否为NCX文件
    pub fn is_ncx(&self) -> bool {
        self.media_type == NCX_MEDIA_TYPE
    }
}
