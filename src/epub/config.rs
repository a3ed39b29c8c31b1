//! 导航解析配置模块
//!
//! 提供导航文档查找和解析的配置，支持从YAML文件加载。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 导航解析配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationOptions {
    /// 同时存在NCX和XHTML导航文档时优先使用NCX
    pub prefer_ncx: bool,
    /// EPUB3导航文档中，没有链接的列表项可以用作标题的元素
    pub heading_elements: Vec<String>,
    /// OPF中找不到NCX时依次尝试的容器内路径
    pub ncx_fallback_paths: Vec<String>,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            prefer_ncx: false,
            heading_elements: ["span", "h1", "h2", "h3", "h4", "h5", "h6"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            ncx_fallback_paths: ["OEBPS/toc.ncx", "EPUB/toc.ncx", "toc.ncx", "content/toc.ncx"]
                .iter()
                .map(|path| path.to_string())
                .collect(),
        }
    }
}

impl NavigationOptions {
    /// 从YAML配置文件加载
    ///
    /// 文件中缺少的字段使用默认值。
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// 从YAML文本解析
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 生成默认配置文件
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# 导航解析配置文件\n# prefer_ncx: 同时存在NCX和导航文档时是否优先使用NCX\n# heading_elements: 导航文档中可作为分组标题的元素\n# ncx_fallback_paths: OPF中找不到NCX时尝试的路径\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
