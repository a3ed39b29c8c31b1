//! 包（rendition）模块
//!
//! 一个包对应容器中的一个OPF文件。导航表在第一次查询时才解析，
//! 之后的查询直接返回缓存的结果。

use std::sync::Arc;

use log::{debug, warn};
use zip::result::ZipError;

use crate::epub::archive::SharedArchive;
use crate::epub::config::NavigationOptions;
use crate::epub::error::{EpubError, Result};
use crate::epub::nav::{
    CacheState, NavDialect, NavigationCache, NavigationTable, NavigationType, locator,
};
use crate::epub::opf::{ManifestItem, Opf};

/// 导航文档的位置和方言
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSource {
    /// 文档方言
    pub dialect: NavDialect,
    /// 文档在容器内的完整路径
    pub path: String,
}

impl NavigationSource {
    /// 导航文档所在目录，用作相对引用的基础路径
    pub fn base_path(&self) -> String {
        locator::parent_dir(&self.path)
    }
}

/// EPUB包
pub struct Package {
    archive: SharedArchive,
    opf_path: String,
    opf: Opf,
    options: NavigationOptions,
    navigation: NavigationCache,
}

impl Package {
    /// 从归档中读取并解析OPF文件
    pub(crate) fn load(
        archive: SharedArchive,
        opf_path: &str,
        options: NavigationOptions,
    ) -> Result<Package> {
        let opf_content = archive.read_to_string(opf_path)?;
        let opf = Opf::parse_xml(&opf_content).map_err(|e| match e {
            EpubError::XmlError(xml_error) => {
                EpubError::OpfParseError(format!("{}: {}", opf_path, xml_error))
            }
            other => other,
        })?;

        debug!(
            "已加载包 {} (版本 {}, {} 个清单项)",
            opf_path,
            opf.version,
            opf.manifest.len()
        );

        Ok(Package {
            archive,
            opf_path: opf_path.to_string(),
            opf,
            options,
            navigation: NavigationCache::new(),
        })
    }

    /// OPF文件在容器内的路径
    pub fn opf_path(&self) -> &str {
        &self.opf_path
    }

    /// 解析后的OPF信息
    pub fn opf(&self) -> &Opf {
        &self.opf
    }

    /// 包声明的EPUB版本
    pub fn version(&self) -> &str {
        &self.opf.version
    }

    /// OPF文件所在目录，清单中的href相对于它
    pub fn base_path(&self) -> String {
        locator::parent_dir(&self.opf_path)
    }

    fn source_for(&self, dialect: NavDialect, item: &ManifestItem) -> NavigationSource {
        let resolved = locator::resolve(&self.base_path(), &item.href);
        let (path, _) = locator::split_fragment(&resolved);
        NavigationSource {
            dialect,
            path: path.to_string(),
        }
    }

    /// 查找导航文档
    ///
    /// 版本3及以上且有`nav`清单项时使用XHTML导航文档（除非配置了优先NCX）；
    /// 否则使用脊柱toc引用的NCX或任意NCX清单项；再否则使用`nav`清单项；
    /// 最后依次尝试配置的NCX备用路径。都找不到时返回None。
    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.navigation_candidates().into_iter().next()
    }

    /// 按优先级排列的全部候选导航文档
    ///
    /// 清单引用的文件可能不在归档中，加载时依次尝试。
    fn navigation_candidates(&self) -> Vec<NavigationSource> {
        let nav = self
            .opf
            .nav_item()
            .map(|item| self.source_for(NavDialect::XhtmlNav, item));
        let ncx = self
            .opf
            .ncx_item()
            .map(|item| self.source_for(NavDialect::Ncx, item));
        let epub3 = self.opf.major_version().is_some_and(|major| major >= 3);

        let mut candidates = Vec::new();
        if epub3 && !self.options.prefer_ncx {
            candidates.extend(nav.clone());
        }
        candidates.extend(ncx);
        candidates.extend(nav);

        let fallbacks = self
            .options
            .ncx_fallback_paths
            .iter()
            .filter(|path| self.archive.contains(path))
            .map(|path| NavigationSource {
                dialect: NavDialect::Ncx,
                path: path.clone(),
            });
        candidates.extend(fallbacks);

        let mut seen = Vec::new();
        candidates.retain(|source| {
            if seen.contains(&source.path) {
                false
            } else {
                seen.push(source.path.clone());
                true
            }
        });
        candidates
    }

    /// 读取导航文档
    ///
    /// # 返回值
    /// * `Result<(String, String)>` - (文档内容, 基础路径)
    pub fn navigation_document(&self, source: &NavigationSource) -> Result<(String, String)> {
        let document = self.archive.read_to_string(&source.path)?;
        Ok((document, source.base_path()))
    }

    /// 加载并解析导航文档中的全部导航表
    ///
    /// 候选文件不存在时尝试下一个；解析失败直接返回错误。
    fn load_navigation(&self) -> Result<Vec<NavigationTable>> {
        for source in self.navigation_candidates() {
            let (document, base_path) = match self.navigation_document(&source) {
                Ok(loaded) => loaded,
                Err(EpubError::Zip(ZipError::FileNotFound)) => {
                    warn!("清单中的导航文档不存在: {}", source.path);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let parser = source.dialect.parser(&self.options);
            let tables = parser.parse(&document, &base_path)?;

            debug!(
                "已解析{}导航文档 {}: {} 张导航表",
                parser.dialect(),
                source.path,
                tables.len()
            );

            return Ok(tables);
        }

        debug!("包 {} 中没有可用的导航文档", self.opf_path);
        Ok(Vec::new())
    }

    /// 查询指定类型的导航表
    ///
    /// 不存在时返回`Ok(None)`；导航文档损坏时返回错误，下一次查询会重新解析。
    pub fn navigation_table(
        &self,
        nav_type: &NavigationType,
    ) -> Result<Option<Arc<NavigationTable>>> {
        self.navigation.get_or_try_load(nav_type, || self.load_navigation())
    }

    /// 目录
    pub fn table_of_contents(&self) -> Result<Option<Arc<NavigationTable>>> {
        self.navigation_table(&NavigationType::TableOfContents)
    }

    /// 页码列表
    pub fn page_list(&self) -> Result<Option<Arc<NavigationTable>>> {
        self.navigation_table(&NavigationType::PageList)
    }

    /// 地标
    pub fn landmarks(&self) -> Result<Option<Arc<NavigationTable>>> {
        self.navigation_table(&NavigationType::Landmarks)
    }

    /// 全部导航表，按文档顺序
    pub fn navigation_tables(&self) -> Result<Vec<Arc<NavigationTable>>> {
        self.navigation.all_or_try_load(|| self.load_navigation())
    }

    /// 指定类型导航表的缓存状态，不会触发解析
    pub fn navigation_state(&self, nav_type: &NavigationType) -> CacheState {
        self.navigation.state(nav_type)
    }
}
