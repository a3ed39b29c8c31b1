//! 导航表缓存
//!
//! 第一次查询时加载并解析导航文档，之后所有查询都直接返回缓存结果。
//! 找不到某种类型的导航表也会被缓存；解析失败不会被缓存，下一次查询会重试。

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;

use crate::epub::error::Result;
use crate::epub::nav::{NavigationTable, NavigationType};

/// 某种导航表在缓存中的状态
#[derive(Debug, Clone)]
pub enum CacheState {
    /// 还没有加载过
    NotLoaded,
    /// 已加载，但不存在该类型的导航表
    Absent,
    /// 已加载的导航表
    Present(Arc<NavigationTable>),
}

/// 一个包内已解析的导航表
#[derive(Debug, Default)]
struct LoadedTables {
    /// 按文档顺序排列的类型
    order: Vec<NavigationType>,
    tables: HashMap<NavigationType, Arc<NavigationTable>>,
}

impl LoadedTables {
    fn from_tables(parsed: Vec<NavigationTable>) -> Self {
        let mut loaded = LoadedTables::default();
        for table in parsed {
            let nav_type = table.nav_type().clone();
            if loaded.tables.contains_key(&nav_type) {
                debug!("忽略重复的导航表: {}", nav_type);
                continue;
            }
            loaded.order.push(nav_type.clone());
            loaded.tables.insert(nav_type, Arc::new(table));
        }
        loaded
    }
}

/// 按类型缓存的导航表
///
/// 并发的首次查询只会触发一次加载，所有调用者得到同一个`Arc`。
#[derive(Debug, Default)]
pub struct NavigationCache {
    loaded: OnceCell<LoadedTables>,
}

impl NavigationCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询某种导航表，必要时调用`load`加载
    ///
    /// `load`返回导航文档中的全部导航表；同类型的表只保留第一张。
    /// `load`失败时错误直接返回给调用者，缓存保持未加载状态。
    pub fn get_or_try_load<F>(
        &self,
        nav_type: &NavigationType,
        load: F,
    ) -> Result<Option<Arc<NavigationTable>>>
    where
        F: FnOnce() -> Result<Vec<NavigationTable>>,
    {
        let loaded = self.ensure_loaded(load)?;
        Ok(loaded.tables.get(nav_type).cloned())
    }

    /// 返回全部导航表（文档顺序），必要时调用`load`加载
    pub fn all_or_try_load<F>(&self, load: F) -> Result<Vec<Arc<NavigationTable>>>
    where
        F: FnOnce() -> Result<Vec<NavigationTable>>,
    {
        let loaded = self.ensure_loaded(load)?;
        Ok(loaded
            .order
            .iter()
            .filter_map(|nav_type| loaded.tables.get(nav_type).cloned())
            .collect())
    }

    fn ensure_loaded<F>(&self, load: F) -> Result<&LoadedTables>
    where
        F: FnOnce() -> Result<Vec<NavigationTable>>,
    {
        self.loaded
            .get_or_try_init(|| load().map(LoadedTables::from_tables))
    }

    /// 查看某种导航表的缓存状态，不会触发加载
    pub fn state(&self, nav_type: &NavigationType) -> CacheState {
        match self.loaded.get() {
            None => CacheState::NotLoaded,
            Some(loaded) => match loaded.tables.get(nav_type) {
                Some(table) => CacheState::Present(Arc::clone(table)),
                None => CacheState::Absent,
            },
        }
    }

    /// 是否已经加载过
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}
