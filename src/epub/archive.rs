//! 共享的zip归档
//!
//! 读取zip条目需要可变借用，多个包和并发的导航查询通过互斥锁共享同一个归档。

use std::fs::File;
use std::io::Read;
use std::sync::Arc;

use parking_lot::Mutex;
use zip::ZipArchive;

use crate::epub::error::Result;

/// 可在线程间共享的EPUB归档
#[derive(Clone)]
pub(crate) struct SharedArchive {
    inner: Arc<Mutex<ZipArchive<File>>>,
}

impl SharedArchive {
    pub(crate) fn new(archive: ZipArchive<File>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(archive)),
        }
    }

    /// 列出归档中的所有条目
    pub(crate) fn file_names(&self) -> Vec<String> {
        self.inner.lock().file_names().map(str::to_string).collect()
    }

    /// 归档中是否存在指定条目
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.inner.lock().index_for_name(name).is_some()
    }

    /// 以文本形式读取指定条目，去掉开头的BOM
    pub(crate) fn read_to_string(&self, name: &str) -> Result<String> {
        let mut archive = self.inner.lock();
        let mut file = archive.by_name(name)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;

        match content.strip_prefix('\u{feff}') {
            Some(stripped) => Ok(stripped.to_string()),
            None => Ok(content),
        }
    }
}
