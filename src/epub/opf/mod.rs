//! OPF（Open Packaging Format）文件解析模块
//!
//! 只解析定位导航文档所需的部分：包版本、清单，以及脊柱的toc属性。

mod manifest;
mod parser;

pub use manifest::ManifestItem;
pub use parser::Opf;
