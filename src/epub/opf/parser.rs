//! OPF解析器模块
//!
//! 提供OPF（Open Packaging Format）文件的XML解析功能。

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::manifest::ManifestItem;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// OPF文件解析结果
#[derive(Debug, Clone, Default)]
pub struct Opf {
    /// EPUB版本
    pub version: String,
    /// 清单项(按文档顺序)
    pub manifest: Vec<ManifestItem>,
    /// 脊柱的目录引用(NCX的清单ID)
    pub spine_toc: Option<String>,
}

impl Opf {
    /// 解析OPF文件内容
    ///
    /// # 参数
    /// * `xml_content` - OPF文件的XML内容
    ///
    /// # 返回值
    /// * `Result<Opf, EpubError>` - 解析后的OPF信息
    pub fn parse_xml(xml_content: &str) -> Result<Opf> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut opf = Opf::default();
        let mut in_manifest = false;
        let mut open_elements: usize = 0;
        let mut root_seen = false;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    root_seen = true;
                    open_elements += 1;

                    match e.local_name().as_ref() {
                        b"package" => {
                            opf.version = attribute_value(e, b"version")?.unwrap_or_default();
                        }
                        b"manifest" => {
                            in_manifest = true;
                        }
                        b"spine" => {
                            opf.spine_toc = attribute_value(e, b"toc")?;
                        }
                        b"item" if in_manifest => {
                            Self::parse_manifest_item(e, &mut opf.manifest)?;
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    open_elements = open_elements.saturating_sub(1);
                    if e.local_name().as_ref() == b"manifest" {
                        in_manifest = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(EpubError::OpfParseError("OPF文件中没有任何元素".to_string()));
        }
        if open_elements != 0 {
            return Err(EpubError::OpfParseError(format!(
                "OPF文件意外结束，仍有 {} 个元素未闭合",
                open_elements
            )));
        }

        Ok(opf)
    }

    /// 解析清单项
    fn parse_manifest_item(e: &BytesStart, manifest: &mut Vec<ManifestItem>) -> Result<()> {
        let mut item = ManifestItem::new(String::new(), String::new(), String::new());

        for attr_result in e.attributes() {
            let attr = attr_result?;
            match attr.key.local_name().as_ref() {
                b"id" => {
                    item.id = attr.unescape_value()?.into_owned();
                }
                b"href" => {
                    item.href = attr.unescape_value()?.into_owned();
                }
                b"media-type" => {
                    item.media_type = attr.unescape_value()?.into_owned();
                }
                b"properties" => {
                    item.properties = Some(attr.unescape_value()?.into_owned());
                }
                _ => {}
            }
        }

        if !item.id.is_empty() && !item.href.is_empty() && !item.media_type.is_empty() {
            manifest.push(item);
        }

        Ok(())
    }

    /// 包版本的主版本号，无法识别时为None
    pub fn major_version(&self) -> Option<u32> {
        self.version.trim().split('.').next()?.parse().ok()
    }

    /// 根据ID获取清单项
    pub fn get_manifest_item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.id == id)
    }

    /// 获取EPUB3导航文档的清单项
    pub fn nav_item(&self) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.is_nav())
    }

    /// 获取NCX的清单项
    ///
    /// 优先使用脊柱toc属性引用的项目，其次是第一个NCX媒体类型的项目。
    pub fn ncx_item(&self) -> Option<&ManifestItem> {
        self.spine_toc
            .as_deref()
            .and_then(|id| self.get_manifest_item(id))
            .or_else(|| self.manifest.iter().find(|item| item.is_ncx()))
    }
}

/// 读取指定属性的值
fn attribute_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr_result in e.attributes() {
        let attr = attr_result?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPUB3_OPF: &str = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="id">
<metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>Sample Book</dc:title>
</metadata>
<manifest>
<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
<item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
<item id="item1" href="chapter1.xhtml" media-type="application/xhtml+xml"/>
<item id="broken" href="" media-type="application/xhtml+xml"/>
</manifest>
<spine toc="ncx">
<itemref idref="item1"/>
</spine>
</package>"#;

    #[test]
    fn test_basic_opf_structure() {
        let opf = Opf::parse_xml(EPUB3_OPF).expect("解析基本OPF失败");

        assert_eq!(opf.version, "3.0");
        assert_eq!(opf.major_version(), Some(3));
        assert_eq!(opf.manifest.len(), 3);
        assert_eq!(opf.spine_toc.as_deref(), Some("ncx"));
        assert_eq!(opf.nav_item().map(|i| i.href.as_str()), Some("nav.xhtml"));
        assert_eq!(opf.ncx_item().map(|i| i.href.as_str()), Some("toc.ncx"));
    }

    #[test]
    fn test_ncx_found_by_media_type_without_spine_toc() {
        let opf_xml = r#"<package version="2.0"><manifest>
<item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>
<item id="toc" href="nav/toc.ncx" media-type="application/x-dtbncx+xml"/>
</manifest><spine/></package>"#;
        let opf = Opf::parse_xml(opf_xml).unwrap();

        assert_eq!(opf.major_version(), Some(2));
        assert!(opf.spine_toc.is_none());
        assert!(opf.nav_item().is_none());
        assert_eq!(opf.ncx_item().map(|i| i.id.as_str()), Some("toc"));
    }

    #[test]
    fn test_malformed_opf_is_an_error() {
        assert!(Opf::parse_xml("<package><manifest></package>").is_err());
    }

    #[test]
    fn test_truncated_opf_is_an_error() {
        let truncated = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
<manifest>
<item id="s1" href="text/s1.xhtml" media-type="application/xhtml+xml"/>"#;
        assert!(matches!(
            Opf::parse_xml(truncated),
            Err(EpubError::OpfParseError(_))
        ));
        assert!(matches!(Opf::parse_xml(""), Err(EpubError::OpfParseError(_))));
    }
}
