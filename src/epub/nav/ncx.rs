//! NCX（EPUB2导航控制文件）解析
//!
//! 只构建navMap对应的目录表；pageList、navList等扩展列表被忽略。
//! 条目顺序严格按照文件中的出现顺序，playOrder只作为信息保留。

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::epub::error::{EpubError, Result};
use crate::epub::nav::{
    NavigationElement, NavigationPoint, NavigationTable, NavigationType, collapse_whitespace,
};

/// 解析中的导航点
struct PendingPoint {
    point: NavigationPoint,
    /// 是否已经取得第一个navLabel
    labelled: bool,
    /// 是否已经取得第一个content
    has_source: bool,
}

/// 解析NCX文档，返回目录表
///
/// # 参数
/// * `document` - NCX文件的XML内容
/// * `base_path` - NCX文件所在目录（容器内路径），用于解析content的src
///
/// # 返回值
/// * `Result<NavigationTable>` - 类型为目录的导航表；没有navMap时为空表
pub fn parse_epub2(document: &str, base_path: &str) -> Result<NavigationTable> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut table = NavigationTable::new(NavigationType::TableOfContents, base_path);

    let mut open_elements: usize = 0;
    let mut root_seen = false;
    let mut in_nav_map = false;
    let mut in_doc_title = false;
    let mut in_label = false;
    let mut in_text = false;
    let mut text_content = String::new();
    let mut stack: Vec<PendingPoint> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                if !root_seen {
                    root_seen = true;
                    if e.local_name().as_ref() != b"ncx" {
                        warn!(
                            "NCX文档的根元素不是ncx: {}",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        );
                    }
                }
                open_elements += 1;

                match e.local_name().as_ref() {
                    b"navMap" => {
                        in_nav_map = true;
                    }
                    b"docTitle" if !in_nav_map => {
                        in_doc_title = true;
                    }
                    b"navPoint" if in_nav_map => {
                        stack.push(parse_nav_point_start(e)?);
                    }
                    b"navLabel" if in_nav_map && !stack.is_empty() => {
                        in_label = true;
                    }
                    b"text" => {
                        in_text = true;
                        text_content.clear();
                    }
                    b"content" if in_nav_map => {
                        if let Some(pending) = stack.last_mut() {
                            if !pending.has_source {
                                let src = attribute_value(e, b"src")?.unwrap_or_default();
                                pending.point.set_content(table.resolve(&src));
                                pending.has_source = true;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                open_elements = open_elements.saturating_sub(1);

                match e.local_name().as_ref() {
                    b"text" => {
                        in_text = false;
                        if in_label {
                            if let Some(pending) = stack.last_mut() {
                                if !pending.labelled {
                                    pending.point.set_title(collapse_whitespace(&text_content));
                                    pending.labelled = true;
                                }
                            }
                        } else if in_doc_title {
                            table.set_title(collapse_whitespace(&text_content));
                        }
                    }
                    b"navLabel" => {
                        in_label = false;
                        // navLabel里没有text时同样算作已取得标签
                        if let Some(pending) = stack.last_mut() {
                            pending.labelled = true;
                        }
                    }
                    b"docTitle" => {
                        in_doc_title = false;
                    }
                    b"navPoint" if in_nav_map => {
                        if let Some(pending) = stack.pop() {
                            if !pending.labelled {
                                warn!("navPoint缺少navLabel，使用空标题: {:?}", pending.point.id());
                            }
                            match stack.last_mut() {
                                Some(parent) => parent.point.add_child(pending.point),
                                None => table.add_child(pending.point),
                            }
                        }
                    }
                    b"navMap" => {
                        in_nav_map = false;
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                if in_text {
                    text_content.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if in_text {
                    text_content.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(EpubError::NavParseError("NCX文档中没有任何元素".to_string()));
    }
    if open_elements != 0 {
        return Err(EpubError::NavParseError(format!(
            "NCX文档意外结束，仍有 {} 个元素未闭合",
            open_elements
        )));
    }

    debug!(
        "NCX解析完成: {} 个顶层条目, 共 {} 个条目",
        table.children().len(),
        table.flatten().len()
    );

    Ok(table)
}

/// 解析navPoint元素的属性
fn parse_nav_point_start(e: &BytesStart) -> Result<PendingPoint> {
    let mut id = None;
    let mut play_order = None;
    let mut class = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        match attr.key.local_name().as_ref() {
            b"id" => {
                id = Some(attr.unescape_value()?.into_owned());
            }
            b"playOrder" => {
                play_order = attr.unescape_value()?.trim().parse().ok();
            }
            b"class" => {
                class = Some(attr.unescape_value()?.into_owned());
            }
            _ => {}
        }
    }

    Ok(PendingPoint {
        point: NavigationPoint::new(String::new(), String::new())
            .with_id(id)
            .with_play_order(play_order)
            .with_point_type(class),
        labelled: false,
        has_source: false,
    })
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

    const NESTED_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="urn:uuid:1234"/>
    <meta name="dtb:depth" content="2"/>
  </head>
  <docTitle><text>地狱篇</text></docTitle>
  <navMap>
    <navPoint id="np1" playOrder="1">
      <navLabel><text>第一歌</text></navLabel>
      <content src="text/canto1.xhtml"/>
    </navPoint>
    <navPoint id="np2" playOrder="2" class="chapter">
      <navLabel><text>第二歌</text></navLabel>
      <content src="text/canto2.xhtml"/>
      <navPoint id="np3" playOrder="3">
        <navLabel><text>第一节</text></navLabel>
        <content src="text/canto2.xhtml#s1"/>
      </navPoint>
      <navPoint id="np4" playOrder="4">
        <navLabel><text>第二节</text></navLabel>
        <content src="text/canto2.xhtml#s2"/>
      </navPoint>
    </navPoint>
    <navPoint id="np5" playOrder="5">
      <navLabel><text>第三歌</text></navLabel>
      <content src="text/canto3.xhtml"/>
    </navPoint>
  </navMap>
  <pageList>
    <pageTarget id="p1" type="normal" value="1" playOrder="6">
      <navLabel><text>1</text></navLabel>
      <content src="text/canto1.xhtml#page1"/>
    </pageTarget>
  </pageList>
</ncx>"#;

    #[test]
    fn test_nested_structure() {
        let table = parse_epub2(NESTED_NCX, "OEBPS/").unwrap();

        assert_eq!(table.nav_type(), &NavigationType::TableOfContents);
        assert_eq!(table.title(), "地狱篇");
        assert_eq!(table.children().len(), 3);

        let second = &table.children()[1];
        assert_eq!(second.title(), "第二歌");
        assert_eq!(second.content(), "OEBPS/text/canto2.xhtml");
        assert_eq!(second.point_type(), Some("chapter"));
        assert_eq!(second.children().len(), 2);
        assert_eq!(second.children()[0].title(), "第一节");
        assert_eq!(second.children()[0].content(), "OEBPS/text/canto2.xhtml#s1");
        assert_eq!(second.children()[1].title(), "第二节");

        // pageList不会混入目录
        assert!(table.find_by_id("p1").is_none());
    }

    #[test]
    fn test_document_order_wins_over_play_order() {
        let ncx = r#"<ncx><navMap>
            <navPoint id="b" playOrder="2"><navLabel><text>B</text></navLabel><content src="b.xhtml"/></navPoint>
            <navPoint id="a" playOrder="1"><navLabel><text>A</text></navLabel><content src="a.xhtml"/></navPoint>
        </navMap></ncx>"#;
        let table = parse_epub2(ncx, "").unwrap();

        let titles: Vec<&str> = table.children().iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(table.children()[0].play_order(), Some(2));
        assert_eq!(table.children()[1].id(), Some("a"));
    }

    #[test]
    fn test_missing_label_yields_empty_title() {
        let ncx = r#"<ncx><navMap>
            <navPoint id="x"><content src="x.xhtml"/></navPoint>
            <navPoint id="y"><navLabel><text>Y</text></navLabel><content src="y.xhtml"/></navPoint>
        </navMap></ncx>"#;
        let table = parse_epub2(ncx, "OEBPS").unwrap();

        assert_eq!(table.children().len(), 2);
        assert_eq!(table.children()[0].title(), "");
        assert_eq!(table.children()[0].content(), "OEBPS/x.xhtml");
        assert_eq!(table.children()[1].title(), "Y");
    }

    #[test]
    fn test_missing_or_empty_src_is_kept() {
        let ncx = r#"<ncx><navMap>
            <navPoint><navLabel><text>无链接</text></navLabel></navPoint>
            <navPoint><navLabel><text>空链接</text></navLabel><content src=""/></navPoint>
        </navMap></ncx>"#;
        let table = parse_epub2(ncx, "OEBPS/").unwrap();

        assert_eq!(table.children().len(), 2);
        assert!(table.children().iter().all(|p| !p.has_content()));
    }

    #[test]
    fn test_only_first_label_is_used() {
        let ncx = r#"<ncx><navMap>
            <navPoint>
              <navLabel><text>  第一个
                 标签 </text></navLabel>
              <navLabel xml:lang="en"><text>Second</text></navLabel>
              <content src="a.xhtml"/>
            </navPoint>
        </navMap></ncx>"#;
        let table = parse_epub2(ncx, "").unwrap();
        assert_eq!(table.children()[0].title(), "第一个 标签");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let ncx = r#"<ncx><navMap>
            <navPoint><navLabel><text>Tom &amp; Jerry</text></navLabel><content src="a.xhtml?x=1&amp;y=2"/></navPoint>
        </navMap></ncx>"#;
        let table = parse_epub2(ncx, "").unwrap();
        assert_eq!(table.children()[0].title(), "Tom & Jerry");
        assert_eq!(table.children()[0].content(), "a.xhtml?x=1&y=2");
    }

    #[test]
    fn test_no_nav_map_yields_empty_table() {
        let table = parse_epub2(r#"<ncx><head/></ncx>"#, "").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let mismatched = r#"<ncx><navMap><navPoint></navMap></ncx>"#;
        assert!(parse_epub2(mismatched, "").is_err());

        let unclosed = r#"<ncx><navMap><navPoint><navLabel><text>A</text></navLabel>"#;
        assert!(matches!(
            parse_epub2(unclosed, ""),
            Err(EpubError::NavParseError(_)) | Err(EpubError::XmlError(_))
        ));

        assert!(matches!(parse_epub2("", ""), Err(EpubError::NavParseError(_))));
    }
}
