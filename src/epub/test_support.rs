//! 测试用EPUB文件构造

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::FileOptions;

use crate::epub::error::Result;

pub(crate) const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

pub(crate) const EPUB2_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="2.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>神曲·地狱篇</dc:title>
    </metadata>
    <manifest>
        <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
        <item id="c1" href="text/canto1.xhtml" media-type="application/xhtml+xml"/>
        <item id="c2" href="text/canto2.xhtml" media-type="application/xhtml+xml"/>
        <item id="c3" href="text/canto3.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine toc="ncx">
        <itemref idref="c1"/>
        <itemref idref="c2"/>
        <itemref idref="c3"/>
    </spine>
</package>"#;

pub(crate) const EPUB2_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head><meta name="dtb:uid" content="urn:uuid:dante"/></head>
  <docTitle><text>地狱篇</text></docTitle>
  <navMap>
    <navPoint id="n1" playOrder="1">
      <navLabel><text>第一歌</text></navLabel>
      <content src="text/canto1.xhtml"/>
    </navPoint>
    <navPoint id="n2" playOrder="2">
      <navLabel><text>第二歌</text></navLabel>
      <content src="text/canto2.xhtml"/>
      <navPoint id="n2a" playOrder="3">
        <navLabel><text>序</text></navLabel>
        <content src="text/canto2.xhtml#intro"/>
      </navPoint>
      <navPoint id="n2b" playOrder="4">
        <navLabel><text>正文</text></navLabel>
        <content src="text/canto2.xhtml#body"/>
      </navPoint>
    </navPoint>
    <navPoint id="n3" playOrder="5">
      <navLabel><text>第三歌</text></navLabel>
      <content src="text/canto3.xhtml"/>
    </navPoint>
  </navMap>
</ncx>"#;

pub(crate) const EPUB3_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>儿童文学</dc:title>
    </metadata>
    <manifest>
        <item id="nav" href="nav/nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
        <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
        <item id="s1" href="text/s1.xhtml" media-type="application/xhtml+xml"/>
        <item id="s2" href="text/s2.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine toc="ncx">
        <itemref idref="s1"/>
        <itemref idref="s2"/>
    </spine>
</package>"#;

pub(crate) const EPUB3_NAV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>导航</title></head>
<body>
  <nav epub:type="toc" id="toc">
    <h1>目录</h1>
    <ol>
      <li><a href="../text/s1.xhtml">引言</a></li>
      <li><span>第一部分</span>
        <ol>
          <li><a href="../text/s2.xhtml#c1">第一章</a></li>
          <li><a href="../text/s2.xhtml#c2">第二章</a></li>
        </ol>
      </li>
    </ol>
  </nav>
  <nav epub:type="landmarks" hidden="">
    <ol>
      <li><a epub:type="bodymatter" href="../text/s1.xhtml">正文</a></li>
    </ol>
  </nav>
</body>
</html>"#;

/// 在指定目录创建一个EPUB文件，条目按给定顺序写入
pub(crate) fn write_epub(dir: &Path, name: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
    let path = dir.join(name);
    let file = File::create(&path)?;
    let mut zip = ZipWriter::new(file);

    for (entry_name, content) in entries {
        zip.start_file(*entry_name, FileOptions::<()>::default())?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(path)
}

/// 标准的EPUB2测试文件
pub(crate) fn epub2_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("mimetype", "application/epub+zip"),
        ("META-INF/container.xml", CONTAINER_XML),
        ("OEBPS/content.opf", EPUB2_OPF),
        ("OEBPS/toc.ncx", EPUB2_NCX),
    ]
}

/// 标准的EPUB3测试文件（同时带有NCX）
pub(crate) fn epub3_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("mimetype", "application/epub+zip"),
        ("META-INF/container.xml", CONTAINER_XML),
        ("OEBPS/content.opf", EPUB3_OPF),
        ("OEBPS/nav/nav.xhtml", EPUB3_NAV),
        ("OEBPS/toc.ncx", EPUB2_NCX),
    ]
}
