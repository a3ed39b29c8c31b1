//! 内容定位符解析
//!
//! 导航文档中的引用是相对于导航文档所在目录的URL。这里把它们解析为容器内的路径，
//! 并保留片段标识。

use percent_encoding::percent_decode_str;

/// 把引用拆分为(路径, 片段)
pub fn split_fragment(href: &str) -> (&str, Option<&str>) {
    match href.find('#') {
        Some(pos) => (&href[..pos], Some(&href[pos + 1..])),
        None => (href, None),
    }
}

/// 取得一个容器内路径所在的目录（带结尾的`/`，根目录为空串）
pub fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(pos) => path[..=pos].to_string(),
        None => String::new(),
    }
}

/// 是否为带scheme的绝对URL（如`http:`、`mailto:`）
fn has_scheme(href: &str) -> bool {
    let end = href.find(['/', '?', '#']).unwrap_or(href.len());
    match href[..end].find(':') {
        Some(pos) if pos > 0 => href[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// 基于基础路径解析引用
///
/// * 空引用返回空串
/// * 带scheme的绝对URL和只有片段的引用原样返回
/// * 以`/`开头的路径视为容器根路径
/// * 路径部分会做百分号解码，并消去`.`和`..`；越过根目录的`..`被忽略
pub fn resolve(base_path: &str, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() || has_scheme(href) {
        return href.to_string();
    }

    let (path, fragment) = split_fragment(href);
    if path.is_empty() {
        return href.to_string();
    }

    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let joined = if let Some(stripped) = decoded.strip_prefix('/') {
        stripped.to_string()
    } else {
        format!("{}{}", parent_dir_of_base(base_path), decoded)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut resolved = segments.join("/");
    if let Some(fragment) = fragment {
        resolved.push('#');
        resolved.push_str(fragment);
    }
    resolved
}

/// 基础路径可能不带结尾的`/`，统一补上
fn parent_dir_of_base(base_path: &str) -> String {
    let base = base_path.trim();
    if base.is_empty() || base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve("OEBPS/", "text/ch1.xhtml"), "OEBPS/text/ch1.xhtml");
        assert_eq!(resolve("OEBPS", "text/ch1.xhtml"), "OEBPS/text/ch1.xhtml");
        assert_eq!(resolve("", "ch1.xhtml#top"), "ch1.xhtml#top");
    }

    #[test]
    fn test_resolve_dot_segments() {
        assert_eq!(resolve("OEBPS/nav/", "../Text/ch1.xhtml#s2"), "OEBPS/Text/ch1.xhtml#s2");
        assert_eq!(resolve("OEBPS/", "./ch1.xhtml"), "OEBPS/ch1.xhtml");
        assert_eq!(resolve("OEBPS/", "../../ch1.xhtml"), "ch1.xhtml");
    }

    #[test]
    fn test_resolve_keeps_special_references() {
        assert_eq!(resolve("OEBPS/", ""), "");
        assert_eq!(resolve("OEBPS/", "   "), "");
        assert_eq!(resolve("OEBPS/", "#anchor"), "#anchor");
        assert_eq!(resolve("OEBPS/", "http://example.com/a.html"), "http://example.com/a.html");
        assert_eq!(resolve("OEBPS/", "mailto:someone@example.com"), "mailto:someone@example.com");
    }

    #[test]
    fn test_resolve_root_and_percent_decoding() {
        assert_eq!(resolve("OEBPS/", "/Images/cover.xhtml"), "Images/cover.xhtml");
        assert_eq!(resolve("OEBPS/", "chapter%201.xhtml#p%201"), "OEBPS/chapter 1.xhtml#p%201");
    }

    #[test]
    fn test_resolved_paths_have_no_dot_segments() {
        for href in ["a/./b/../c.xhtml", "../x.xhtml", "./y/z.xhtml#f"] {
            let resolved = resolve("OEBPS/text/", href);
            let (path, _) = split_fragment(&resolved);
            assert!(
                path.split('/').all(|s| s != "." && s != ".." && !s.is_empty()),
                "{}",
                resolved
            );
        }
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("OEBPS/toc.ncx"), "OEBPS/");
        assert_eq!(parent_dir("toc.ncx"), "");
        assert_eq!(parent_dir("a/b/nav.xhtml"), "a/b/");
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("a.xhtml#x"), ("a.xhtml", Some("x")));
        assert_eq!(split_fragment("a.xhtml"), ("a.xhtml", None));
        assert_eq!(split_fragment("#x"), ("", Some("x")));
    }
}
