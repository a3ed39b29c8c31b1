use std::fs::File;
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::epub::archive::SharedArchive;
use crate::epub::config::NavigationOptions;
use crate::epub::error::{EpubError, Result};
use crate::epub::package::Package;

const EPUB_MIMETYPE: &str = "application/epub+zip";
const CONTAINER_PATH: &str = "META-INF/container.xml";
const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// 打开的EPUB容器
pub struct Container {
    archive: SharedArchive,
    rootfiles: Vec<RootFile>,
}

impl Container {
    /// 打开EPUB文件
    ///
    /// 会验证mimetype并解析META-INF/container.xml。
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 成功返回容器，失败返回错误
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Container> {
        let file = File::open(path.as_ref())?;
        let archive = SharedArchive::new(ZipArchive::new(file)?);

        validate_mimetype(&archive)?;

        let container_content = archive.read_to_string(CONTAINER_PATH).map_err(|e| match e {
            EpubError::Zip(zip::result::ZipError::FileNotFound) => {
                EpubError::InvalidEpub(format!("缺少{}", CONTAINER_PATH))
            }
            other => other,
        })?;
        let rootfiles = parse_rootfiles(&container_content)?;

        debug!(
            "已打开EPUB容器 {}: {} 个rootfile",
            path.as_ref().display(),
            rootfiles.len()
        );

        Ok(Container { archive, rootfiles })
    }

    /// container.xml中的所有rootfile
    pub fn rootfiles(&self) -> &[RootFile] {
        &self.rootfiles
    }

    /// 获取主要的OPF文件路径
    ///
    /// # 返回值
    /// * `Option<&str>` - OPF文件的完整路径
    pub fn opf_path(&self) -> Option<&str> {
        // 查找第一个application/oebps-package+xml类型的rootfile
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == OPF_MEDIA_TYPE)
            .or_else(|| self.rootfiles.first())
            .map(|rootfile| rootfile.full_path.as_str())
    }

    /// 列出EPUB文件中的所有条目
    pub fn list_files(&self) -> Vec<String> {
        self.archive.file_names()
    }

    /// 以文本形式提取指定文件的内容
    pub fn extract_file(&self, filename: &str) -> Result<String> {
        self.archive.read_to_string(filename)
    }

    /// 打开默认包（第一个OPF rootfile）
    pub fn default_package(&self) -> Result<Package> {
        self.default_package_with_options(NavigationOptions::default())
    }

    /// 使用指定的导航配置打开默认包
    pub fn default_package_with_options(&self, options: NavigationOptions) -> Result<Package> {
        let opf_path = self.opf_path().ok_or_else(|| {
            EpubError::ContainerParseError("container.xml中没有找到有效的rootfile".to_string())
        })?;

        Package::load(self.archive.clone(), opf_path, options)
    }
}

/// 验证EPUB文件的mimetype
fn validate_mimetype(archive: &SharedArchive) -> Result<()> {
    let content = match archive.read_to_string("mimetype") {
        Ok(content) => content,
        Err(EpubError::Zip(zip::result::ZipError::FileNotFound)) => {
            return Err(EpubError::MissingMimetype);
        }
        Err(e) => return Err(e),
    };

    // 去除可能的换行符和空白字符
    let content = content.trim();
    if content != EPUB_MIMETYPE {
        return Err(EpubError::InvalidMimetype {
            expected: EPUB_MIMETYPE.to_string(),
            found: content.to_string(),
        });
    }

    Ok(())
}

/// 解析container.xml内容
///
/// # 参数
/// * `xml_content` - container.xml的文件内容
///
/// # 返回值
/// * `Result<Vec<RootFile>, EpubError>` - 所有rootfile条目
pub fn parse_rootfiles(xml_content: &str) -> Result<Vec<RootFile>> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut rootfiles = Vec::new();
    let mut in_rootfiles = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"rootfiles" => {
                    in_rootfiles = true;
                }
                b"rootfile" if in_rootfiles => {
                    let mut full_path = String::new();
                    let mut media_type = String::new();

                    for attr_result in e.attributes() {
                        let attr = attr_result?;
                        match attr.key.local_name().as_ref() {
                            b"full-path" => {
                                full_path = attr.unescape_value()?.into_owned();
                            }
                            b"media-type" => {
                                media_type = attr.unescape_value()?.into_owned();
                            }
                            _ => {}
                        }
                    }

                    if !full_path.is_empty() && !media_type.is_empty() {
                        rootfiles.push(RootFile {
                            full_path,
                            media_type,
                        });
                    }
                }
                _ => {}
            },
            Event::End(ref e) => {
                if e.local_name().as_ref() == b"rootfiles" {
                    in_rootfiles = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if rootfiles.is_empty() {
        return Err(EpubError::ContainerParseError(
            "没有找到任何rootfile条目".to_string(),
        ));
    }

    Ok(rootfiles)
}
