//! Office Open XML package (the `.docx` zip container).

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::xml::{escape, W_NS};
use crate::error::{Error, Result};

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Stylesheet part.
pub const STYLES_PART: &str = "word/styles.xml";

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// One file inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Path inside the zip.
    pub name: String,
    /// Raw bytes.
    pub data: Vec<u8>,
}

/// An in-memory `.docx` package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Read a package from a `.docx` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a zip archive, or
    /// has no main document part.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(Cursor::new(bytes)).map_err(|err| match err {
            Error::Zip(source) => Error::TemplatePackage {
                path: path.to_path_buf(),
                message: source.to_string(),
            },
            Error::TemplatePackage { message, .. } => Error::TemplatePackage {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Read a package from any seekable reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is invalid or has no main document part.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut data)?;
            parts.push(Part { name, data });
        }

        let package = Self { parts };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(Error::TemplatePackage {
                path: "<memory>".into(),
                message: format!("missing {DOCUMENT_PART}"),
            });
        }
        debug!(parts = package.parts.len(), "Read package");
        Ok(package)
    }

    /// The minimal package used when no template is given.
    #[must_use]
    pub fn default_package(created: DateTime<Utc>) -> Self {
        let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
        let parts = vec![
            Part::text(CONTENT_TYPES_PART, CONTENT_TYPES_XML),
            Part::text("_rels/.rels", ROOT_RELS_XML),
            Part::text("docProps/core.xml", &core_xml(&stamp)),
            Part::text(DOCUMENT_PART, &empty_document_xml()),
            Part::text("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
            Part::text(STYLES_PART, &default_styles_xml()),
        ];
        Self { parts }
    }

    /// All parts, in archive order.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Bytes of a part.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// A part decoded as UTF-8 (lossily).
    #[must_use]
    pub fn part_str(&self, name: &str) -> Option<String> {
        self.part(name)
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    /// Replace a part, or add it when absent.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Serialize the package as a `.docx` archive.
    ///
    /// `[Content_Types].xml` is written first.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let ordered = self
            .parts
            .iter()
            .filter(|p| p.name == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|p| p.name != CONTENT_TYPES_PART));
        for part in ordered {
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

impl Part {
    fn text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            data: text.as_bytes().to_vec(),
        }
    }
}

/// Insert body XML into a document part, before the body-level `w:sectPr`
/// when there is one, otherwise right before `</w:body>`.
///
/// # Errors
///
/// Returns an error if the document has no `</w:body>`.
pub fn append_to_body(document_xml: &str, body_xml: &str) -> Result<String> {
    let body_end = document_xml
        .rfind("</w:body>")
        .ok_or_else(|| Error::TemplatePackage {
            path: DOCUMENT_PART.into(),
            message: "document has no </w:body>".to_string(),
        })?;
    let head = &document_xml[..body_end];

    let insert_at = head
        .rfind("<w:sectPr")
        .filter(|&pos| {
            let tail = &head[pos..];
            tail.rfind("</w:sectPr>")
                .is_some_and(|close| tail[close + "</w:sectPr>".len()..].trim().is_empty())
                || (tail.trim_end().ends_with("/>") && !tail.contains("</w:"))
        })
        .unwrap_or(body_end);

    let mut out = String::with_capacity(document_xml.len() + body_xml.len());
    out.push_str(&document_xml[..insert_at]);
    out.push_str(body_xml);
    out.push_str(&document_xml[insert_at..]);
    Ok(out)
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

fn core_xml(stamp: &str) -> String {
    let stamp = escape(stamp);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:creator>docpress</dc:creator><cp:lastModifiedBy>docpress</cp:lastModifiedBy><dc:language>pt-BR</dc:language><dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified></cp:coreProperties>"#
    )
}

fn empty_document_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"><w:body><w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1417" w:right="1701" w:bottom="1417" w:left="1701" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

fn default_styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:lang w:val="pt-BR"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:customStyle="1" w:styleId="DocTitle"><w:name w:val="DocTitle"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="40"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:ind w:left="720"/></w:pPr></w:style><w:style w:type="paragraph" w:customStyle="1" w:styleId="NormalText"><w:name w:val="NormalText"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:jc w:val="both"/></w:pPr></w:style><w:style w:type="paragraph" w:customStyle="1" w:styleId="CodeBlock"><w:name w:val="CodeBlock"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="0"/><w:shd w:val="clear" w:color="auto" w:fill="F2F2F2"/></w:pPr><w:rPr><w:rFonts w:ascii="Consolas" w:hAnsi="Consolas" w:cs="Consolas"/><w:sz w:val="18"/></w:rPr></w:style></w:styles>"#
    )
}
