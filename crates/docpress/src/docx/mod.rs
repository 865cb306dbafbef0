//! Word export.
//!
//! Renders a template document (assistant Markdown) together with the source
//! file it describes into a styled `.docx`. When a template package is given,
//! its parts and existing body are kept and the generated paragraphs are
//! appended; otherwise a minimal package with the default styles is used.
//!
//! Layout:
//!
//! 1. Title (`Título`, or the source file name when absent).
//! 2. Every non-empty section, in template order, under a level-2 heading.
//!    `- ` items of list sections become bulleted list paragraphs; the fenced
//!    code of `Exemplo de Uso` becomes code paragraphs.
//! 3. An extra `Exemplo de Uso` with the first fenced block of the whole
//!    document when that section exists but has no fences of its own.
//! 4. Optionally, the full source file as an appendix.

mod package;
mod styles;
mod xml;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

pub use package::{append_to_body, Package, Part, DOCUMENT_PART, STYLES_PART};
pub use styles::{StyleEntry, StyleSheet};
pub use xml::{escape, Inline, Paragraph};

use crate::config::{BuildConfig, StyleConfig};
use crate::error::{Error, Result};
use crate::markdown::{extract_fenced_code, list_items, Document, ListItem};
use crate::template::Section;

/// Style used for the title when the configured title style is missing.
const TITLE_FALLBACK_STYLE: &str = "heading 1";

/// Marker run placed before each top-level bulleted item.
const BULLET: &str = "• ";

/// Marker run for nested bulleted items.
const SUB_BULLET: &str = "◦ ";

/// Inputs of a single export.
#[derive(Debug, Clone, Copy)]
pub struct BuildInput<'a> {
    /// Assistant output in template form.
    pub markdown: &'a str,
    /// Full text of the documented source file.
    pub source: &'a str,
    /// File name of the source, used as the fallback title.
    pub source_name: &'a str,
}

/// Paragraph style ids resolved against a package's stylesheet.
#[derive(Debug, Clone, Default)]
struct ResolvedStyles {
    title: Option<String>,
    heading: Option<String>,
    list: Option<String>,
    body: Option<String>,
    code: Option<String>,
}

impl ResolvedStyles {
    fn resolve(sheet: &StyleSheet, config: &StyleConfig) -> Self {
        let lookup = |name: &str| {
            let id = sheet.resolve(name).map(String::from);
            if id.is_none() {
                debug!(style = %name, "Style not found in template, using default");
            }
            id
        };

        Self {
            title: lookup(&config.title).or_else(|| lookup(TITLE_FALLBACK_STYLE)),
            heading: lookup(&config.heading),
            list: lookup(&config.list),
            body: lookup(&config.body),
            code: lookup(&config.code),
        }
    }
}

/// Builds `.docx` documents from template Markdown.
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    styles: StyleConfig,
    include_source: bool,
    source_heading: String,
    template: Option<PathBuf>,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self::new(StyleConfig::default(), &BuildConfig::default())
    }
}

impl DocxBuilder {
    /// Create a builder from configuration.
    #[must_use]
    pub fn new(styles: StyleConfig, build: &BuildConfig) -> Self {
        Self {
            styles,
            include_source: build.include_source,
            source_heading: build.source_heading.clone(),
            template: build.template.clone(),
        }
    }

    /// Use a template `.docx` as the base package.
    #[must_use]
    pub fn with_template(mut self, template: Option<PathBuf>) -> Self {
        if template.is_some() {
            self.template = template;
        }
        self
    }

    /// Whether to append the source file.
    #[must_use]
    pub fn include_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    /// The template in use, if any.
    #[must_use]
    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    /// Lay out the paragraphs for a document, using the given stylesheet.
    #[must_use]
    pub fn paragraphs(&self, input: &BuildInput<'_>, sheet: &StyleSheet) -> Vec<Paragraph> {
        let styles = ResolvedStyles::resolve(sheet, &self.styles);
        let doc = Document::parse(input.markdown);
        let mut out = Vec::new();

        let title = doc
            .body(Section::Title)
            .map_or_else(|| input.source_name.to_string(), |t| t.replace('\n', " "));
        out.push(Paragraph::new(styles.title.as_deref()).run(&title, styles.title.is_none()));

        for section in Section::ALL {
            let Some(content) = doc.body(section) else {
                continue;
            };
            out.push(heading(&styles, section.label()));

            if section.renders_as_list() {
                let items = list_items(content);
                if items.is_empty() {
                    out.push(Paragraph::text(styles.body.as_deref(), content));
                } else {
                    out.extend(items.iter().map(|item| list_paragraph(&styles, item)));
                }
            } else if let Some(code) = (section == Section::UsageExample)
                .then(|| extract_fenced_code(content))
                .flatten()
            {
                out.extend(code_paragraphs(&styles, &code));
            } else {
                out.push(Paragraph::text(styles.body.as_deref(), content));
            }
        }

        let example_has_code = doc
            .get(Section::UsageExample)
            .map(|s| extract_fenced_code(&s.body).is_some());
        if example_has_code == Some(false) {
            if let Some(code) = extract_fenced_code(input.markdown) {
                debug!("Using first fenced block of the document as usage example");
                out.push(heading(&styles, Section::UsageExample.label()));
                out.extend(code_paragraphs(&styles, &code));
            }
        }

        if self.include_source {
            out.push(heading(&styles, &self.source_heading));
            out.extend(code_paragraphs(&styles, input.source));
        }

        out
    }

    /// Build the `.docx` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be read or is not a valid
    /// package, or if the archive cannot be written.
    pub fn build(&self, input: &BuildInput<'_>) -> Result<Vec<u8>> {
        let mut package = match &self.template {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found("template", path));
                }
                debug!("Using template {}", path.display());
                Package::open(path)?
            }
            None => Package::default_package(Utc::now()),
        };

        let sheet = package
            .part_str(STYLES_PART)
            .map(|xml| StyleSheet::parse(&xml))
            .unwrap_or_default();
        if sheet.is_empty() {
            warn!("Template declares no styles; paragraphs will use the document default");
        }

        let paragraphs = self.paragraphs(input, &sheet);
        let body: String = paragraphs.iter().map(Paragraph::to_xml).collect();
        let document = package
            .part_str(DOCUMENT_PART)
            .ok_or_else(|| Error::TemplatePackage {
                path: self.template.clone().unwrap_or_default(),
                message: format!("missing {DOCUMENT_PART}"),
            })?;
        let document = append_to_body(&document, &body)?;
        package.set_part(DOCUMENT_PART, document.into_bytes());

        debug!(paragraphs = paragraphs.len(), "Rendered document body");
        package.to_bytes()
    }

    /// Build the document and write it to `out`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if building fails or the file cannot be written.
    pub fn write(&self, input: &BuildInput<'_>, out: &Path) -> Result<()> {
        let bytes = self.build(input)?;

        if let Some(parent) = out.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        std::fs::write(out, &bytes).map_err(|source| Error::WriteFile {
            path: out.to_path_buf(),
            source,
        })?;
        info!("Document written to {}", out.display());
        Ok(())
    }
}

/// Nested items are indented with one tab per level.
fn list_paragraph(styles: &ResolvedStyles, item: &ListItem) -> Paragraph {
    let marker = match (item.number, item.depth) {
        (Some(n), _) => format!("{n}. "),
        (None, 0) => BULLET.to_string(),
        (None, _) => SUB_BULLET.to_string(),
    };
    Paragraph::new(styles.list.as_deref())
        .run(&format!("{}{marker}", "\t".repeat(item.depth)), true)
        .run(&item.text, false)
}

fn heading(styles: &ResolvedStyles, text: &str) -> Paragraph {
    Paragraph::new(styles.heading.as_deref()).run(text, styles.heading.is_none())
}

fn code_paragraphs(styles: &ResolvedStyles, code: &str) -> Vec<Paragraph> {
    code.replace("\r\n", "\n")
        .split('\n')
        .map(|line| {
            let line = if line.is_empty() { " " } else { line };
            Paragraph::new(styles.code.as_deref()).run(line, false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const MARKDOWN: &str = "\
### Título:
conversor.py

### Descrição:
Converte Markdown em Word & PDF.

### Entradas:
- md (Path): arquivo de entrada
- out (Path): arquivo de saída

### Saídas:
None: grava o documento

### Fluxo de Execução:
1. Lê
2. Escreve

### Dependências:
- zip

### Erros Comuns:
Nenhum conhecido.

### Exemplo de Uso:
```bash
conversor --md a.md

conversor --help
```
";

    fn input<'a>(markdown: &'a str) -> BuildInput<'a> {
        BuildInput {
            markdown,
            source: "print('olá')\n\nprint(1 < 2)",
            source_name: "conversor.py",
        }
    }

    fn default_sheet() -> StyleSheet {
        let package = Package::default_package(Utc::now());
        StyleSheet::parse(&package.part_str(STYLES_PART).unwrap())
    }

    fn texts(paragraphs: &[Paragraph]) -> Vec<String> {
        paragraphs.iter().map(Paragraph::plain_text).collect()
    }

    #[test]
    fn test_layout_order() {
        let builder = DocxBuilder::default();
        let paragraphs = builder.paragraphs(&input(MARKDOWN), &default_sheet());
        let texts = texts(&paragraphs);

        assert_eq!(texts[0], "conversor.py");
        let headings: Vec<_> = paragraphs
            .iter()
            .filter(|p| p.style.as_deref() == Some("Heading2"))
            .map(Paragraph::plain_text)
            .collect();
        let mut expected: Vec<String> = Section::ALL.iter().map(|s| s.label().to_string()).collect();
        expected.push("Código-Fonte (Anexo)".to_string());
        assert_eq!(headings, expected);
    }

    #[test]
    fn test_title_uses_doc_title_style() {
        let builder = DocxBuilder::default();
        let paragraphs = builder.paragraphs(&input(MARKDOWN), &default_sheet());
        assert_eq!(paragraphs[0].style.as_deref(), Some("DocTitle"));
    }

    #[test]
    fn test_title_falls_back_to_source_name_and_heading_one() {
        let builder = DocxBuilder::new(
            StyleConfig {
                title: "Missing".to_string(),
                ..StyleConfig::default()
            },
            &BuildConfig::default(),
        );
        let paragraphs = builder.paragraphs(&input("### Descrição:\nx"), &default_sheet());
        assert_eq!(paragraphs[0].plain_text(), "conversor.py");
        assert_eq!(paragraphs[0].style.as_deref(), Some("Heading1"));
    }

    #[test]
    fn test_list_items_get_bullets() {
        let builder = DocxBuilder::default();
        let paragraphs = builder.paragraphs(&input(MARKDOWN), &default_sheet());
        let item = paragraphs
            .iter()
            .find(|p| p.plain_text() == "• md (Path): arquivo de entrada")
            .unwrap();
        assert_eq!(item.style.as_deref(), Some("ListParagraph"));
        assert_eq!(
            item.inlines[0],
            Inline::Text {
                text: BULLET.to_string(),
                bold: true
            }
        );
    }

    #[test]
    fn test_nested_list_items_are_indented() {
        let markdown = MARKDOWN.replace(
            "- md (Path): arquivo de entrada\n",
            "- md (Path): arquivo de entrada\n  - aceita `.md` e `.txt`\n",
        );
        let builder = DocxBuilder::default();
        let paragraphs = builder.paragraphs(&input(&markdown), &default_sheet());
        let texts = texts(&paragraphs);
        let parent = texts
            .iter()
            .position(|t| t == "• md (Path): arquivo de entrada")
            .unwrap();
        assert_eq!(texts[parent + 1], "\t◦ aceita `.md` e `.txt`");
        assert_eq!(texts[parent + 2], "• out (Path): arquivo de saída");
    }

    #[test]
    fn test_list_section_without_items_is_body_text() {
        let builder = DocxBuilder::default();
        let paragraphs = builder.paragraphs(&input(MARKDOWN), &default_sheet());
        let para = paragraphs
            .iter()
            .find(|p| p.plain_text() == "Nenhum conhecido.")
            .unwrap();
        assert_eq!(para.style.as_deref(), Some("NormalText"));
    }

    #[test]
    fn test_usage_example_code_lines() {
        let builder = DocxBuilder::default().include_source(false);
        let paragraphs = builder.paragraphs(&input(MARKDOWN), &default_sheet());
        let code: Vec<_> = paragraphs
            .iter()
            .filter(|p| p.style.as_deref() == Some("CodeBlock"))
            .map(Paragraph::plain_text)
            .collect();
        assert_eq!(code, vec!["conversor --md a.md", " ", "conversor --help"]);
    }

    #[test]
    fn test_example_without_fences_uses_document_code() {
        let markdown = "\
### Descrição:
Veja:
```python
run()
```
### Exemplo de Uso:
Chame run().
";
        let builder = DocxBuilder::default().include_source(false);
        let texts = texts(&builder.paragraphs(&input(markdown), &default_sheet()));
        let examples = texts.iter().filter(|t| *t == "Exemplo de Uso").count();
        assert_eq!(examples, 2);
        assert_eq!(texts.last().map(String::as_str), Some("run()"));
    }

    #[test]
    fn test_source_appendix_can_be_disabled() {
        let builder = DocxBuilder::default().include_source(false);
        let texts = texts(&builder.paragraphs(&input(MARKDOWN), &default_sheet()));
        assert!(!texts.iter().any(|t| t == "Código-Fonte (Anexo)"));
    }

    #[test]
    fn test_missing_styles_fall_back_to_bold_headings() {
        let builder = DocxBuilder::default();
        let paragraphs = builder.paragraphs(&input(MARKDOWN), &StyleSheet::default());
        assert!(paragraphs.iter().all(|p| p.style.is_none()));
        assert!(matches!(
            paragraphs[1].inlines[0],
            Inline::Text { bold: true, .. }
        ));
    }

    #[test]
    fn test_build_without_template() {
        let bytes = DocxBuilder::default().build(&input(MARKDOWN)).unwrap();
        let package = Package::from_reader(Cursor::new(bytes)).unwrap();
        let document = package.part_str(DOCUMENT_PART).unwrap();

        assert!(document.contains("Converte Markdown em Word &amp; PDF."));
        assert!(document.contains("print(1 &lt; 2)"));
        let body_para = document.find("Converte Markdown").unwrap();
        let sect_pr = document.find("<w:sectPr").unwrap();
        assert!(body_para < sect_pr);
    }

    #[test]
    fn test_build_with_template_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("modelo.docx");

        let mut template = Package::default_package(Utc::now());
        let document = template.part_str(DOCUMENT_PART).unwrap();
        let document = append_to_body(&document, &Paragraph::text(None, "Capa da empresa").to_xml())
            .unwrap();
        template.set_part(DOCUMENT_PART, document.into_bytes());
        template.set_part("word/media/logo.png", vec![0x89, b'P', b'N', b'G']);
        std::fs::write(&template_path, template.to_bytes().unwrap()).unwrap();

        let builder = DocxBuilder::default().with_template(Some(template_path));
        let bytes = builder.build(&input(MARKDOWN)).unwrap();
        let package = Package::from_reader(Cursor::new(bytes)).unwrap();
        let document = package.part_str(DOCUMENT_PART).unwrap();

        let cover = document.find("Capa da empresa").unwrap();
        let title = document.find("conversor.py").unwrap();
        assert!(cover < title);
        assert!(package.part("word/media/logo.png").is_some());
    }

    #[test]
    fn test_build_missing_template() {
        let builder =
            DocxBuilder::default().with_template(Some(PathBuf::from("/nonexistent/modelo.docx")));
        let err = builder.build(&input(MARKDOWN)).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { kind: "template", .. }));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("docs").join("nested").join("saida.docx");
        DocxBuilder::default()
            .write(&input(MARKDOWN), &out)
            .unwrap();
        assert!(out.exists());
    }
}
