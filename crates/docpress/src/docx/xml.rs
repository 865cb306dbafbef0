//! WordprocessingML paragraph model and serialization.

use std::fmt::Write as _;

/// Namespace of the main WordprocessingML vocabulary.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// A run of text.
    Text {
        /// The text, unescaped.
        text: String,
        /// Render in bold.
        bold: bool,
    },
    /// A manual line break.
    Break,
}

/// A paragraph with an optional style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Style id (`w:styleId`), or `None` for the document default.
    pub style: Option<String>,
    /// Paragraph content.
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    /// An empty paragraph with the given style.
    #[must_use]
    pub fn new(style: Option<&str>) -> Self {
        Self {
            style: style.map(String::from),
            inlines: Vec::new(),
        }
    }

    /// A paragraph holding `text`, with embedded newlines turned into breaks.
    #[must_use]
    pub fn text(style: Option<&str>, text: &str) -> Self {
        let mut p = Self::new(style);
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                p.inlines.push(Inline::Break);
            }
            p = p.run(line, false);
        }
        p
    }

    /// Append a text run.
    #[must_use]
    pub fn run(mut self, text: &str, bold: bool) -> Self {
        if !text.is_empty() {
            self.inlines.push(Inline::Text {
                text: text.to_string(),
                bold,
            });
        }
        self
    }

    /// Plain text of the paragraph, breaks rendered as newlines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text { text, .. } => text.as_str(),
                Inline::Break => "\n",
            })
            .collect()
    }

    /// Serialize as a `<w:p>` element.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<w:p>");
        if let Some(style) = &self.style {
            let _ = write!(
                out,
                r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
                escape(style)
            );
        }
        for inline in &self.inlines {
            match inline {
                Inline::Break => out.push_str("<w:r><w:br/></w:r>"),
                Inline::Text { text, bold } => {
                    out.push_str("<w:r>");
                    if *bold {
                        out.push_str("<w:rPr><w:b/></w:rPr>");
                    }
                    for (i, chunk) in text.split('\t').enumerate() {
                        if i > 0 {
                            out.push_str("<w:tab/>");
                        }
                        if !chunk.is_empty() {
                            let _ = write!(
                                out,
                                r#"<w:t xml:space="preserve">{}</w:t>"#,
                                escape(chunk)
                            );
                        }
                    }
                    out.push_str("</w:r>");
                }
            }
        }
        out.push_str("</w:p>");
        out
    }
}

/// Escape text for use in XML content or attribute values.
///
/// Characters that XML 1.0 cannot carry are dropped.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if c < ' ' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
