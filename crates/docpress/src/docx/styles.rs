//! Style lookup in `word/styles.xml`.
//!
//! Paragraph styles are addressed by id in the document body, while users
//! configure them by display name (`List Paragraph`) or id (`ListParagraph`).
//! Built-in styles are stored with lowercase names (`heading 2`), so names
//! compare case-insensitively.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

fn style_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<w:style\b([^>]*)>(.*?)</w:style>"#).expect("valid style regex")
    })
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"w:styleId="([^"]*)""#).expect("valid style id regex"))
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<w:name\s+w:val="([^"]*)""#).expect("valid style name regex"))
}

/// A style declared in the stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    /// `w:styleId`
    pub id: String,
    /// `w:name`, when present.
    pub name: Option<String>,
}

/// The styles declared by a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    entries: Vec<StyleEntry>,
}

impl StyleSheet {
    /// Parse the contents of `word/styles.xml`.
    #[must_use]
    pub fn parse(xml: &str) -> Self {
        let entries = style_regex()
            .captures_iter(xml)
            .filter_map(|caps| {
                let attrs = caps.get(1)?.as_str();
                let inner = caps.get(2)?.as_str();
                let id = attr_regex().captures(attrs)?.get(1)?.as_str().to_string();
                let name = name_regex()
                    .captures(inner)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
                Some(StyleEntry { id, name })
            })
            .collect::<Vec<_>>();
        trace!(styles = entries.len(), "Parsed stylesheet");
        Self { entries }
    }

    /// Number of declared styles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no styles are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a configured style name or id to the id used in the body.
    #[must_use]
    pub fn resolve(&self, wanted: &str) -> Option<&str> {
        let wanted = wanted.trim();
        if wanted.is_empty() {
            return None;
        }
        let squashed: String = wanted.chars().filter(|c| !c.is_whitespace()).collect();
        self.entries
            .iter()
            .find(|e| e.id == wanted)
            .or_else(|| {
                self.entries.iter().find(|e| {
                    e.name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(wanted))
                })
            })
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.id.eq_ignore_ascii_case(&squashed))
            })
            .map(|e| e.id.as_str())
    }
}
