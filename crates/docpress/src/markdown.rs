//! Markdown sectioning.
//!
//! Assistant output is split into labelled sections on ATX headers
//! (`### Título:`), keeping every occurrence in source order so the
//! conformance checker can see duplicates and ordering problems. Block
//! structure comes from `pulldown-cmark`, so headers inside fenced code,
//! list items or block quotes never start a section.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::template::Section;

fn parser(text: &str) -> Parser<'_> {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    Parser::new_ext(text, options)
}

/// One header occurrence and the text under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSection {
    /// Header label as written (without `#` markers or trailing colon).
    pub label: String,
    /// The template section the label resolves to, if any.
    pub section: Option<Section>,
    /// Section body with surrounding blank lines removed.
    pub body: String,
    /// 1-based line number of the header.
    pub line: usize,
}

impl RawSection {
    /// Whether the body holds no visible text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// A Markdown document split into sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Text before the first header.
    pub preamble: String,
    /// Every header occurrence, in source order.
    pub sections: Vec<RawSection>,
}

impl Document {
    /// Parse a document from Markdown text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        split_sections(text)
    }

    /// First occurrence of a template section.
    #[must_use]
    pub fn get(&self, section: Section) -> Option<&RawSection> {
        self.sections.iter().find(|s| s.section == Some(section))
    }

    /// Body of the first occurrence of a section, if non-empty.
    #[must_use]
    pub fn body(&self, section: Section) -> Option<&str> {
        self.get(section)
            .filter(|s| !s.is_empty())
            .map(|s| s.body.as_str())
    }

    /// All occurrences of a template section.
    pub fn occurrences(&self, section: Section) -> impl Iterator<Item = &RawSection> {
        self.sections
            .iter()
            .filter(move |s| s.section == Some(section))
    }

    /// Occurrences that resolve to a template section.
    pub fn known(&self) -> impl Iterator<Item = &RawSection> {
        self.sections.iter().filter(|s| s.section.is_some())
    }

    /// Occurrences whose label is not part of the template.
    pub fn unknown(&self) -> impl Iterator<Item = &RawSection> {
        self.sections.iter().filter(|s| s.section.is_none())
    }
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Info string after the opening fence (may be empty).
    pub lang: String,
    /// Code between the fences, without the trailing newline.
    pub code: String,
}

/// A top-level ATX header: its byte span and inline text.
#[derive(Debug)]
struct Header {
    start: usize,
    end: usize,
    text: String,
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Setext headers and headers nested in block quotes are left as body text.
fn is_atx(text: &str, start: usize) -> bool {
    let prefix = &text[line_start(text, start)..start];
    prefix.chars().all(|c| c == ' ') && text[start..].trim_start().starts_with('#')
}

fn headers(text: &str) -> Vec<Header> {
    let mut out = Vec::new();
    let mut items = 0usize;
    let mut current: Option<Header> = None;

    for (event, range) in parser(text).into_offset_iter() {
        match event {
            Event::Start(Tag::Item) => items += 1,
            Event::End(TagEnd::Item) => items = items.saturating_sub(1),
            Event::Start(Tag::Heading { .. }) if items == 0 && is_atx(text, range.start) => {
                current = Some(Header {
                    start: range.start,
                    end: range.end,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(header) = current.take() {
                    out.push(header);
                }
            }
            Event::Text(t) | Event::InlineHtml(t) | Event::Html(t) => {
                if let Some(header) = current.as_mut() {
                    header.text.push_str(&t);
                }
            }
            Event::Code(t) => {
                if let Some(header) = current.as_mut() {
                    header.text.push('`');
                    header.text.push_str(&t);
                    header.text.push('`');
                }
            }
            _ => {}
        }
    }
    out
}

/// Split Markdown text into its header-delimited sections.
///
/// A header is any ATX header at the top level of the document.
/// `### Título: Foo` starts the `Título` section with `Foo` as the first body
/// line. Carriage returns are dropped.
#[must_use]
pub fn split_sections(text: &str) -> Document {
    let text = text.replace("\r\n", "\n");
    let headers = headers(&text);

    let preamble_end = headers
        .first()
        .map_or(text.len(), |h| line_start(&text, h.start));
    let mut doc = Document {
        preamble: join_trimmed(&text[..preamble_end]),
        sections: Vec::with_capacity(headers.len()),
    };

    for (i, header) in headers.iter().enumerate() {
        let body_end = headers
            .get(i + 1)
            .map_or(text.len(), |next| line_start(&text, next.start));
        let rest = &text[header.end.min(body_end)..body_end];

        let (label, inline) = match header.text.split_once(':') {
            Some((label, inline)) => (label.trim(), inline.trim()),
            None => (header.text.trim(), ""),
        };
        let body = if inline.is_empty() {
            join_trimmed(rest)
        } else {
            join_trimmed(&format!("{inline}\n{rest}"))
        };

        doc.sections.push(RawSection {
            label: label.to_string(),
            section: Section::from_label(label),
            body,
            line: text[..header.start].matches('\n').count() + 1,
        });
    }
    doc
}

/// Join lines, dropping leading and trailing blank lines and trailing spaces.
fn join_trimmed(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end]
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// Whether a fenced block's source ends with a closing fence.
fn is_closed_fence(raw: &str) -> bool {
    let mut lines = raw
        .trim_end()
        .lines()
        .map(|l| l.trim_start_matches([' ', '\t', '>']).trim_end());
    let Some(open) = lines.next() else {
        return false;
    };
    let Some(ch) = open.chars().next() else {
        return false;
    };
    let run = open.chars().take_while(|c| *c == ch).count();
    lines
        .last()
        .is_some_and(|close| close.len() >= run && close.chars().all(|c| c == ch))
}

/// All terminated fenced code blocks in the text, in order.
#[must_use]
pub fn fenced_blocks(text: &str) -> Vec<CodeBlock> {
    let text = text.replace("\r\n", "\n");
    let mut blocks = Vec::new();
    let mut open: Option<(CodeBlock, bool)> = None;

    for (event, range) in parser(&text).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let block = CodeBlock {
                    lang: info.trim().to_string(),
                    code: String::new(),
                };
                open = Some((block, is_closed_fence(&text[range])));
            }
            Event::Text(code) => {
                if let Some((block, _)) = open.as_mut() {
                    block.code.push_str(&code);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((mut block, true)) = open.take() {
                    block.code = block.code.trim_end_matches('\n').to_string();
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }
    blocks
}

/// Code of the first terminated fenced block.
#[must_use]
pub fn extract_fenced_code(text: &str) -> Option<String> {
    fenced_blocks(text).into_iter().next().map(|b| b.code)
}

/// One list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    /// Nesting level; 0 for items of a top-level list.
    pub depth: usize,
    /// The number as written, for ordered items.
    pub number: Option<u32>,
    /// Item text without its marker or nested lists, lines joined by spaces.
    pub text: String,
}

/// Split a list item's source into its written number and its text.
fn split_marker(raw: &str) -> (Option<u32>, String) {
    let raw = raw.trim_start();
    let digits = raw.chars().take_while(char::is_ascii_digit).count();
    let (number, rest) = if digits > 0 {
        (raw[..digits].parse().ok(), raw.get(digits + 1..).unwrap_or_default())
    } else {
        (None, raw.get(1..).unwrap_or_default())
    };
    let text = rest
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (number, text)
}

/// Every list item in the text, in source order, with its depth.
#[must_use]
pub fn list_items(body: &str) -> Vec<ListItem> {
    let body = body.replace("\r\n", "\n");
    let mut items: Vec<ListItem> = Vec::new();
    let mut lists = 0usize;
    // (index in `items`, source start, start of the first nested list)
    let mut open: Vec<(usize, usize, Option<usize>)> = Vec::new();

    for (event, range) in parser(&body).into_offset_iter() {
        match event {
            Event::Start(Tag::List(_)) => {
                if let Some((_, _, nested)) = open.last_mut() {
                    if nested.is_none() {
                        *nested = Some(range.start);
                    }
                }
                lists += 1;
            }
            Event::End(TagEnd::List(_)) => lists = lists.saturating_sub(1),
            Event::Start(Tag::Item) => {
                items.push(ListItem {
                    depth: lists.saturating_sub(1),
                    number: None,
                    text: String::new(),
                });
                open.push((items.len() - 1, range.start, None));
            }
            Event::End(TagEnd::Item) => {
                if let Some((index, start, nested)) = open.pop() {
                    let end = nested.unwrap_or(range.end);
                    let (number, text) = split_marker(&body[start..end]);
                    items[index].number = number;
                    items[index].text = text;
                }
            }
            _ => {}
        }
    }

    items.retain(|item| !item.text.is_empty());
    items
}

/// Text of every top-level bulleted item (`-`, `*` or `+`).
#[must_use]
pub fn bullet_items(body: &str) -> Vec<String> {
    list_items(body)
        .into_iter()
        .filter(|item| item.depth == 0 && item.number.is_none())
        .map(|item| item.text)
        .collect()
}

/// A `N. text` list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedItem {
    /// The number as written.
    pub number: u32,
    /// Item text.
    pub text: String,
}

/// Every top-level `N. text` or `N) text` item. Nested sub-steps are skipped.
#[must_use]
pub fn numbered_items(body: &str) -> Vec<NumberedItem> {
    list_items(body)
        .into_iter()
        .filter(|item| item.depth == 0)
        .filter_map(|item| {
            item.number.map(|number| NumberedItem {
                number,
                text: item.text,
            })
        })
        .collect()
}
