//! Template conformance checker.
//!
//! Runs a single pass over a parsed [`Document`]: header presence, uniqueness
//! and order first, then per-section content rules.

use tracing::{debug, trace};

use super::patterns::{builtin_patterns, ItemPattern};
use super::violation::{ListKind, Report, Violation};
use crate::config::CheckConfig;
use crate::markdown::{bullet_items, fenced_blocks, numbered_items, Document, RawSection};
use crate::template::Section;

/// Checks documents against the template.
#[derive(Debug)]
pub struct Checker {
    config: CheckConfig,
    patterns: Vec<ItemPattern>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckConfig::default())
    }
}

impl Checker {
    /// Create a checker with the given options.
    #[must_use]
    pub fn new(config: CheckConfig) -> Self {
        Self {
            config,
            patterns: builtin_patterns(),
        }
    }

    /// Parse and check Markdown text.
    #[must_use]
    pub fn check_str(&self, text: &str) -> Report {
        self.check(&Document::parse(text))
    }

    /// Check a parsed document.
    #[must_use]
    pub fn check(&self, doc: &Document) -> Report {
        let mut violations = Vec::new();

        self.check_presence(doc, &mut violations);
        Self::check_order(doc, &mut violations);

        for section in Section::ALL {
            let Some(raw) = doc.get(section) else {
                continue;
            };
            if raw.is_empty() {
                violations.push(Violation::Empty { section });
                continue;
            }
            self.check_content(raw, section, &mut violations);
        }

        for raw in doc.unknown() {
            violations.push(Violation::UnknownSection {
                label: raw.label.clone(),
                line: raw.line,
                strict: self.config.strict,
            });
        }

        debug!(
            sections = doc.sections.len(),
            violations = violations.len(),
            "Checked document"
        );
        Report { violations }
    }

    fn check_presence(&self, doc: &Document, out: &mut Vec<Violation>) {
        for section in Section::ALL {
            let lines: Vec<usize> = doc.occurrences(section).map(|s| s.line).collect();
            match lines.len() {
                0 => out.push(Violation::Missing { section }),
                1 => {}
                _ if self.config.allow_duplicates => {
                    trace!(%section, "Duplicate section tolerated");
                }
                _ => out.push(Violation::Duplicate { section, lines }),
            }
        }
    }

    /// Report the first header whose template position is lower than that of
    /// a header seen before it. Only first occurrences take part.
    fn check_order(doc: &Document, out: &mut Vec<Violation>) {
        let mut seen: Vec<Section> = Vec::new();
        let mut furthest: Option<Section> = None;

        for raw in doc.known() {
            let Some(section) = raw.section else {
                continue;
            };
            if seen.contains(&section) {
                continue;
            }
            seen.push(section);

            match furthest {
                Some(after) if section.index() < after.index() => {
                    out.push(Violation::OutOfOrder {
                        section,
                        after,
                        line: raw.line,
                    });
                    return;
                }
                _ => furthest = Some(section),
            }
        }
    }

    fn check_content(&self, raw: &RawSection, section: Section, out: &mut Vec<Violation>) {
        match section {
            Section::Inputs => {
                let items = bullet_items(&raw.body);
                if items.is_empty() {
                    out.push(Violation::NotAList {
                        section,
                        expected: ListKind::Bulleted,
                    });
                    return;
                }
                self.check_items(section, &items, out);
            }
            Section::Outputs => {
                let mut items = bullet_items(&raw.body);
                if items.is_empty() {
                    items = raw
                        .body
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(String::from)
                        .collect();
                }
                self.check_items(section, &items, out);
            }
            Section::Dependencies => {
                if bullet_items(&raw.body).is_empty() {
                    out.push(Violation::NotAList {
                        section,
                        expected: ListKind::Bulleted,
                    });
                }
            }
            Section::ExecutionFlow => {
                let steps = numbered_items(&raw.body);
                if steps.is_empty() {
                    out.push(Violation::NotAList {
                        section,
                        expected: ListKind::Numbered,
                    });
                    return;
                }
                for (expected, step) in (1..).zip(&steps) {
                    if step.number != expected {
                        out.push(Violation::StepOutOfSequence {
                            expected,
                            found: step.number,
                        });
                        break;
                    }
                }
            }
            Section::UsageExample => {
                if self.config.require_code_block && fenced_blocks(&raw.body).is_empty() {
                    out.push(Violation::MissingCodeBlock);
                }
            }
            Section::Title | Section::Description | Section::CommonErrors => {}
        }
    }

    fn check_items(&self, section: Section, items: &[String], out: &mut Vec<Violation>) {
        if !self.config.check_item_patterns {
            return;
        }
        let Some(pattern) = self.patterns.iter().find(|p| p.section == section) else {
            return;
        };
        for item in items {
            if !pattern.matches(item) {
                trace!(%section, item = %item, "Item does not match pattern");
                out.push(Violation::MalformedItem {
                    section,
                    item: item.clone(),
                    pattern: pattern.shape,
                });
            }
        }
    }
}
