//! Conformance violations and the report that collects them.

use std::fmt;

use serde::Serialize;

use crate::template::Section;

/// How serious a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported, but the document still conforms.
    Warning,
    /// The document does not conform.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Kind of list a section was expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// `- item`
    Bulleted,
    /// `1. item`
    Numbered,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bulleted => write!(f, "bulleted"),
            Self::Numbered => write!(f, "numbered"),
        }
    }
}

/// A single way a document departs from the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A required section header is absent.
    Missing {
        /// The missing section.
        section: Section,
    },

    /// A section header appears more than once.
    Duplicate {
        /// The repeated section.
        section: Section,
        /// Header line of every occurrence.
        lines: Vec<usize>,
    },

    /// A section header appears before one that should precede it.
    OutOfOrder {
        /// The first header found out of order.
        section: Section,
        /// The section it was found after.
        after: Section,
        /// Header line of the out-of-order section.
        line: usize,
    },

    /// A section has no content.
    Empty {
        /// The empty section.
        section: Section,
    },

    /// A section that must be a list has no list items.
    NotAList {
        /// The section.
        section: Section,
        /// The list kind it should contain.
        expected: ListKind,
    },

    /// A list item does not follow the section's item pattern.
    MalformedItem {
        /// The section.
        section: Section,
        /// The offending item text.
        item: String,
        /// The pattern the item should follow.
        pattern: &'static str,
    },

    /// A numbered step breaks the 1, 2, 3... sequence.
    StepOutOfSequence {
        /// The number that should have appeared.
        expected: u32,
        /// The number that did appear.
        found: u32,
    },

    /// The usage example has no fenced code block.
    MissingCodeBlock,

    /// A header that is not part of the template.
    UnknownSection {
        /// The label as written.
        label: String,
        /// Header line.
        line: usize,
        /// Whether unknown sections are treated as errors.
        strict: bool,
    },
}

impl Violation {
    /// Severity of this violation.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownSection { strict: false, .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// The template section the violation concerns, if any.
    #[must_use]
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::Missing { section }
            | Self::Duplicate { section, .. }
            | Self::OutOfOrder { section, .. }
            | Self::Empty { section }
            | Self::NotAList { section, .. }
            | Self::MalformedItem { section, .. } => Some(*section),
            Self::StepOutOfSequence { .. } => Some(Section::ExecutionFlow),
            Self::MissingCodeBlock => Some(Section::UsageExample),
            Self::UnknownSection { .. } => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { section } => write!(f, "missing section '{section}'"),
            Self::Duplicate { section, lines } => {
                let lines: Vec<String> = lines.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "section '{section}' appears {} times (lines {})",
                    lines.len(),
                    lines.join(", ")
                )
            }
            Self::OutOfOrder {
                section,
                after,
                line,
            } => write!(
                f,
                "section '{section}' out of order at line {line}: it must come before '{after}'"
            ),
            Self::Empty { section } => write!(f, "section '{section}' is empty"),
            Self::NotAList { section, expected } => {
                write!(f, "section '{section}' must be a {expected} list")
            }
            Self::MalformedItem {
                section,
                item,
                pattern,
            } => write!(
                f,
                "item in '{section}' does not match '{pattern}': {item}"
            ),
            Self::StepOutOfSequence { expected, found } => write!(
                f,
                "step {found} in '{}' breaks the sequence (expected {expected})",
                Section::ExecutionFlow
            ),
            Self::MissingCodeBlock => write!(
                f,
                "section '{}' has no fenced code block",
                Section::UsageExample
            ),
            Self::UnknownSection { label, line, .. } => {
                write!(f, "unknown section '{label}' at line {line}")
            }
        }
    }
}

/// Outcome of checking one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Every violation found, in check order.
    pub violations: Vec<Violation>,
}

impl Report {
    /// True when no violation is an error.
    #[must_use]
    pub fn is_conformant(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Violations with error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity() == Severity::Error)
    }

    /// Violations with warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity() == Severity::Warning)
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Sections reported missing.
    #[must_use]
    pub fn missing(&self) -> Vec<Section> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                Violation::Missing { section } => Some(*section),
                _ => None,
            })
            .collect()
    }

    /// The first out-of-order section, if any.
    #[must_use]
    pub fn first_out_of_order(&self) -> Option<Section> {
        self.violations.iter().find_map(|v| match v {
            Violation::OutOfOrder { section, .. } => Some(*section),
            _ => None,
        })
    }
}
