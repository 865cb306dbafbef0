//! Item patterns for list sections.

use regex::Regex;

use crate::template::{Section, INPUT_ITEM_PATTERN, OUTPUT_ITEM_PATTERN};

/// A compiled item pattern.
#[derive(Debug)]
pub struct ItemPattern {
    /// Section whose items must match.
    pub section: Section,

    /// Human-readable shape of a valid item.
    pub shape: &'static str,

    regex: Regex,
}

impl ItemPattern {
    /// Create a new item pattern.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(section: Section, shape: &'static str, pattern: &str) -> Self {
        Self {
            section,
            shape,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check whether an item follows the pattern.
    #[must_use]
    pub fn matches(&self, item: &str) -> bool {
        self.regex.is_match(item.trim())
    }
}

/// Patterns for `Entradas` and `Saídas`.
#[must_use]
pub fn builtin_patterns() -> Vec<ItemPattern> {
    vec![
        ItemPattern::new(
            Section::Inputs,
            "name (type): description",
            INPUT_ITEM_PATTERN,
        ),
        ItemPattern::new(Section::Outputs, "type: description", OUTPUT_ITEM_PATTERN),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_for(section: Section) -> ItemPattern {
        builtin_patterns()
            .into_iter()
            .find(|p| p.section == section)
            .unwrap()
    }

    #[test]
    fn test_builtin_patterns_compile() {
        let patterns = builtin_patterns();
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn test_input_pattern_accepts() {
        let p = pattern_for(Section::Inputs);
        assert!(p.matches("md (Path): arquivo .md com a saída"));
        assert!(p.matches("`include_source` (bool): incluir o código-fonte"));
        assert!(p.matches("arquivo de saída (Dict[str, str]): mapa de seções"));
    }

    #[test]
    fn test_input_pattern_rejects() {
        let p = pattern_for(Section::Inputs);
        assert!(!p.matches("md: arquivo markdown"));
        assert!(!p.matches("md (Path) arquivo markdown"));
        assert!(!p.matches("md (Path):"));
        assert!(!p.matches("(Path): sem nome"));
    }

    #[test]
    fn test_output_pattern() {
        let p = pattern_for(Section::Outputs);
        assert!(p.matches("None: grava o arquivo .docx em disco"));
        assert!(p.matches("`Dict[str, str]`: seções encontradas"));
        assert!(!p.matches("gera um documento"));
        assert!(!p.matches("str:"));
    }
}
