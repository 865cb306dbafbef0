//! Configuration management for docpress.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "docpress";

/// Prefix of environment variable overrides.
const ENV_PREFIX: &str = "DOCPRESS_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DOCPRESS_`, nested keys joined by `__`)
/// 2. TOML config file at `~/.config/docpress/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Word paragraph styles.
    pub styles: StyleConfig,
    /// Word export configuration.
    pub build: BuildConfig,
    /// Conformance check configuration.
    pub check: CheckConfig,
}

/// Paragraph style names used by the Word export.
///
/// Each value may be a style's display name or its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Document title. Falls back to `heading 1` when missing.
    pub title: String,
    /// Section headings.
    pub heading: String,
    /// List items.
    pub list: String,
    /// Body text.
    pub body: String,
    /// Code lines.
    pub code: String,
}

/// Word export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Append the full source file at the end of the document.
    pub include_source: bool,
    /// Heading of the source appendix.
    pub source_heading: String,
    /// Template used when `--template` is not given.
    pub template: Option<PathBuf>,
}

/// Conformance check configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckConfig {
    /// Treat headers outside the template as errors.
    pub strict: bool,
    /// Check `Entradas` and `Saídas` items against their patterns.
    pub check_item_patterns: bool,
    /// Require a fenced code block in `Exemplo de Uso`.
    pub require_code_block: bool,
    /// Tolerate repeated section headers.
    pub allow_duplicates: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            title: "DocTitle".to_string(),
            heading: "Heading 2".to_string(),
            list: "List Paragraph".to_string(),
            body: "NormalText".to_string(),
            code: "CodeBlock".to_string(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            include_source: true,
            source_heading: "Código-Fonte (Anexo)".to_string(),
            template: None,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            strict: false,
            check_item_patterns: true,
            require_code_block: true,
            allow_duplicates: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `DOCPRESS_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific configuration file, which must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed, or holds
    /// invalid values.
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found("config", path));
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let styles = [
            ("styles.title", &self.styles.title),
            ("styles.heading", &self.styles.heading),
            ("styles.list", &self.styles.list),
            ("styles.body", &self.styles.body),
            ("styles.code", &self.styles.code),
        ];
        for (key, value) in styles {
            if value.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must not be empty"),
                });
            }
        }

        if self.build.include_source && self.build.source_heading.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "build.source_heading must not be empty when include_source is set"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Flattened `key`/`value` view of the configuration.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("styles.title", self.styles.title.clone()),
            ("styles.heading", self.styles.heading.clone()),
            ("styles.list", self.styles.list.clone()),
            ("styles.body", self.styles.body.clone()),
            ("styles.code", self.styles.code.clone()),
            ("build.include_source", self.build.include_source.to_string()),
            ("build.source_heading", self.build.source_heading.clone()),
            (
                "build.template",
                self.build
                    .template
                    .as_ref()
                    .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
            ),
            ("check.strict", self.check.strict.to_string()),
            (
                "check.check_item_patterns",
                self.check.check_item_patterns.to_string(),
            ),
            (
                "check.require_code_block",
                self.check.require_code_block.to_string(),
            ),
            (
                "check.allow_duplicates",
                self.check.allow_duplicates.to_string(),
            ),
        ]
    }
}
