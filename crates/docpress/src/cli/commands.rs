//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Build command arguments.
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Markdown file with the assistant's output
    #[arg(long, value_name = "FILE")]
    pub md: PathBuf,

    /// Source file the documentation describes
    #[arg(long, value_name = "FILE")]
    pub src: PathBuf,

    /// Word template (.docx) providing styles and existing content
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Path of the generated .docx
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,

    /// Do not append the full source file
    #[arg(long)]
    pub no_source: bool,

    /// Refuse to build when the Markdown does not conform to the template
    #[arg(long)]
    pub check: bool,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Markdown files to check
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Treat headers outside the template as errors
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Instructions command arguments.
#[derive(Debug, Args)]
pub struct InstructionsCommand {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,

    /// Emit an empty document skeleton instead of the instructions
    #[arg(long)]
    pub skeleton: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per violation
    #[default]
    Plain,
    /// JSON report
    Json,
}
