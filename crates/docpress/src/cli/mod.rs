//! Command-line interface for docpress.
//!
//! This module provides the CLI structure for the `docpress` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{BuildCommand, CheckCommand, ConfigCommand, InstructionsCommand, OutputFormat};

use crate::logging::Verbosity;

/// docpress - PT-BR documentation template tooling
///
/// Prints the instruction template for the coding assistant, checks the
/// assistant's Markdown against it, and turns conforming output into a
/// styled Word document.
#[derive(Debug, Parser)]
#[command(name = "docpress")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render Markdown and source into a Word document
    Build(BuildCommand),

    /// Check Markdown files against the template
    Check(CheckCommand),

    /// Print or write the assistant instruction template
    Instructions(InstructionsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
