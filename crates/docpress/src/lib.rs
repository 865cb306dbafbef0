//! `docpress` - PT-BR documentation template tooling
//!
//! This library holds the fixed documentation template handed to the coding
//! assistant, a conformance checker for the assistant's Markdown output, and
//! a Word exporter that turns that output plus the documented source file into
//! a styled `.docx`.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod conformance;
pub mod docx;
pub mod error;
pub mod files;
pub mod logging;
pub mod markdown;
pub mod template;

pub use config::Config;
pub use conformance::{Checker, FileReport, Report, Violation};
pub use docx::{BuildInput, DocxBuilder};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use markdown::Document;
pub use template::Section;
