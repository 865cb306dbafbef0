//! Error types for docpress.
//!
//! This module defines all error types used throughout the docpress crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for docpress operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// A required input file does not exist.
    #[error("{kind} not found: {path}")]
    FileNotFound {
        /// What the file was supposed to be (markdown, source, template).
        kind: &'static str,
        /// The path that was given.
        path: PathBuf,
    },

    /// Refused to overwrite an existing file.
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists {
        /// The existing file.
        path: PathBuf,
    },

    // === Package Errors ===
    /// The template is not a usable `.docx` package.
    #[error("invalid template package {path}: {message}")]
    TemplatePackage {
        /// Path to the template.
        path: PathBuf,
        /// Description of what is wrong.
        message: String,
    },

    /// Zip container operation failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // === Conformance Errors ===
    /// One or more documents do not follow the template.
    #[error("{documents} document(s) do not conform to the template ({errors} error(s))")]
    NonConformant {
        /// Number of failing documents.
        documents: usize,
        /// Total number of errors across them.
        errors: usize,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for docpress operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a file-not-found error.
    #[must_use]
    pub fn file_not_found(kind: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound {
            kind,
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = Error::file_not_found("markdown", "/tmp/saida.md");
        assert_eq!(err.to_string(), "markdown not found: /tmp/saida.md");
    }

    #[test]
    fn test_non_conformant_display() {
        let err = Error::NonConformant {
            documents: 1,
            errors: 3,
        };
        assert!(err.to_string().contains("1 document(s)"));
        assert!(err.to_string().contains("3 error(s)"));
    }

    #[test]
    fn test_already_exists_display() {
        let err = Error::AlreadyExists {
            path: PathBuf::from(".github/copilot-instructions.md"),
        };
        let msg = err.to_string();
        assert!(msg.contains("copilot-instructions.md"));
        assert!(msg.contains("--force"));
    }

    #[test]
    fn test_template_package_display() {
        let err = Error::TemplatePackage {
            path: PathBuf::from("modelo.docx"),
            message: "missing word/document.xml".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("modelo.docx"));
        assert!(msg.contains("word/document.xml"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "empty style name".to_string(),
        };
        assert!(err.to_string().contains("empty style name"));
    }

    #[test]
    fn test_read_file_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::ReadFile {
            path: PathBuf::from("/root/forbidden.md"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden.md"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
