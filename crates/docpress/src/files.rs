//! File helpers shared by the commands.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Read a text file, replacing invalid UTF-8 and normalizing line endings.
///
/// `kind` names the file in the not-found error (`markdown`, `source`).
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the path does not exist, or
/// [`Error::ReadFile`] if it cannot be read.
pub fn read_text(kind: &'static str, path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::file_not_found(kind, path));
    }
    let bytes = std::fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = bytes.len(), "Read {kind} file {}", path.display());
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}

/// Write a text file, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::AlreadyExists`] if the file exists and `force` is false,
/// or an I/O error if it cannot be written.
pub fn write_text(path: &Path, text: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, text).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// The file name of a path, or the whole path when it has none.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
