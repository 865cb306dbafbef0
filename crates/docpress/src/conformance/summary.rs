//! Per-file results of a `check` run.

use serde::Serialize;

use super::violation::Report;
use crate::error::{Error, Result};

/// The report for one checked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// The file as given on the command line.
    pub file: String,
    /// Whether the file has no errors.
    pub conformant: bool,
    /// Violations found in the file.
    #[serde(flatten)]
    pub report: Report,
}

impl FileReport {
    /// Wrap a report for `file`.
    #[must_use]
    pub fn new(file: impl Into<String>, report: Report) -> Self {
        Self {
            file: file.into(),
            conformant: report.is_conformant(),
            report,
        }
    }

    /// One `file: severity: message` line per violation, or `file: ok`.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .report
            .violations
            .iter()
            .map(|v| format!("{}: {}: {v}", self.file, v.severity()))
            .collect();
        if self.conformant {
            lines.push(format!("{}: ok", self.file));
        }
        lines
    }
}

/// Render reports as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(reports: &[FileReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// Fail with [`Error::NonConformant`] when any report has errors.
///
/// # Errors
///
/// Returns [`Error::NonConformant`] counting the failing files and their
/// errors.
pub fn verdict(reports: &[FileReport]) -> Result<()> {
    let failing: Vec<&FileReport> = reports.iter().filter(|r| !r.conformant).collect();
    if failing.is_empty() {
        return Ok(());
    }
    Err(Error::NonConformant {
        documents: failing.len(),
        errors: failing.iter().map(|r| r.report.error_count()).sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::{Checker, Violation};
    use crate::template::{skeleton, Section};

    fn reports() -> Vec<FileReport> {
        let checker = Checker::default();
        vec![
            FileReport::new("ok.md", checker.check_str(&skeleton())),
            FileReport::new("ruim.md", checker.check_str("### Título:\nx\n")),
        ]
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&reports()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let files = value.as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["file"], "ok.md");
        assert_eq!(files[0]["conformant"], true);
        assert_eq!(files[0]["violations"].as_array().unwrap().len(), 0);
        assert_eq!(files[1]["conformant"], false);
        assert_eq!(files[1]["violations"][0]["kind"], "missing");
    }

    #[test]
    fn test_plain_lines() {
        let reports = reports();
        assert_eq!(reports[0].plain_lines(), vec!["ok.md: ok"]);
        let lines = reports[1].plain_lines();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("ruim.md: error: "));
        assert!(lines.iter().all(|l| !l.ends_with(": ok")));
    }

    #[test]
    fn test_verdict_counts_failing_files() {
        let err = verdict(&reports()).unwrap_err();
        assert!(matches!(
            err,
            Error::NonConformant {
                documents: 1,
                errors: 7
            }
        ));
    }

    #[test]
    fn test_verdict_passes_on_warnings_only() {
        let report = Report {
            violations: vec![Violation::UnknownSection {
                label: "Notas".to_string(),
                line: 3,
                strict: false,
            }],
        };
        let reports = vec![FileReport::new("a.md", report)];
        assert!(verdict(&reports).is_ok());
        assert_eq!(reports[0].report.missing(), Vec::<Section>::new());
    }
}
