//! Template conformance checking.
//!
//! This module verifies that assistant output follows the documentation
//! template:
//!
//! - **Headers**: all eight sections present exactly once, in template order.
//!   A missing header is reported by name; for ordering, the first header
//!   found out of place is reported.
//!
//! - **Content**: no empty sections, `Entradas`/`Dependências` are bulleted
//!   lists, `Entradas` items read `name (type): description`, `Saídas` items
//!   read `type: description`, `Fluxo de Execução` is numbered from 1, and
//!   `Exemplo de Uso` holds a fenced code block.
//!
//! # Example
//!
//! ```
//! use docpress::conformance::Checker;
//! use docpress::template::Section;
//!
//! let report = Checker::default().check_str("### Título:\nscript.py\n");
//! assert!(!report.is_conformant());
//! assert!(report.missing().contains(&Section::Description));
//! ```

mod checker;
mod patterns;
mod summary;
mod violation;

pub use checker::Checker;
pub use patterns::{builtin_patterns, ItemPattern};
pub use summary::{to_json, verdict, FileReport};
pub use violation::{ListKind, Report, Severity, Violation};
