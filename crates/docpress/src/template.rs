//! The PT-BR documentation template.
//!
//! This module defines the eight sections every generated document must carry,
//! in their fixed order, together with the instruction document that is handed
//! to the coding assistant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pattern for `Entradas` items: `name (type): description`.
pub const INPUT_ITEM_PATTERN: &str =
    r"^`?(?P<name>[^\s()`:][^()`:]*?)`?\s*\((?P<type>[^()]+)\)\s*:\s*(?P<description>\S.*)$";

/// Pattern for `Saídas` items: `type: description`.
pub const OUTPUT_ITEM_PATTERN: &str = r"^`?(?P<type>[^:`]+?)`?\s*:\s*(?P<description>\S.*)$";

/// The instruction document, verbatim.
pub const INSTRUCTIONS: &str = r"# Instruções de Documentação

Sempre que for solicitado a documentar um script, módulo ou função, responda
**em português (Brasil)** seguindo exatamente o modelo abaixo. Inclua todas as
oito seções, uma única vez cada, na ordem indicada, sem deixar nenhuma vazia.

### Título:
<nome do script ou módulo>

### Descrição:
<resumo claro do objetivo e do contexto de uso>

### Entradas:
- nome (tipo): descrição

### Saídas:
tipo: descrição

### Fluxo de Execução:
1. <primeiro passo>
2. <segundo passo>

### Dependências:
- <biblioteca, serviço ou arquivo externo>

### Erros Comuns:
- <erro>: <causa provável e como resolver>

### Exemplo de Uso:
```<linguagem>
<exemplo mínimo e executável>
```
";

/// How the body of a section is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionFormat {
    /// Free text.
    Text,
    /// A `- ` bulleted list.
    BulletList,
    /// A `1.` numbered list.
    NumberedList,
    /// Text containing at least one fenced code block.
    CodeExample,
}

/// One of the eight template sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// `Título`
    Title,
    /// `Descrição`
    Description,
    /// `Entradas`
    Inputs,
    /// `Saídas`
    Outputs,
    /// `Fluxo de Execução`
    ExecutionFlow,
    /// `Dependências`
    Dependencies,
    /// `Erros Comuns`
    CommonErrors,
    /// `Exemplo de Uso`
    UsageExample,
}

impl Section {
    /// All sections, in template order.
    pub const ALL: [Section; 8] = [
        Self::Title,
        Self::Description,
        Self::Inputs,
        Self::Outputs,
        Self::ExecutionFlow,
        Self::Dependencies,
        Self::CommonErrors,
        Self::UsageExample,
    ];

    /// The literal header label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Título",
            Self::Description => "Descrição",
            Self::Inputs => "Entradas",
            Self::Outputs => "Saídas",
            Self::ExecutionFlow => "Fluxo de Execução",
            Self::Dependencies => "Dependências",
            Self::CommonErrors => "Erros Comuns",
            Self::UsageExample => "Exemplo de Uso",
        }
    }

    /// Position of the section in the template, starting at 0.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layout expected for the section body.
    #[must_use]
    pub fn format(self) -> SectionFormat {
        match self {
            Self::Title | Self::Description | Self::Outputs | Self::CommonErrors => {
                SectionFormat::Text
            }
            Self::Inputs | Self::Dependencies => SectionFormat::BulletList,
            Self::ExecutionFlow => SectionFormat::NumberedList,
            Self::UsageExample => SectionFormat::CodeExample,
        }
    }

    /// Whether the Word export renders `- ` items of this section as a list.
    #[must_use]
    pub fn renders_as_list(self) -> bool {
        matches!(
            self,
            Self::Inputs | Self::Outputs | Self::Dependencies | Self::CommonErrors
        )
    }

    /// Placeholder body used when producing an empty skeleton.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Title => "<nome do script ou módulo>",
            Self::Description => "<resumo claro do objetivo e do contexto de uso>",
            Self::Inputs => "- nome (tipo): descrição",
            Self::Outputs => "tipo: descrição",
            Self::ExecutionFlow => "1. <primeiro passo>\n2. <segundo passo>",
            Self::Dependencies => "- <biblioteca, serviço ou arquivo externo>",
            Self::CommonErrors => "- <erro>: <causa provável e como resolver>",
            Self::UsageExample => "```<linguagem>\n<exemplo mínimo e executável>\n```",
        }
    }

    /// Resolve a header label to a section.
    ///
    /// Surrounding whitespace, emphasis markers and backticks are ignored, as
    /// is letter case. Accents are significant.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = normalize_label(label);
        Self::ALL
            .into_iter()
            .find(|section| section.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_matches(|c| c == '*' || c == '_' || c == '`')
        .trim()
        .to_lowercase()
}

/// The instruction document handed to the assistant.
#[must_use]
pub fn instructions() -> &'static str {
    INSTRUCTIONS
}

/// An empty document containing every section header and its placeholder.
#[must_use]
pub fn skeleton() -> String {
    let mut out = String::new();
    for section in Section::ALL {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("### ");
        out.push_str(section.label());
        out.push_str(":\n");
        out.push_str(section.placeholder());
        out.push('\n');
    }
    out
}
