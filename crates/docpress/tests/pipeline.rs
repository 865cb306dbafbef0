//! End-to-end: instructions skeleton, check, and Word export from files.

use std::io::Cursor;

use docpress::config::{BuildConfig, CheckConfig, StyleConfig};
use docpress::conformance::{to_json, verdict};
use docpress::docx::{Package, DOCUMENT_PART};
use docpress::files::{display_name, read_text, write_text};
use docpress::{template, BuildInput, Checker, DocxBuilder, Error, FileReport, Section};

const ASSISTANT_OUTPUT: &str = "\
Claro! Segue a documentação:

### Título:
relatorio.py

### Descrição:
Gera um relatório mensal em CSV.

### Entradas:
- mes (int): mês de referência
- `saida` (Path): diretório de saída

### Saídas:
Path: caminho do CSV gerado

### Fluxo de Execução:
1. Lê os lançamentos do mês
2. Agrupa por categoria
3. Grava o CSV

### Dependências:
- pandas

### Erros Comuns:
- FileNotFoundError: diretório de saída inexistente

### Exemplo de Uso:
```bash
python relatorio.py --mes 3 --saida out/
```
";

#[test]
fn test_assistant_output_conforms_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let md_path = dir.path().join("saida.md");
    let src_path = dir.path().join("relatorio.py");
    let out_path = dir.path().join("docs").join("Relatorio.docx");
    write_text(&md_path, ASSISTANT_OUTPUT, false).unwrap();
    write_text(&src_path, "import pandas as pd\n\ndef main():\n\tpass\n", false).unwrap();

    let markdown = read_text("markdown", &md_path).unwrap();
    let report = Checker::new(CheckConfig::default()).check_str(&markdown);
    assert!(report.is_conformant(), "{:?}", report.violations);

    let source = read_text("source", &src_path).unwrap();
    let source_name = display_name(&src_path);
    let input = BuildInput {
        markdown: &markdown,
        source: &source,
        source_name: &source_name,
    };
    DocxBuilder::new(StyleConfig::default(), &BuildConfig::default())
        .write(&input, &out_path)
        .unwrap();

    let bytes = std::fs::read(&out_path).unwrap();
    let package = Package::from_reader(Cursor::new(bytes)).unwrap();
    let document = package.part_str(DOCUMENT_PART).unwrap();

    let mut last = 0;
    for section in Section::ALL {
        let pos = document[last..]
            .find(&format!(">{}</w:t>", section.label()))
            .map(|p| p + last)
            .unwrap_or_else(|| panic!("{} missing from document", section.label()));
        last = pos;
    }
    assert!(document.contains("Código-Fonte (Anexo)"));
    assert!(document.contains("import pandas as pd"));
    assert!(document.contains("<w:tab/>"));
}

#[test]
fn test_skeleton_round_trips_through_checker() {
    let report = Checker::default().check_str(&template::skeleton());
    assert!(report.is_conformant());
}

#[test]
fn test_instructions_only_warn_about_their_preamble_heading() {
    let report = Checker::default().check_str(template::instructions());
    assert!(report.is_conformant(), "{:?}", report.violations);
    assert_eq!(report.warnings().count(), 1);
}

#[test]
fn test_reordered_output_is_rejected() {
    let reordered = ASSISTANT_OUTPUT.replace(
        "### Dependências:\n- pandas\n\n",
        "",
    )
    .replace(
        "### Título:\n",
        "### Dependências:\n- pandas\n\n### Título:\n",
    );
    let report = Checker::default().check_str(&reordered);
    assert!(!report.is_conformant());
    assert_eq!(report.first_out_of_order(), Some(Section::Title));
}

#[test]
fn test_check_run_over_files_fails_on_any_nonconforming_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("bom.md");
    let bad = dir.path().join("ruim.md");
    write_text(&good, ASSISTANT_OUTPUT, false).unwrap();
    let nested = ASSISTANT_OUTPUT
        .replace("2. Agrupa por categoria\n", "2. Agrupa por categoria\n   1. soma\n")
        .replace("### Dependências:\n- pandas\n", "### Dependências:\npandas\n");
    write_text(&bad, &nested, false).unwrap();

    let checker = Checker::default();
    let reports: Vec<FileReport> = [&good, &bad]
        .iter()
        .map(|path| {
            let text = read_text("markdown", path).unwrap();
            FileReport::new(path.display().to_string(), checker.check_str(&text))
        })
        .collect();

    assert!(reports[0].conformant);
    assert_eq!(reports[1].report.error_count(), 1);
    assert!(matches!(
        verdict(&reports),
        Err(Error::NonConformant {
            documents: 1,
            errors: 1
        })
    ));

    let json: serde_json::Value = serde_json::from_str(&to_json(&reports).unwrap()).unwrap();
    assert_eq!(json[1]["violations"][0]["kind"], "not_a_list");
    assert_eq!(json[1]["file"], bad.display().to_string());
}
