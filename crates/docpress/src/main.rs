//! `docpress` - CLI for the PT-BR documentation template
//!
//! This binary prints the assistant instructions, checks generated Markdown
//! against the template, and exports it to Word.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use docpress::cli::{
    BuildCommand, CheckCommand, Cli, Command, ConfigCommand, InstructionsCommand, OutputFormat,
};
use docpress::files::{display_name, read_text, write_text};
use docpress::conformance::{to_json, verdict};
use docpress::{init_logging, template, BuildInput, Checker, Config, DocxBuilder, FileReport};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Build(cmd) => handle_build(&config, &cmd)?,
        Command::Check(cmd) => handle_check(&config, &cmd)?,
        Command::Instructions(cmd) => handle_instructions(&cmd)?,
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

fn handle_build(config: &Config, cmd: &BuildCommand) -> anyhow::Result<()> {
    let markdown = read_text("markdown", &cmd.md)?;
    let source = read_text("source", &cmd.src)?;

    if cmd.check {
        let report = Checker::new(config.check.clone()).check_str(&markdown);
        let reports = [FileReport::new(cmd.md.display().to_string(), report)];
        if !reports[0].conformant {
            for line in reports[0].plain_lines() {
                println!("{line}");
            }
        }
        verdict(&reports)?;
    }

    let source_name = display_name(&cmd.src);
    let input = BuildInput {
        markdown: &markdown,
        source: &source,
        source_name: &source_name,
    };
    let builder = DocxBuilder::new(config.styles.clone(), &config.build)
        .with_template(cmd.template.clone())
        .include_source(config.build.include_source && !cmd.no_source);

    builder
        .write(&input, &cmd.out)
        .with_context(|| format!("building {}", cmd.out.display()))?;
    println!("OK: document written to {}", cmd.out.display());
    Ok(())
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> anyhow::Result<()> {
    let mut check_config = config.check.clone();
    check_config.strict |= cmd.strict;
    let checker = Checker::new(check_config);

    let mut reports = Vec::with_capacity(cmd.files.len());
    for path in &cmd.files {
        let text = read_text("markdown", path)?;
        reports.push(FileReport::new(
            path.display().to_string(),
            checker.check_str(&text),
        ));
    }

    match cmd.format {
        OutputFormat::Plain => {
            for line in reports.iter().flat_map(FileReport::plain_lines) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", to_json(&reports)?),
    }

    verdict(&reports)?;
    Ok(())
}

fn handle_instructions(cmd: &InstructionsCommand) -> anyhow::Result<()> {
    let text = if cmd.skeleton {
        template::skeleton()
    } else {
        template::instructions().to_string()
    };

    match &cmd.out {
        Some(path) => {
            write_text(path, &text, cmd.force)?;
            println!("Instructions written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                for (key, value) in config.summary() {
                    println!("  {key:<28} {value}");
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)
                .with_context(|| format!("invalid configuration {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
