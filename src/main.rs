mod config;
mod error;
mod locator;
mod matcher;
mod model;
mod parser;
mod report;

use std::io::Write;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Cli, Config};
use report::MappingReport;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for the report / JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::from_cli(Cli::parse())?;
    info!(
        project_root = %config.project_root.display(),
        learning_file = %config.learning_file.display(),
        claude_file = %config.claude_file.display(),
        "configuration loaded"
    );

    let learnings_text = config.read_learnings()?;
    let claude_text = config.read_claude()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if !config.json {
        report::write_banner(
            &mut out,
            &config.project_root,
            &config.learning_file,
            &config.claude_file,
        )?;
    }

    let learnings = parser::parse_learnings(&learnings_text);
    info!(learnings = learnings.len(), "learnings parsed");
    if !config.json {
        writeln!(out, "✓ Found {} learnings\n", learnings.len())?;
    }

    if learnings.is_empty() && !config.json {
        writeln!(out, "No actionable learnings found. Nothing to map.")?;
        return Ok(());
    }

    let sections = locator::locate_sections(&claude_text);
    info!(sections = sections.len(), "marked sections located");
    if !config.json {
        writeln!(
            out,
            "✓ Found {} marked sections in {}\n",
            sections.len(),
            report::display_name(&config.claude_file)
        )?;
    }

    let mapping = MappingReport::build(&learnings, &sections);

    if config.json {
        serde_json::to_writer_pretty(&mut out, &report::JsonReport::from_report(&mapping))?;
        writeln!(out)?;
        return Ok(());
    }

    report::write_report(&mut out, &mapping, &config.claude_file)?;
    Ok(())
}
