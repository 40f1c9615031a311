/// Report rendering for the mapping run.
///
/// Placements are grouped by confidence tier and printed as diff-style
/// blocks; no-match diagnostics stay in their learning's tier so the reader
/// sees them in context. Nothing here touches the knowledge-base file.
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::matcher::{self, MatchOutcome};
use crate::model::{Confidence, Directive, Learning, Section};

const RULE: &str =
    "================================================================================";
const MAX_PATTERN_LEN: usize = 60;

/// All placement outcomes for one run, grouped by confidence tier.
#[derive(Debug)]
pub struct MappingReport {
    pub total: usize,
    pub actionable: usize,
    pub high: Vec<MatchOutcome>,
    pub medium: Vec<MatchOutcome>,
    pub low: Vec<MatchOutcome>,
}

impl MappingReport {
    /// Match every actionable learning against the located sections.
    ///
    /// Each learning is matched independently against the same immutable
    /// section list; non-actionable learnings are counted but not matched.
    pub fn build(learnings: &[Learning], sections: &[Section]) -> Self {
        let mut high = Vec::new();
        let mut medium = Vec::new();
        let mut low = Vec::new();

        for learning in learnings {
            if !learning.actionable {
                continue;
            }
            let outcome = matcher::map_learning(learning, sections);
            match learning.confidence {
                Confidence::High => high.push(outcome),
                Confidence::Medium => medium.push(outcome),
                Confidence::Low => low.push(outcome),
            }
        }

        Self {
            total: learnings.len(),
            actionable: learnings.iter().filter(|l| l.actionable).count(),
            high,
            medium,
            low,
        }
    }
}

/// Machine-readable form of the run: placements flattened in matching
/// order, unmatched target labels listed separately.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub total: usize,
    pub actionable: usize,
    pub placed: Vec<&'a Directive>,
    pub unmatched: Vec<&'a str>,
}

impl<'a> JsonReport<'a> {
    pub fn from_report(report: &'a MappingReport) -> Self {
        let mut placed = Vec::new();
        let mut unmatched = Vec::new();
        for outcome in report
            .high
            .iter()
            .chain(&report.medium)
            .chain(&report.low)
        {
            match outcome {
                MatchOutcome::Placed(d) => placed.push(d),
                MatchOutcome::NoSection { target_section } => {
                    unmatched.push(target_section.as_str())
                }
            }
        }
        Self {
            total: report.total,
            actionable: report.actionable,
            placed,
            unmatched,
        }
    }
}

/// Opening banner naming the run's inputs.
pub fn write_banner(
    out: &mut impl Write,
    project_root: &Path,
    learning_file: &Path,
    claude_file: &Path,
) -> io::Result<()> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Session Learning Mapper")?;
    writeln!(out, "{RULE}\n")?;
    writeln!(out, "Project root: {}", project_root.display())?;
    writeln!(out, "Parsing: {}", learning_file.display())?;
    writeln!(out, "Target: {}\n", claude_file.display())?;
    Ok(())
}

/// The suggested-changes listing and final summary.
pub fn write_report(
    out: &mut impl Write,
    report: &MappingReport,
    claude_file: &Path,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Suggested Changes")?;
    writeln!(out, "{RULE}")?;

    if !report.high.is_empty() {
        writeln!(out, "\n🔴 HIGH CONFIDENCE (Strongly recommend adding):")?;
        write_outcomes(out, &report.high, claude_file)?;
    }
    if !report.medium.is_empty() {
        writeln!(out, "\n🟡 MEDIUM CONFIDENCE (Review before adding):")?;
        write_outcomes(out, &report.medium, claude_file)?;
    }
    if !report.low.is_empty() {
        writeln!(out, "\n⚪ LOW CONFIDENCE (Consider carefully):")?;
        write_outcomes(out, &report.low, claude_file)?;
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Summary")?;
    writeln!(out, "{RULE}\n")?;
    writeln!(out, "Total learnings: {}", report.total)?;
    writeln!(out, "Actionable: {}", report.actionable)?;
    writeln!(out, "High confidence: {}", report.high.len())?;
    writeln!(out, "Medium confidence: {}", report.medium.len())?;
    writeln!(out, "Low confidence: {}", report.low.len())?;
    writeln!(
        out,
        "\nNext step: Manually review and integrate suggested changes into {}",
        display_name(claude_file)
    )?;
    writeln!(out, "{RULE}\n")?;
    Ok(())
}

fn write_outcomes(
    out: &mut impl Write,
    outcomes: &[MatchOutcome],
    claude_file: &Path,
) -> io::Result<()> {
    for outcome in outcomes {
        match outcome {
            MatchOutcome::Placed(d) => {
                writeln!(out, "\n{RULE}")?;
                writeln!(out, "Learning: {}", truncate_chars(&d.pattern, MAX_PATTERN_LEN))?;
                writeln!(out, "Target Section: {} (line {})", d.target_name, d.heading_line)?;
                writeln!(out, "Confidence: {}", d.confidence)?;
                writeln!(out, "{RULE}\n")?;
                writeln!(out, "Suggested addition to {}:\n", claude_file.display())?;
                writeln!(out, "@@ Line {} @@", d.anchor_line)?;
                writeln!(out, "+{}\n", d.insertion_text)?;
            }
            MatchOutcome::NoSection { target_section } => {
                writeln!(out, "\n⚠️  No matching section found for: {target_section}")?;
            }
        }
    }
    Ok(())
}

/// File name for user-facing messages; falls back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
