use std::fmt;

use serde::{Deserialize, Serialize};

/// A single learning extracted from a session learnings document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learning {
    /// Enclosing `### ` heading text, e.g. "Git Workflow Patterns"
    pub category: String,
    /// One-line description from the first bullet under the category
    pub pattern: String,
    /// Free-text label naming the intended destination section
    pub target_section: String,
    /// Confidence tier from the labeled field
    pub confidence: Confidence,
    /// Whether the learning should be acted on
    pub actionable: bool,
    /// Verbatim text captured from the suggested-addition fence,
    /// including any nested code fences
    pub suggested_text: String,
    /// 1-based line number where this record began
    pub source_line: usize,
}

/// Confidence tier parsed from a `**Confidence:**` field.
///
/// Anything that is not exactly `High` or `Medium` reports as `Low`,
/// matching how the original tool buckets its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Map a cleaned field value to a tier. Case-sensitive.
    pub fn parse(value: &str) -> Self {
        match value {
            "High" => Confidence::High,
            "Medium" => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        };
        f.write_str(s)
    }
}

/// An addressable insertion point in the knowledge-base document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Nearest preceding heading text, heading syntax stripped
    pub name: String,
    /// Lowercase-hyphen token from the `<!-- LEARNINGS:... -->` marker
    pub marker: String,
    /// 1-based line number of the marker; insertions go right after it
    pub anchor_line: usize,
    /// 1-based line number of the governing heading
    pub heading_line: usize,
}

/// Computed placement for one matched, actionable learning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    /// Pattern text of the source learning (for display)
    pub pattern: String,
    /// Name of the matched section
    pub target_name: String,
    /// Line of the matched section's heading
    pub heading_line: usize,
    /// Line the insertion should be appended after
    pub anchor_line: usize,
    /// Confidence tier of the source learning
    pub confidence: Confidence,
    /// Verbatim text to insert
    pub insertion_text: String,
}
