/// Matches a learning's free-text target label against located sections.
///
/// The label is normalized to the marker alphabet (lowercase, hyphens for
/// spaces) and compared by substring against each marker in document order.
/// First match wins; there is no scoring or ambiguity resolution.
use crate::model::{Directive, Learning, Section};

/// Outcome of placing one actionable learning.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// A section matched; here is where and what to insert.
    Placed(Directive),
    /// No marker contained the normalized label.
    NoSection { target_section: String },
}

/// Select the first section whose marker contains the learning's normalized
/// target label, and render the placement directive for it.
pub fn map_learning(learning: &Learning, sections: &[Section]) -> MatchOutcome {
    let needle = normalize_label(&learning.target_section);

    match sections.iter().find(|s| s.marker.contains(&needle)) {
        Some(section) => MatchOutcome::Placed(Directive {
            pattern: learning.pattern.clone(),
            target_name: section.name.clone(),
            heading_line: section.heading_line,
            anchor_line: section.anchor_line,
            confidence: learning.confidence,
            insertion_text: learning.suggested_text.clone(),
        }),
        None => MatchOutcome::NoSection {
            target_section: learning.target_section.clone(),
        },
    }
}

fn normalize_label(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}
