/// Parser for session learnings documents.
///
/// The markdown has a loose, line-prefix-driven structure:
/// - `### <category>` starts a record
/// - the first `- <text>` bullet under the category is the pattern
/// - `**CLAUDE.md Section:**`, `**Confidence:**`, `**Actionable:**` fields
/// - `**Suggested Addition:**` followed by a ```` ```markdown ```` fence
///   holds the text to insert, which may itself contain nested code fences
///
/// Parser approach: each line is classified once into a `LineKind`, then fed
/// to a two-state machine (normal / capturing with a fence-depth counter).
/// The record under construction is an `Option<Draft>` replaced wholesale at
/// category boundaries, so dropping an incomplete record is a single
/// assignment. Incomplete records are dropped silently; the documents are
/// human-authored and expected to be imperfect.
use tracing::debug;

use crate::model::{Confidence, Learning};

const SECTION_LABEL: &str = "**CLAUDE.md Section:**";
const CONFIDENCE_LABEL: &str = "**Confidence:**";
const ACTIONABLE_LABEL: &str = "**Actionable:**";
const SUGGESTION_LABEL: &str = "**Suggested Addition:**";

/// What a single line means, decided once per line.
enum LineKind<'a> {
    /// `### <category>` heading
    Category(&'a str),
    /// `- <text>` bullet
    Bullet(&'a str),
    /// `**CLAUDE.md Section:**` field value
    SectionField(&'a str),
    /// `**Confidence:**` field value
    ConfidenceField(&'a str),
    /// `**Actionable:**` field value
    ActionableField(&'a str),
    /// `**Suggested Addition:**` label introducing the fenced text
    SuggestionLabel,
    /// Fence opener with a trailing tag, e.g. ```` ```markdown ````
    FenceOpen(&'a str),
    /// Bare ```` ``` ```` closer
    FenceClose,
    Plain,
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("### ") {
        return LineKind::Category(rest);
    }
    if let Some(rest) = line.strip_prefix(SECTION_LABEL) {
        return LineKind::SectionField(rest);
    }
    if let Some(rest) = line.strip_prefix(CONFIDENCE_LABEL) {
        return LineKind::ConfidenceField(rest);
    }
    if let Some(rest) = line.strip_prefix(ACTIONABLE_LABEL) {
        return LineKind::ActionableField(rest);
    }
    if line.starts_with(SUGGESTION_LABEL) {
        return LineKind::SuggestionLabel;
    }
    let trimmed = line.trim();
    if trimmed == "```" {
        return LineKind::FenceClose;
    }
    if let Some(tag) = trimmed.strip_prefix("```") {
        return LineKind::FenceOpen(tag);
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return LineKind::Bullet(rest);
    }
    LineKind::Plain
}

/// Strip surrounding emphasis markup and whitespace from a field value.
fn field_value(rest: &str) -> &str {
    rest.trim().trim_matches('*').trim()
}

/// A learning record under construction.
///
/// Replaced wholesale whenever a new category heading appears or a capture
/// ends, never mutated back to empty in place.
#[derive(Debug)]
struct Draft {
    category: String,
    source_line: usize,
    pattern: Option<String>,
    target_section: Option<String>,
    confidence: Option<Confidence>,
    actionable: Option<bool>,
}

impl Draft {
    fn new(category: &str, source_line: usize) -> Self {
        Self {
            category: category.to_string(),
            source_line,
            pattern: None,
            target_section: None,
            confidence: None,
            actionable: None,
        }
    }

    /// Materialize the record, or `None` if any required field is missing.
    fn finish(self, suggested_text: String) -> Option<Learning> {
        Some(Learning {
            category: self.category,
            pattern: self.pattern?,
            target_section: self.target_section?,
            confidence: self.confidence?,
            actionable: self.actionable?,
            suggested_text,
            source_line: self.source_line,
        })
    }
}

enum Mode {
    Normal,
    Capturing { depth: i32, buffer: Vec<String> },
}

/// Parse a learnings document into the records it fully describes.
///
/// A record is emitted only when all of category, pattern, target section,
/// confidence, actionable flag, and suggested text were observed before the
/// next category heading (or end of document). Anything less is dropped.
pub fn parse_learnings(content: &str) -> Vec<Learning> {
    let mut learnings = Vec::new();
    let mut category: Option<String> = None;
    let mut draft: Option<Draft> = None;
    let mut mode = Mode::Normal;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if let Mode::Capturing { depth, buffer } = &mut mode {
            let trimmed = line.trim();
            if trimmed == "```" {
                *depth -= 1;
                if *depth == 0 {
                    let suggested_text = buffer.join("\n");
                    if let Some(d) = draft.take() {
                        match d.finish(suggested_text) {
                            Some(learning) => {
                                debug!(
                                    line = line_no,
                                    pattern = %learning.pattern,
                                    "learning complete"
                                );
                                learnings.push(learning);
                            }
                            None => debug!(line = line_no, "incomplete record dropped at fence close"),
                        }
                    }
                    // A follow-on record may reuse the category without a new heading
                    draft = category.as_deref().map(|c| Draft::new(c, line_no));
                    mode = Mode::Normal;
                    continue;
                }
                // Closer of a nested fence: stays in the captured text
            } else if trimmed.starts_with("```") {
                *depth += 1;
            }
            buffer.push(line.to_string());
            continue;
        }

        match classify(line) {
            LineKind::Category(name) => {
                let name = name.trim();
                debug!(line = line_no, category = name, "category header");
                category = Some(name.to_string());
                draft = Some(Draft::new(name, line_no));
            }
            LineKind::Bullet(text) => {
                if let Some(d) = draft.as_mut() {
                    if d.pattern.is_none() {
                        d.pattern = Some(text.trim().to_string());
                    }
                }
            }
            LineKind::SectionField(rest) => {
                if let Some(d) = draft.as_mut() {
                    d.target_section = Some(field_value(rest).to_string());
                }
            }
            LineKind::ConfidenceField(rest) => {
                if let Some(d) = draft.as_mut() {
                    // Anything after `|` is a free-text annotation, not part of the tier
                    let value = field_value(rest).split('|').next().unwrap_or("").trim();
                    d.confidence = Some(Confidence::parse(value));
                }
            }
            LineKind::ActionableField(rest) => {
                if let Some(d) = draft.as_mut() {
                    d.actionable = Some(field_value(rest).contains("Yes"));
                }
            }
            LineKind::SuggestionLabel => {
                // Depth starts at 0: the ```markdown line that follows counts
                // as a fence opener and lands in the buffer.
                mode = Mode::Capturing {
                    depth: 0,
                    buffer: Vec::new(),
                };
            }
            LineKind::FenceOpen(_) if line.starts_with("```markdown") && category.is_some() => {
                mode = Mode::Capturing {
                    depth: 1,
                    buffer: Vec::new(),
                };
            }
            LineKind::FenceOpen(_) | LineKind::FenceClose | LineKind::Plain => {}
        }
    }

    learnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RECORD: [&str; 10] = [
        "### Testing Habits",
        "**Pattern Discovered:**",
        "- Run the full suite before pushing",
        "**CLAUDE.md Section:** Testing",
        "**Confidence:** High",
        "**Actionable:** Yes",
        "**Suggested Addition:**",
        "```markdown",
        "- Run `cargo test` before every push.",
        "```",
    ];

    #[test]
    fn parses_complete_record() {
        let learnings = parse_learnings(&FULL_RECORD.join("\n"));
        assert_eq!(learnings.len(), 1);

        let l = &learnings[0];
        assert_eq!(l.category, "Testing Habits");
        assert_eq!(l.pattern, "Run the full suite before pushing");
        assert_eq!(l.target_section, "Testing");
        assert_eq!(l.confidence, Confidence::High);
        assert!(l.actionable);
        // Label-entry capture keeps the opener line in the captured text
        assert_eq!(
            l.suggested_text,
            "```markdown\n- Run `cargo test` before every push."
        );
        assert_eq!(l.source_line, 1);
    }

    #[test]
    fn missing_required_field_drops_record() {
        // Indices of the pattern bullet and the three labeled fields
        for skip in [2usize, 3, 4, 5] {
            let partial: Vec<&str> = FULL_RECORD
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, l)| *l)
                .collect();
            let learnings = parse_learnings(&partial.join("\n"));
            assert!(
                learnings.is_empty(),
                "removing line {skip} should drop the record"
            );
        }
    }

    #[test]
    fn nested_fences_are_preserved_verbatim() {
        let doc = [
            "### Helper Snippets",
            "- Keep helpers next to their callers",
            "**CLAUDE.md Section:** Code Organization",
            "**Confidence:** High",
            "**Actionable:** Yes",
            "**Suggested Addition:**",
            "```markdown",
            "Use this helper:",
            "```rust",
            "fn helper() {}",
            "```",
            "Keep it small.",
            "```",
        ]
        .join("\n");

        let learnings = parse_learnings(&doc);
        assert_eq!(learnings.len(), 1);
        assert_eq!(
            learnings[0].suggested_text,
            "```markdown\nUse this helper:\n```rust\nfn helper() {}\n```\nKeep it small."
        );
    }

    #[test]
    fn direct_fence_entry_excludes_the_opener() {
        let doc = [
            "### Review Notes",
            "- Prefer small PRs",
            "**CLAUDE.md Section:** Code Review",
            "**Confidence:** Medium",
            "**Actionable:** Yes",
            "```markdown",
            "- Keep PRs under 400 lines.",
            "```",
        ]
        .join("\n");

        let learnings = parse_learnings(&doc);
        assert_eq!(learnings.len(), 1);
        assert_eq!(learnings[0].suggested_text, "- Keep PRs under 400 lines.");
        assert_eq!(learnings[0].confidence, Confidence::Medium);
    }

    #[test]
    fn confidence_drops_pipe_annotation() {
        let mut lines = FULL_RECORD;
        lines[4] = "**Confidence:** High | pattern seen three times";
        let learnings = parse_learnings(&lines.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert_eq!(learnings[0].confidence, Confidence::High);
    }

    #[test]
    fn unrecognized_confidence_reports_as_low() {
        let mut lines = FULL_RECORD;
        lines[4] = "**Confidence:** Speculative";
        let learnings = parse_learnings(&lines.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert_eq!(learnings[0].confidence, Confidence::Low);
    }

    #[test]
    fn actionable_matches_yes_as_substring() {
        let mut lines = FULL_RECORD;
        lines[5] = "**Actionable:** Yes, with caveats";
        let learnings = parse_learnings(&lines.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert!(learnings[0].actionable);

        lines[5] = "**Actionable:** No";
        let learnings = parse_learnings(&lines.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert!(!learnings[0].actionable);
    }

    #[test]
    fn new_category_discards_incomplete_record() {
        let mut doc = vec![
            "### Abandoned Category",
            "- This record never finishes",
            "**CLAUDE.md Section:** Nowhere",
        ];
        doc.extend(FULL_RECORD);
        let learnings = parse_learnings(&doc.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert_eq!(learnings[0].category, "Testing Habits");
    }

    #[test]
    fn eof_during_capture_discards_record() {
        // Drop the closing fence
        let doc = FULL_RECORD[..9].join("\n");
        assert!(parse_learnings(&doc).is_empty());
    }

    #[test]
    fn only_the_first_bullet_becomes_the_pattern() {
        let mut doc: Vec<&str> = FULL_RECORD.to_vec();
        doc.insert(3, "- A second bullet that should be ignored");
        let learnings = parse_learnings(&doc.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert_eq!(learnings[0].pattern, "Run the full suite before pushing");
    }

    #[test]
    fn multiple_learnings_share_a_category() {
        let doc = [
            "### Tooling",
            "- First insight",
            "**CLAUDE.md Section:** Tooling",
            "**Confidence:** High",
            "**Actionable:** Yes",
            "**Suggested Addition:**",
            "```markdown",
            "First addition.",
            "```",
            "- Second insight",
            "**CLAUDE.md Section:** Tooling",
            "**Confidence:** Medium",
            "**Actionable:** Yes",
            "**Suggested Addition:**",
            "```markdown",
            "Second addition.",
            "```",
        ]
        .join("\n");

        let learnings = parse_learnings(&doc);
        assert_eq!(learnings.len(), 2);
        assert_eq!(learnings[0].category, "Tooling");
        assert_eq!(learnings[1].category, "Tooling");
        assert_eq!(learnings[1].pattern, "Second insight");
        // The follow-on record starts at the fence that closed the first one
        assert_eq!(learnings[1].source_line, 9);
    }

    #[test]
    fn emitted_learnings_never_exceed_category_headers() {
        let mut doc = vec!["### Empty One", "### Empty Two"];
        doc.extend(FULL_RECORD);
        let learnings = parse_learnings(&doc.join("\n"));
        assert_eq!(learnings.len(), 1);
    }

    #[test]
    fn suggestion_without_category_is_ignored() {
        let doc = [
            "**Suggested Addition:**",
            "```markdown",
            "Orphaned text.",
            "```",
        ]
        .join("\n");
        assert!(parse_learnings(&doc).is_empty());
    }

    #[test]
    fn emphasis_markup_is_stripped_from_field_values() {
        let mut lines = FULL_RECORD;
        lines[3] = "**CLAUDE.md Section:** *Testing*";
        let learnings = parse_learnings(&lines.join("\n"));
        assert_eq!(learnings.len(), 1);
        assert_eq!(learnings[0].target_section, "Testing");
    }
}
