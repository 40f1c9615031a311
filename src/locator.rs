/// Locator for marked sections in the knowledge-base document.
///
/// A section is any heading followed within a bounded window by an HTML
/// comment marker of the form `<!-- LEARNINGS:lowercase-hyphen-token -->`.
/// The marker line is the insertion anchor; the nearest heading above it
/// gives the section its name. Several markers may sit under one heading,
/// each yielding its own section.
use regex::Regex;
use tracing::warn;

use crate::model::Section;

/// How many lines above a marker to search for its governing heading.
const HEADING_LOOKBACK: usize = 19;

/// Scan the document for section markers, in document order.
///
/// A marker with no heading within the lookback window is skipped with a
/// warning log; it is authoring noise, not a fatal condition.
pub fn locate_sections(content: &str) -> Vec<Section> {
    let marker_re = Regex::new(r"<!-- LEARNINGS:([a-z-]+) -->").expect("valid regex");

    let lines: Vec<&str> = content.lines().collect();
    let mut sections = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = marker_re.captures(line) else {
            continue;
        };
        let marker = caps[1].to_string();

        let window_start = idx.saturating_sub(HEADING_LOOKBACK);
        let heading = lines[window_start..idx]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, l)| l.starts_with('#'))
            .map(|(offset, l)| {
                (window_start + offset + 1, l.trim_matches('#').trim().to_string())
            });

        match heading {
            Some((heading_line, name)) => sections.push(Section {
                name,
                marker,
                anchor_line: idx + 1,
                heading_line,
            }),
            None => warn!(
                line = idx + 1,
                marker = %marker,
                "marker has no heading within the lookback window, ignoring"
            ),
        }
    }

    sections
}
