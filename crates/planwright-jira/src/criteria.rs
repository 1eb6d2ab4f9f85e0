// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Acceptance criteria derivation.

const MARKER: &str = "acceptance criteria";

/// Extracts the acceptance criteria section from a flattened description.
///
/// The section starts after the first line mentioning "acceptance criteria"
/// (any case, heading or plain label) and runs to the next heading. Text on
/// the marker line after a colon is kept. Returns an empty string when there
/// is no such section.
pub fn from_description(description: &str) -> String {
    let mut lines = description.lines();
    let mut collected: Vec<&str> = Vec::new();

    for line in lines.by_ref() {
        let lower = line.to_ascii_lowercase();
        if let Some(pos) = lower.find(MARKER) {
            let rest = line[pos + MARKER.len()..]
                .trim_start_matches(['*', '_', ':', ' ', '\t'])
                .trim();
            if !rest.is_empty() {
                collected.push(rest);
            }
            for line in lines.by_ref() {
                if is_heading(line) {
                    break;
                }
                collected.push(line);
            }
            break;
        }
    }

    collected.join("\n").trim().to_string()
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix('#') {
        return rest.starts_with(['#', ' ']);
    }
    // Jira wiki markup: h1. .. h6.
    let bytes = trimmed.as_bytes();
    bytes.len() > 3
        && bytes[0] == b'h'
        && (b'1'..=b'6').contains(&bytes[1])
        && bytes[2] == b'.'
        && bytes[3] == b' '
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_runs_to_next_heading() {
        let desc = "## Overview\nUsers log in.\n\n## Acceptance Criteria\n- redirect to IdP\n- session cookie set\n\n## Notes\nnone";
        assert_eq!(
            from_description(desc),
            "- redirect to IdP\n- session cookie set"
        );
    }

    #[test]
    fn plain_label_with_inline_text() {
        let desc = "Build login.\nAcceptance criteria: user sees dashboard\n- remembers me";
        assert_eq!(
            from_description(desc),
            "user sees dashboard\n- remembers me"
        );
    }

    #[test]
    fn wiki_markup_headings() {
        let desc = "h2. Acceptance Criteria\n* one\n* two\nh2. Out of scope\n* three";
        assert_eq!(from_description(desc), "* one\n* two");
    }

    #[test]
    fn bold_marker_is_stripped() {
        let desc = "*Acceptance Criteria:*\n1. works";
        assert_eq!(from_description(desc), "1. works");
    }

    #[test]
    fn no_section_is_empty() {
        assert_eq!(from_description("Just a description\n## Notes"), "");
        assert_eq!(from_description(""), "");
    }
}
