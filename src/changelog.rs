//! Unreleased changelog entry extraction and release rewrite.
//!
//! The only structure recognised in a changelog is the second-level heading
//! (`## ...`). The first such heading containing the unreleased marker
//! supplies the version, and everything up to the next second-level heading
//! is its body.

use regex::Regex;

use crate::fallback::ChangelogFallback;
use crate::version::SemanticVersion;

/// Marker token used when the configuration does not override it.
pub const DEFAULT_UNRELEASED_MARKER: &str = "[Unreleased]";

const HEADING_MARKER: &str = "##";
const VERSION_PATTERN: &str = r"\d+\.\d+\.\d+";

/// An unreleased changelog entry, ready to become a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreleasedEntry {
    /// Version taken verbatim from the heading
    pub version: SemanticVersion,
    /// Heading line with the unreleased marker removed
    pub heading_text: String,
    /// Entry body with heading markers stripped from each line
    pub body: String,
    /// Commit message: heading title, blank line, body
    pub message: String,
    /// The full changelog with only the matched heading rewritten
    pub released_document: String,
}

/// One line of a document with its byte span.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// Offset of the first byte of the line
    start: usize,
    /// Offset just past the line content, before any `\r\n` or `\n`
    content_end: usize,
    /// Offset just past the line terminator
    end: usize,
    text: &'a str,
}

fn lines(document: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    document.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let text = raw
            .strip_suffix('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .unwrap_or(raw);
        Line {
            start,
            content_end: start + text.len(),
            end: offset,
            text,
        }
    })
}

/// `## Title` or a bare `##`, but not `### Title`.
fn is_second_level_heading(line: &str) -> bool {
    match line.strip_prefix(HEADING_MARKER) {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

/// Strips a leading run of `#` and the whitespace after it.
fn strip_heading_prefix(line: &str) -> &str {
    let rest = line.trim_start_matches('#');
    if rest.len() == line.len() {
        line
    } else {
        rest.trim_start()
    }
}

fn clean_body(raw: &str) -> String {
    raw.lines()
        .map(strip_heading_prefix)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn is_version_suffix(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')
}

fn find_version(heading: &str, searched: &str) -> Result<SemanticVersion, ChangelogFallback> {
    let re = Regex::new(VERSION_PATTERN).map_err(|_| ChangelogFallback::MissingVersion {
        heading: heading.to_string(),
    })?;

    let found = re
        .find(searched)
        .ok_or_else(|| ChangelogFallback::MissingVersion {
            heading: heading.to_string(),
        })?;

    let after = &searched[found.end()..];
    let suffix_len: usize = after
        .chars()
        .take_while(|c| is_version_suffix(*c))
        .map(char::len_utf8)
        .sum();

    if suffix_len > 0 {
        return Err(ChangelogFallback::UnsupportedVersion {
            heading: heading.to_string(),
            token: searched[found.start()..found.end() + suffix_len].to_string(),
        });
    }

    Ok(SemanticVersion::new(found.as_str()))
}

/// Locates the first unreleased entry and explains why when there is none.
///
/// # Arguments
/// * `document` - Full changelog text
/// * `marker` - Literal token that flags a heading as unreleased
///
/// # Returns
/// * `Ok(UnreleasedEntry)` - Entry found with an `X.Y.Z` version
/// * `Err(ChangelogFallback)` - Why the changelog cannot drive this commit
pub fn inspect_unreleased(
    document: &str,
    marker: &str,
) -> Result<UnreleasedEntry, ChangelogFallback> {
    let not_found = || ChangelogFallback::NoUnreleasedHeading {
        marker: marker.to_string(),
    };
    if marker.is_empty() {
        return Err(not_found());
    }

    let mut all_lines = lines(document);
    let heading = all_lines
        .by_ref()
        .find(|line| {
            is_second_level_heading(line.text) && line.text[HEADING_MARKER.len()..].contains(marker)
        })
        .ok_or_else(not_found)?;

    let body_end = all_lines
        .find(|line| is_second_level_heading(line.text))
        .map(|line| line.start)
        .unwrap_or(document.len());

    let title = heading.text[HEADING_MARKER.len()..].replacen(marker, "", 1);
    let version = find_version(heading.text, &title)?;

    let heading_text = format!("{}{}", HEADING_MARKER, title).trim_end().to_string();
    let body = clean_body(&document[heading.end..body_end]);

    let subject = strip_heading_prefix(&heading_text);
    let message = if body.is_empty() {
        subject.to_string()
    } else {
        format!("{}\n\n{}", subject, body)
    };

    let released_document = format!(
        "{}{}{}",
        &document[..heading.start],
        heading_text,
        &document[heading.content_end..]
    );

    Ok(UnreleasedEntry {
        version,
        heading_text,
        body,
        message,
        released_document,
    })
}

/// Returns the first unreleased entry, or `None` when the changelog cannot
/// drive the commit.
pub fn try_extract_unreleased(document: &str, marker: &str) -> Option<UnreleasedEntry> {
    inspect_unreleased(document, marker).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = DEFAULT_UNRELEASED_MARKER;

    const SAMPLE: &str = "# Changelog\n\n\
## 1.5.0 - [2025-02-10 14:50:46] [Unreleased]\n\
### Added\n\
- feature X\n\
\n\
## 1.4.0 - [2025-01-02 09:00:00]\n\
### Fixed\n\
- bug Y\n";

    #[test]
    fn test_extracts_version_verbatim() {
        let entry = try_extract_unreleased(SAMPLE, MARKER).unwrap();
        assert_eq!(entry.version.as_str(), "1.5.0");
    }

    #[test]
    fn test_heading_text_drops_marker() {
        let entry = try_extract_unreleased(SAMPLE, MARKER).unwrap();
        assert_eq!(entry.heading_text, "## 1.5.0 - [2025-02-10 14:50:46]");
    }

    #[test]
    fn test_body_stops_at_next_second_level_heading() {
        let entry = try_extract_unreleased(SAMPLE, MARKER).unwrap();
        assert_eq!(entry.body, "Added\n- feature X");
        assert!(!entry.body.contains("bug Y"));
    }

    #[test]
    fn test_message_layout() {
        let entry = try_extract_unreleased(SAMPLE, MARKER).unwrap();
        assert_eq!(
            entry.message,
            "1.5.0 - [2025-02-10 14:50:46]\n\nAdded\n- feature X"
        );
    }

    #[test]
    fn test_released_document_only_changes_heading() {
        let entry = try_extract_unreleased(SAMPLE, MARKER).unwrap();
        let expected = SAMPLE.replacen(" [Unreleased]", "", 1);
        assert_eq!(entry.released_document, expected);
        assert!(!entry.released_document.contains(MARKER));
    }

    #[test]
    fn test_body_runs_to_end_of_document() {
        let doc = "## 2.0.0 [Unreleased]\n- one\n- two\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.body, "- one\n- two");
    }

    #[test]
    fn test_body_keeps_list_markers_and_indentation() {
        let doc = "## 2.0.0 [Unreleased]\n\n#### Changed\n  - nested item\n- top item\n   \n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.body, "Changed\n  - nested item\n- top item");
    }

    #[test]
    fn test_body_is_trimmed_as_a_whole() {
        let doc = "## 1.0.0 [Unreleased]\n\n   - indented first\n- second\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.body, "- indented first\n- second");
        assert_eq!(entry.message, "1.0.0\n\n- indented first\n- second");
    }

    #[test]
    fn test_third_level_heading_is_not_a_boundary() {
        let doc = "## 1.0.0 [Unreleased]\n### Added\n- a\n### Removed\n- b\n## 0.9.0\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.body, "Added\n- a\nRemoved\n- b");
    }

    #[test]
    fn test_third_level_unreleased_heading_is_ignored() {
        let doc = "### 1.0.0 [Unreleased]\n- a\n";
        assert_eq!(
            inspect_unreleased(doc, MARKER),
            Err(ChangelogFallback::NoUnreleasedHeading {
                marker: MARKER.to_string()
            })
        );
    }

    #[test]
    fn test_empty_body_message_is_title_only() {
        let doc = "## 3.1.4 [Unreleased]\n## 3.1.3\n- old\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.body, "");
        assert_eq!(entry.message, "3.1.4");
    }

    #[test]
    fn test_no_marker_returns_none_and_is_repeatable() {
        let doc = "# Changelog\n\n## 1.0.0\n- initial\n";
        assert!(try_extract_unreleased(doc, MARKER).is_none());
        assert!(try_extract_unreleased(doc, MARKER).is_none());
        assert_eq!(
            inspect_unreleased(doc, MARKER),
            inspect_unreleased(doc, MARKER)
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(try_extract_unreleased("", MARKER).is_none());
    }

    #[test]
    fn test_marker_without_version_falls_back() {
        let doc = "## Next release [Unreleased]\n- thing\n";
        assert_eq!(
            inspect_unreleased(doc, MARKER),
            Err(ChangelogFallback::MissingVersion {
                heading: "## Next release [Unreleased]".to_string()
            })
        );
    }

    #[test]
    fn test_prerelease_version_falls_back() {
        let doc = "## 1.5.0-beta [Unreleased]\n- thing\n";
        match inspect_unreleased(doc, MARKER) {
            Err(ChangelogFallback::UnsupportedVersion { token, .. }) => {
                assert_eq!(token, "1.5.0-beta")
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_four_segment_version_falls_back() {
        let doc = "## 1.5.0.2 [Unreleased]\n";
        assert!(try_extract_unreleased(doc, MARKER).is_none());
    }

    #[test]
    fn test_version_prefix_and_brackets_allowed() {
        let doc = "## [v2.3.4] - 2025-03-01 [Unreleased]\n- x\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.version.as_str(), "2.3.4");
    }

    #[test]
    fn test_version_inside_marker_is_not_used() {
        let doc = "## Upcoming [Unreleased]\n";
        assert!(try_extract_unreleased(doc, "[Unreleased]").is_none());
        let doc = "## Upcoming 1.0.0\n";
        assert!(try_extract_unreleased(doc, "1.0.0").is_none());
    }

    #[test]
    fn test_first_unreleased_heading_wins() {
        let doc = "## 2.0.0 [Unreleased]\n- new\n## 1.9.0 [Unreleased]\n- older\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.version.as_str(), "2.0.0");
        assert_eq!(
            entry.released_document,
            "## 2.0.0\n- new\n## 1.9.0 [Unreleased]\n- older\n"
        );
    }

    #[test]
    fn test_rewrite_ignores_identical_text_elsewhere() {
        let doc = "Write headings like `## 1.0.0 [Unreleased]` in this file.\n\n\
## 1.0.0 [Unreleased]\n- feature\n\n\
## 0.9.0\n## 1.0.0 [Unreleased] copy\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        let expected = "Write headings like `## 1.0.0 [Unreleased]` in this file.\n\n\
## 1.0.0\n- feature\n\n\
## 0.9.0\n## 1.0.0 [Unreleased] copy\n";
        assert_eq!(entry.released_document, expected);
        assert_eq!(entry.body, "- feature");
    }

    #[test]
    fn test_crlf_terminator_is_preserved() {
        let doc = "## 1.2.3 [Unreleased]\r\n- fix\r\n## 1.2.2\r\n";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.heading_text, "## 1.2.3");
        assert_eq!(entry.body, "- fix");
        assert_eq!(entry.released_document, "## 1.2.3\r\n- fix\r\n## 1.2.2\r\n");
    }

    #[test]
    fn test_heading_without_trailing_newline() {
        let doc = "## 0.1.0 [Unreleased]";
        let entry = try_extract_unreleased(doc, MARKER).unwrap();
        assert_eq!(entry.released_document, "## 0.1.0");
        assert_eq!(entry.message, "0.1.0");
    }

    #[test]
    fn test_custom_marker() {
        let doc = "## 4.0.0 (draft)\n- big change\n";
        let entry = try_extract_unreleased(doc, "(draft)").unwrap();
        assert_eq!(entry.version.as_str(), "4.0.0");
        assert!(try_extract_unreleased(doc, MARKER).is_none());
    }

    #[test]
    fn test_empty_marker_never_matches() {
        assert!(try_extract_unreleased("## 1.0.0\n", "").is_none());
    }
}
