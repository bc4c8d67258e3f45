//! Chooses where the commit message and version come from.

use crate::changelog::{inspect_unreleased, UnreleasedEntry};
use crate::fallback::ChangelogFallback;

/// How the commit message and version are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// Version is incremented; `message`, if any, follows the timestamp
    Explicit { message: Option<String> },
    /// Version and message come from an unreleased changelog entry
    FromChangelog { entry: UnreleasedEntry },
}

/// Inputs to scenario selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionInput<'a> {
    /// Message given on the command line
    pub cli_message: Option<&'a str>,
    /// Changelog content, if the file exists
    pub changelog: Option<&'a str>,
    /// Content of the commit note file, if it changed
    pub note: Option<&'a str>,
    /// Token that flags an unreleased changelog heading
    pub marker: &'a str,
}

/// The text as given, unless it is only whitespace.
fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Picks the scenario and reports why the changelog was skipped, if it was.
///
/// Priority:
/// 1. A command-line message selects [`Scenario::Explicit`]
/// 2. A parsable unreleased changelog entry selects [`Scenario::FromChangelog`]
/// 3. A non-empty note selects [`Scenario::Explicit`] with the note text
/// 4. Otherwise [`Scenario::Explicit`] without a message
///
/// The changelog is not inspected at all when a command-line message is
/// given, so no fallback reason is reported in that case.
pub fn explain(input: &SelectionInput<'_>) -> (Scenario, Option<ChangelogFallback>) {
    if let Some(message) = non_blank(input.cli_message) {
        return (
            Scenario::Explicit {
                message: Some(message.to_string()),
            },
            None,
        );
    }

    let fallback = match input.changelog {
        Some(document) => match inspect_unreleased(document, input.marker) {
            Ok(entry) => return (Scenario::FromChangelog { entry }, None),
            Err(reason) => reason,
        },
        None => ChangelogFallback::MissingFile,
    };

    let scenario = Scenario::Explicit {
        message: non_blank(input.note).map(|note| note.trim().to_string()),
    };
    (scenario, Some(fallback))
}

/// Picks the scenario; see [`explain`] for the rules.
pub fn select(input: &SelectionInput<'_>) -> Scenario {
    explain(input).0
}
