//! Pure formatting functions for UI output.
//!
//! Line builders (`format_*`) return plain strings so they can be tested;
//! the `display_*` functions add colour with `console` and print.

use console::style;

use crate::fallback::ChangelogFallback;
use crate::git::FileChange;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a remediation hint.
pub fn display_hint(message: &str) {
    eprintln!("{} {}", style("hint:").cyan(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Header printed above the change summary.
pub fn format_summary_header(initial_commit: bool) -> &'static str {
    if initial_commit {
        "Initial commit:"
    } else {
        "Changes:"
    }
}

/// One summary line: change symbol, space, path.
pub fn format_change_line(change: &FileChange) -> String {
    format!("{} {}", change.change.symbol(), change.path)
}

/// Display what the commit will contain.
///
/// # Arguments
/// * `initial_commit` - Whether the repository has no commit yet
/// * `changes` - Per-file changes, already ordered
pub fn display_change_summary(initial_commit: bool, changes: &[FileChange]) {
    println!("{}", style(format_summary_header(initial_commit)).bold());
    for change in changes {
        println!("  {}", format_change_line(change));
    }
}

/// Display why the changelog was not used when it looks like a mistake.
pub fn display_fallback_warning(reason: &ChangelogFallback) {
    eprintln!(
        "{} changelog not used: {}",
        style("⚠ WARNING:").yellow(),
        reason
    );
}

/// Display the final commit message.
pub fn display_commit_message(message: &str) {
    println!("{} {}", style("Commit:").bold(), message);
}

/// Report that the working tree is clean.
pub fn display_nothing_to_commit() {
    println!("Nothing to commit!");
}
