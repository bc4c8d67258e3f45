//! User interface module - terminal output for the commit workflow.
//!
//! All output is produced by the pure formatting functions in `formatter`;
//! gitplus never prompts, so there is no interactive half here.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_change_summary, display_commit_message, display_error, display_fallback_warning,
    display_hint, display_nothing_to_commit, display_success,
};
