//! Main workflow orchestration logic
//!
//! This module sequences the repository calls around scenario selection and
//! the commit plan. It is kept apart from `main.rs` so the workflow can be
//! driven programmatically (and tested) without clap or a real repository.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{GitPlusError, Result};
use crate::git::{Repository, RepositoryChangeSet, RepositoryLocation};
use crate::plan;
use crate::scenario::{self, SelectionInput};
use crate::ui;
use crate::version::SemanticVersion;

/// Arguments for the commit workflow
///
/// Mirrors the CLI arguments in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitWorkflowArgs {
    /// Free-text words given on the command line
    pub message_words: Vec<String>,
}

impl CommitWorkflowArgs {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommitWorkflowArgs {
            message_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// The explicit message: all words joined by single spaces.
    pub fn message(&self) -> Option<String> {
        let joined = self.message_words.join(" ");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// The change set was empty; nothing was written or committed
    NothingToCommit,
    /// Exactly one commit was created
    Committed {
        version: SemanticVersion,
        message: String,
        commit_id: String,
    },
}

/// Reads a file that may legitimately be absent or unreadable.
fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable file");
            None
        }
    }
}

fn format_timestamp(now: &DateTime<Local>, pattern: &str) -> Result<String> {
    let mut timestamp = String::new();
    write!(timestamp, "{}", now.format(pattern)).map_err(|_| {
        GitPlusError::config(format!("invalid timestamp_format '{}'", pattern))
    })?;
    Ok(timestamp)
}

/// Main commit workflow
///
/// Orchestrates a single commit:
/// 1. Capture the change set; stop if it is empty
/// 2. Stage every changed, untracked and staged path
/// 3. Print the per-file summary
/// 4. Select the scenario (CLI message, changelog, note, bare)
/// 5. Compose the plan and write the version marker and changelog
/// 6. Stage the written files and commit
///
/// # Arguments
///
/// * `repo` - Version-control collaborator
/// * `location` - Repository root the workflow writes into
/// * `args` - Workflow arguments (message words)
/// * `config` - gitplus configuration
/// * `now` - Time stamped into generated messages
pub fn run_commit_workflow<R: Repository + ?Sized>(
    repo: &R,
    location: &RepositoryLocation,
    args: &CommitWorkflowArgs,
    config: &Config,
    now: DateTime<Local>,
) -> Result<WorkflowOutcome> {
    let changes = RepositoryChangeSet::capture(repo)?;
    if changes.is_empty() {
        ui::display_nothing_to_commit();
        return Ok(WorkflowOutcome::NothingToCommit);
    }

    for path in changes.paths_to_stage() {
        repo.stage(path)?;
    }
    ui::display_change_summary(!changes.has_prior_commit, &changes.summary());

    let root = location.root();
    let note = if changes.touches(&config.files.note) {
        read_optional(&root.join(&config.files.note))
    } else {
        None
    };
    let changelog = read_optional(&root.join(&config.files.changelog));
    let cli_message = args.message();

    let (scenario, fallback) = scenario::explain(&SelectionInput {
        cli_message: cli_message.as_deref(),
        changelog: changelog.as_deref(),
        note: note.as_deref(),
        marker: &config.changelog.unreleased_marker,
    });

    if let Some(reason) = &fallback {
        debug!(%reason, "changelog not used");
        if reason.is_authoring_mistake() {
            ui::display_fallback_warning(reason);
        }
    }

    let timestamp = format_timestamp(&now, &config.message.timestamp_format)?;
    let plan = plan::compose(&scenario, root, &config.files, &timestamp)?;

    for path in plan.apply(root)? {
        repo.stage(&path)?;
    }

    ui::display_commit_message(&plan.message);
    let commit_id = repo.commit(&plan.message)?;
    debug!(%commit_id, version = %plan.version, "created commit");

    Ok(WorkflowOutcome::Committed {
        version: plan.version,
        message: plan.message,
        commit_id,
    })
}
