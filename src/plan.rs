//! Commit plan: the final version, message and files to write.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::FilesConfig;
use crate::error::Result;
use crate::scenario::Scenario;
use crate::version::{SemanticVersion, VersionStore};

/// Everything needed to produce the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    /// Version persisted to the marker file
    pub version: SemanticVersion,
    /// Final commit message
    pub message: String,
    /// Repository-relative path of the version marker
    pub version_file: String,
    /// Repository-relative path to new content for every other file
    pub files_to_write: BTreeMap<String, String>,
}

/// Builds the commit plan for a scenario.
///
/// - [`Scenario::Explicit`]: loads the current version, increments it and
///   formats `"<version> [<timestamp>]"`, followed by `": <message>"` when a
///   message is present. The changelog is left alone.
/// - [`Scenario::FromChangelog`]: uses the entry's version and message as
///   they are and schedules the released changelog for writing.
///
/// # Arguments
/// * `scenario` - Selected scenario
/// * `root` - Repository working directory
/// * `files` - Names of the version marker and changelog
/// * `timestamp` - Already formatted local time
pub fn compose(
    scenario: &Scenario,
    root: &Path,
    files: &FilesConfig,
    timestamp: &str,
) -> Result<CommitPlan> {
    let mut files_to_write = BTreeMap::new();

    let (version, message) = match scenario {
        Scenario::Explicit { message } => {
            let current = VersionStore::new(root.join(&files.version)).load()?;
            let version = current.increment();
            debug!(from = %current, to = %version, "incremented version");

            let mut text = format!("{} [{}]", version, timestamp);
            if let Some(message) = message {
                text.push_str(": ");
                text.push_str(message);
            }
            (version, text)
        }
        Scenario::FromChangelog { entry } => {
            files_to_write.insert(files.changelog.clone(), entry.released_document.clone());
            (entry.version.clone(), entry.message.clone())
        }
    };

    Ok(CommitPlan {
        version,
        message,
        version_file: files.version.clone(),
        files_to_write,
    })
}

impl CommitPlan {
    /// Writes every planned file below `root` and returns the relative paths
    /// written, in order, for staging.
    ///
    /// The version marker is written first. If a later write fails the
    /// marker already holds the new version while the changelog is unchanged.
    pub fn apply(&self, root: &Path) -> Result<Vec<String>> {
        VersionStore::new(root.join(&self.version_file)).save(&self.version)?;
        debug!(path = %self.version_file, version = %self.version, "wrote version marker");

        let mut written = Vec::with_capacity(self.files_to_write.len() + 1);
        written.push(self.version_file.clone());
        for (relative, content) in &self.files_to_write {
            fs::write(root.join(relative), content)?;
            debug!(path = %relative, "wrote planned file");
            written.push(relative.clone());
        }
        Ok(written)
    }
}
