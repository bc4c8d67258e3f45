use std::cell::RefCell;

use crate::error::{GitPlusError, Result};
use crate::git::{FileChange, Repository};

/// Mock repository for testing without actual git operations
///
/// Change lists are fixed at construction; `stage` and `commit` are recorded
/// so tests can assert on them.
#[derive(Debug, Default)]
pub struct MockRepository {
    has_prior_commit: bool,
    working_tree: Vec<FileChange>,
    untracked: Vec<String>,
    staged: Vec<FileChange>,
    fail_commit: bool,
    stage_log: RefCell<Vec<String>>,
    commits: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new mock repository without commits or changes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository whose HEAD already has a commit
    pub fn with_history() -> Self {
        MockRepository {
            has_prior_commit: true,
            ..Self::default()
        }
    }

    pub fn add_working_tree_change(&mut self, change: FileChange) {
        self.working_tree.push(change);
    }

    pub fn add_untracked(&mut self, path: impl Into<String>) {
        self.untracked.push(path.into());
    }

    pub fn add_staged(&mut self, change: FileChange) {
        self.staged.push(change);
    }

    /// Make every `commit` call fail
    pub fn fail_commits(&mut self) {
        self.fail_commit = true;
    }

    /// Paths passed to `stage`, in call order
    pub fn staged_paths(&self) -> Vec<String> {
        self.stage_log.borrow().clone()
    }

    /// Messages passed to successful `commit` calls
    pub fn commit_messages(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn has_prior_commit(&self) -> Result<bool> {
        Ok(self.has_prior_commit)
    }

    fn working_tree_diffs(&self) -> Result<Vec<FileChange>> {
        Ok(self.working_tree.clone())
    }

    fn untracked_files(&self) -> Result<Vec<String>> {
        Ok(self.untracked.clone())
    }

    fn staged_diffs(&self) -> Result<Vec<FileChange>> {
        Ok(self.staged.clone())
    }

    fn stage(&self, path: &str) -> Result<()> {
        let mut log = self.stage_log.borrow_mut();
        if !log.iter().any(|p| p == path) {
            log.push(path.to_string());
        }
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        if self.fail_commit {
            return Err(GitPlusError::Git(git2::Error::from_str("commit refused")));
        }
        let mut commits = self.commits.borrow_mut();
        commits.push(message.to_string());
        Ok(format!("{:040x}", commits.len()))
    }
}
