//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations gitplus needs: inspecting changes, staging paths and creating
//! a commit.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! Locating the repository is kept separate from opening it: [locate] walks
//! up from a start directory and returns a [RepositoryLocation], which is
//! then handed to [Git2Repository::open].

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{GitPlusError, Result};

/// Name of the repository marker searched for by [locate].
pub const GIT_DIR: &str = ".git";

/// Kind of change recorded for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Other,
}

impl ChangeType {
    /// Single-character marker used in the change summary
    pub fn symbol(&self) -> char {
        match self {
            ChangeType::Added => '+',
            ChangeType::Modified => '*',
            ChangeType::Deleted => '-',
            ChangeType::Other => '?',
        }
    }
}

/// A changed path, relative to the repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub change: ChangeType,
}

impl FileChange {
    pub fn new(path: impl Into<String>, change: ChangeType) -> Self {
        FileChange {
            path: path.into(),
            change,
        }
    }
}

/// Version-control operations used by the commit workflow
///
/// All paths are relative to the repository root and use `/` separators.
pub trait Repository {
    /// Whether HEAD points at a commit
    fn has_prior_commit(&self) -> Result<bool>;

    /// Unstaged modifications and deletions of tracked files
    fn working_tree_diffs(&self) -> Result<Vec<FileChange>>;

    /// Files not tracked and not ignored
    fn untracked_files(&self) -> Result<Vec<String>>;

    /// Index changes relative to HEAD; empty without a prior commit
    fn staged_diffs(&self) -> Result<Vec<FileChange>>;

    /// Marks a path for inclusion in the next commit. Idempotent.
    fn stage(&self, path: &str) -> Result<()>;

    /// Commits the staged content and returns the new commit id
    fn commit(&self, message: &str) -> Result<String>;
}

/// Working directory of a located repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    root: PathBuf,
}

impl RepositoryLocation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RepositoryLocation { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git_dir(&self) -> PathBuf {
        self.root.join(GIT_DIR)
    }
}

/// Walks up from `start` to the first directory containing `.git`.
///
/// # Returns
/// * `Ok(RepositoryLocation)` - The directory holding the marker
/// * `Err(GitPlusError::RepositoryNotFound)` - No ancestor has one
pub fn locate(start: &Path) -> Result<RepositoryLocation> {
    start
        .ancestors()
        .find(|dir| dir.join(GIT_DIR).exists())
        .map(RepositoryLocation::new)
        .ok_or_else(|| GitPlusError::RepositoryNotFound {
            start: start.to_path_buf(),
        })
}

/// Snapshot of the repository changes taken before anything is staged
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryChangeSet {
    pub has_prior_commit: bool,
    pub working_tree: Vec<FileChange>,
    pub untracked: Vec<String>,
    pub staged: Vec<FileChange>,
}

impl RepositoryChangeSet {
    /// Reads every change category once.
    pub fn capture<R: Repository + ?Sized>(repo: &R) -> Result<Self> {
        let has_prior_commit = repo.has_prior_commit()?;
        let staged = if has_prior_commit {
            repo.staged_diffs()?
        } else {
            Vec::new()
        };

        Ok(RepositoryChangeSet {
            has_prior_commit,
            working_tree: repo.working_tree_diffs()?,
            untracked: repo.untracked_files()?,
            staged,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.working_tree.is_empty() && self.untracked.is_empty() && self.staged.is_empty()
    }

    /// Whether `path` appears in any change category.
    pub fn touches(&self, path: &str) -> bool {
        self.working_tree.iter().any(|c| c.path == path)
            || self.untracked.iter().any(|p| p == path)
            || self.staged.iter().any(|c| c.path == path)
    }

    /// Paths to stage, each once, in capture order.
    pub fn paths_to_stage(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        let all = self
            .working_tree
            .iter()
            .map(|c| c.path.as_str())
            .chain(self.untracked.iter().map(String::as_str))
            .chain(self.staged.iter().map(|c| c.path.as_str()));
        for path in all {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Per-file view of what the commit will contain, sorted by path.
    ///
    /// Without a prior commit this lists the untracked files only. Otherwise
    /// an already staged change takes precedence over a working-tree change,
    /// and untracked files count as added.
    pub fn summary(&self) -> Vec<FileChange> {
        if !self.has_prior_commit {
            let mut initial: Vec<FileChange> = self
                .untracked
                .iter()
                .map(|p| FileChange::new(p.clone(), ChangeType::Added))
                .collect();
            initial.sort_by(|a, b| a.path.cmp(&b.path));
            return initial;
        }

        let mut by_path: BTreeMap<&str, ChangeType> = BTreeMap::new();
        for path in &self.untracked {
            by_path.insert(path, ChangeType::Added);
        }
        for change in &self.working_tree {
            by_path.insert(&change.path, change.change);
        }
        for change in &self.staged {
            by_path.insert(&change.path, change.change);
        }

        by_path
            .into_iter()
            .map(|(path, change)| FileChange::new(path, change))
            .collect()
    }
}
