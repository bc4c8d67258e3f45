use std::path::{Path, PathBuf};

use git2::{
    Commit, ErrorCode, Repository as Git2Repo, Status, StatusOptions, StatusShow, Statuses,
};
use tracing::debug;

use crate::error::{GitPlusError, Result};
use crate::git::{ChangeType, FileChange, RepositoryLocation};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Open the repository at a located root
    ///
    /// # Returns
    /// * `Ok(Git2Repository)` - Repository with a working tree
    /// * `Err(GitPlusError::InvalidRepository)` - `.git` exists but cannot be opened
    pub fn open(location: &RepositoryLocation) -> Result<Self> {
        let invalid = |source: git2::Error| GitPlusError::InvalidRepository {
            path: location.git_dir(),
            source,
        };

        let repo = Git2Repo::open(location.root()).map_err(invalid)?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| invalid(git2::Error::from_str("repository has no working tree")))?;

        Ok(Git2Repository { repo, workdir })
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(head.peel_to_commit().ok()),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn statuses(&self, show: StatusShow) -> Result<Statuses<'_>> {
        let mut opts = StatusOptions::new();
        opts.show(show)
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        Ok(self.repo.statuses(Some(&mut opts))?)
    }

    fn collect_changes(
        &self,
        show: StatusShow,
        classify: fn(Status) -> Option<ChangeType>,
    ) -> Result<Vec<FileChange>> {
        let statuses = self.statuses(show)?;
        let mut changes = Vec::new();
        for entry in statuses.iter() {
            if let (Some(path), Some(change)) = (entry.path(), classify(entry.status())) {
                changes.push(FileChange::new(path, change));
            }
        }
        Ok(changes)
    }
}

fn classify_workdir(status: Status) -> Option<ChangeType> {
    if status.is_wt_deleted() {
        Some(ChangeType::Deleted)
    } else if status.is_wt_modified() {
        Some(ChangeType::Modified)
    } else if status.is_wt_renamed() || status.is_wt_typechange() {
        Some(ChangeType::Other)
    } else {
        None
    }
}

fn classify_index(status: Status) -> Option<ChangeType> {
    if status.is_index_new() {
        Some(ChangeType::Added)
    } else if status.is_index_deleted() {
        Some(ChangeType::Deleted)
    } else if status.is_index_modified() {
        Some(ChangeType::Modified)
    } else if status.is_index_renamed() || status.is_index_typechange() {
        Some(ChangeType::Other)
    } else {
        None
    }
}

impl super::Repository for Git2Repository {
    fn has_prior_commit(&self) -> Result<bool> {
        Ok(self.head_commit()?.is_some())
    }

    fn working_tree_diffs(&self) -> Result<Vec<FileChange>> {
        self.collect_changes(StatusShow::Workdir, classify_workdir)
    }

    fn untracked_files(&self) -> Result<Vec<String>> {
        let statuses = self.statuses(StatusShow::Workdir)?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().is_wt_new())
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }

    fn staged_diffs(&self) -> Result<Vec<FileChange>> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }
        self.collect_changes(StatusShow::Index, classify_index)
    }

    fn stage(&self, path: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        let relative = Path::new(path);

        if self.workdir.join(relative).exists() {
            index.add_path(relative)?;
        } else if index.get_path(relative, 0).is_some() {
            index.remove_path(relative)?;
        }

        index.write()?;
        debug!(path, "staged");
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = self.repo.signature().map_err(|e| {
            GitPlusError::config(format!(
                "cannot determine commit author (set user.name and user.email): {}",
                e
            ))
        })?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(oid.to_string())
    }
}
