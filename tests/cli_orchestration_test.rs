use chrono::{Local, TimeZone};
use tempfile::TempDir;

use gitplus::cli::orchestration::{run_commit_workflow, CommitWorkflowArgs, WorkflowOutcome};
use gitplus::config::Config;
use gitplus::git::{ChangeType, FileChange, MockRepository, RepositoryLocation};
use gitplus::version::SemanticVersion;

#[test]
fn test_commit_workflow_args_structure() {
    let args = CommitWorkflowArgs::new(["release", "notes"]);

    assert_eq!(args.message_words, vec!["release", "notes"]);
    assert_eq!(args.message(), Some("release notes".to_string()));
}

#[test]
fn test_commit_workflow_args_empty() {
    let args = CommitWorkflowArgs::default();
    assert!(args.message_words.is_empty());
    assert_eq!(args.message(), None);
}

#[test]
fn test_workflow_outcome_structure() {
    let outcome = WorkflowOutcome::Committed {
        version: SemanticVersion::new("1.2.3"),
        message: "1.2.3 [now]".to_string(),
        commit_id: "abc".to_string(),
    };

    assert_ne!(outcome, WorkflowOutcome::NothingToCommit);
}

#[test]
fn test_custom_file_names_are_honoured() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("HISTORY.md"),
        "## 3.0.0 (pending)\n- rewrite\n",
    )
    .unwrap();

    let mut repo = MockRepository::with_history();
    repo.add_working_tree_change(FileChange::new("HISTORY.md", ChangeType::Modified));

    let mut config = Config::default();
    config.files.version = "REVISION".to_string();
    config.files.changelog = "HISTORY.md".to_string();
    config.changelog.unreleased_marker = "(pending)".to_string();

    let outcome = run_commit_workflow(
        &repo,
        &RepositoryLocation::new(dir.path()),
        &CommitWorkflowArgs::default(),
        &config,
        Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();

    match outcome {
        WorkflowOutcome::Committed { version, message, .. } => {
            assert_eq!(version.as_str(), "3.0.0");
            assert_eq!(message, "3.0.0\n\n- rewrite");
        }
        WorkflowOutcome::NothingToCommit => panic!("expected a commit"),
    }
    assert_eq!(
        std::fs::read_to_string(dir.path().join("REVISION")).unwrap(),
        "3.0.0"
    );
    assert_eq!(repo.staged_paths(), vec!["HISTORY.md", "REVISION"]);
}

#[test]
fn test_custom_timestamp_format() {
    let dir = TempDir::new().unwrap();
    let mut repo = MockRepository::new();
    repo.add_untracked("a.txt");

    let mut config = Config::default();
    config.message.timestamp_format = "%d.%m.%Y".to_string();

    let outcome = run_commit_workflow(
        &repo,
        &RepositoryLocation::new(dir.path()),
        &CommitWorkflowArgs::new(["hello"]),
        &config,
        Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap(),
    )
    .unwrap();

    match outcome {
        WorkflowOutcome::Committed { message, .. } => {
            assert_eq!(message, "0.0.1 [07.03.2025]: hello")
        }
        WorkflowOutcome::NothingToCommit => panic!("expected a commit"),
    }
}
