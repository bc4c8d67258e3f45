use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gitplus::cli::orchestration::{run_commit_workflow, CommitWorkflowArgs, WorkflowOutcome};
use gitplus::config;
use gitplus::git::{self, Git2Repository};
use gitplus::ui;
use gitplus::GitPlusError;

/// Environment variable holding the log filter, e.g. `gitplus=debug`.
const LOG_ENV: &str = "GITPLUS_LOG";

#[derive(clap::Parser)]
#[command(
    name = "gitplus",
    version,
    about = "Stage every change, bump the VERSION marker and commit in one step"
)]
struct Args {
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Commit message; words are joined with spaces"
    )]
    message: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(error: &GitPlusError) -> ! {
    ui::display_error(&error.to_string());
    if let Some(hint) = error.hint() {
        ui::display_hint(hint);
    }
    std::process::exit(1);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let cwd = std::env::current_dir()?;

    // Locate and open the repository
    let location = match git::locate(&cwd) {
        Ok(location) => location,
        Err(e) => fail(&e),
    };
    let repo = match Git2Repository::open(&location) {
        Ok(repo) => repo,
        Err(e) => fail(&e),
    };

    let config = match config::load_config(location.root()) {
        Ok(cfg) => cfg,
        Err(e) => fail(&e),
    };

    let workflow_args = CommitWorkflowArgs::new(args.message);
    match run_commit_workflow(
        &repo,
        &location,
        &workflow_args,
        &config,
        chrono::Local::now(),
    ) {
        Ok(WorkflowOutcome::Committed { commit_id, .. }) => {
            let short = commit_id.get(..7).unwrap_or(&commit_id);
            ui::display_success(&format!("Created commit {}", short));
        }
        Ok(WorkflowOutcome::NothingToCommit) => {}
        Err(e) => fail(&e),
    }

    Ok(())
}
