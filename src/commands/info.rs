use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::infra::git::{CommandRunner, Git, RepositoryIdentity};
use crate::shared::config::Config;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct InfoArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Snapshot of the repository state relevant to a release.
#[derive(Debug, Serialize, PartialEq)]
pub struct RepoState {
    pub is_git_repo: bool,
    pub root_dir: Option<PathBuf>,
    pub is_root_dir: bool,
    pub branch: Option<String>,
    pub has_upstream: bool,
    pub remote_url: Option<String>,
    pub repository: Option<RepositoryIdentity>,
    pub latest_tag: Option<String>,
    pub is_clean: bool,
}

impl RepoState {
    pub async fn collect<R: CommandRunner>(git: &Git<R>, remote: &str) -> Self {
        Self {
            is_git_repo: git.is_git_repo().await,
            root_dir: git.root_dir().await,
            is_root_dir: git.is_in_git_root_dir().await,
            branch: git.get_branch_name().await,
            has_upstream: git.has_upstream().await,
            remote_url: git.get_remote_url(Some(remote)).await,
            repository: git.repository_identity(Some(remote)).await,
            latest_tag: git.get_latest_tag().await,
            is_clean: git.is_working_dir_clean().await,
        }
    }

    fn render_text(&self) -> String {
        fn or_dash(value: Option<&str>) -> &str {
            value.unwrap_or("-")
        }

        let mut out = String::new();
        let root = self.root_dir.as_ref().map(|p| p.display().to_string());
        let _ = writeln!(out, "git repo:     {}", self.is_git_repo);
        let _ = writeln!(out, "root:         {}", or_dash(root.as_deref()));
        let _ = writeln!(out, "at root:      {}", self.is_root_dir);
        let _ = writeln!(out, "branch:       {}", or_dash(self.branch.as_deref()));
        let _ = writeln!(out, "upstream:     {}", self.has_upstream);
        let _ = writeln!(out, "remote:       {}", or_dash(self.remote_url.as_deref()));
        let repository = self.repository.as_ref().map(|r| r.repository.as_str());
        let _ = writeln!(out, "repository:   {}", or_dash(repository));
        let _ = writeln!(out, "latest tag:   {}", or_dash(self.latest_tag.as_deref()));
        let _ = writeln!(out, "clean:        {}", self.is_clean);
        out
    }
}

pub async fn run<R: CommandRunner>(
    args: &InfoArgs,
    config: &Config,
    git: &Git<R>,
) -> anyhow::Result<()> {
    let state = RepoState::collect(git, &config.git.remote).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", state.render_text());
    }
    Ok(())
}
