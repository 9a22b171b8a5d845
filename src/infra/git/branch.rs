//! Branch queries and pushing.

use super::error::{GitError, Result};
use super::repo::{DEFAULT_REMOTE, Git, check_remote};
use super::runner::CommandRunner;

/// Options for [`Git::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushArgs {
    /// Remote (name or URL) to push to. Git's default when `None`.
    pub push_repo: Option<String>,
    /// When false, the current branch is pushed with `-u` to set up tracking.
    pub has_upstream_branch: bool,
}

impl Default for PushArgs {
    fn default() -> Self {
        Self {
            push_repo: None,
            has_upstream_branch: true,
        }
    }
}

/// Resolved `git push` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCommand {
    repo: Option<String>,
    /// `(remote, branch)` to track.
    upstream: Option<(String, String)>,
}

impl PushCommand {
    /// Build the invocation. `branch` is only consulted when tracking has to
    /// be set up.
    pub fn new(args: &PushArgs, branch: Option<&str>) -> Result<Self> {
        if let Some(repo) = &args.push_repo {
            check_remote(repo)?;
        }
        let upstream = if args.has_upstream_branch {
            None
        } else {
            let branch = branch.ok_or(GitError::DetachedHead)?;
            let remote = args.push_repo.as_deref().unwrap_or(DEFAULT_REMOTE);
            Some((remote.to_string(), branch.to_string()))
        };

        Ok(Self {
            repo: args.push_repo.clone(),
            upstream,
        })
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["push".to_string(), "--follow-tags".to_string()];
        match (&self.upstream, &self.repo) {
            (Some((remote, branch)), _) => {
                args.extend(["-u".to_string(), remote.clone(), branch.clone()]);
            }
            (None, Some(repo)) => args.push(repo.clone()),
            (None, None) => {}
        }
        args
    }

    /// Command line as echoed in verbose mode.
    ///
    /// Empty slots keep their separator, so pushing to a named repo without
    /// setting up tracking reads `git push --follow-tags  origin`.
    pub fn display(&self) -> String {
        let upstream = self
            .upstream
            .as_ref()
            .map(|(remote, branch)| format!("-u {remote} {branch}"))
            .unwrap_or_default();
        let repo = match (&self.upstream, &self.repo) {
            (None, Some(repo)) => repo.as_str(),
            _ => "",
        };
        format!("git push --follow-tags {upstream} {repo}")
            .trim_end()
            .to_string()
    }

    pub fn upstream(&self) -> Option<(&str, &str)> {
        self.upstream
            .as_ref()
            .map(|(remote, branch)| (remote.as_str(), branch.as_str()))
    }
}

impl<R: CommandRunner> Git<R> {
    /// Current branch name. `None` when HEAD is unborn or detached.
    pub async fn get_branch_name(&self) -> Option<String> {
        self.query(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .filter(|branch| !branch.is_empty() && branch != "HEAD")
    }

    /// Whether the current branch has a tracking branch configured.
    pub async fn has_upstream(&self) -> bool {
        self.probe(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])
            .await
    }

    /// Push commits and tags, optionally setting up tracking for the current branch.
    pub async fn push(&self, args: &PushArgs) -> Result<()> {
        let branch = if args.has_upstream_branch {
            None
        } else {
            self.get_branch_name().await
        };
        let command = PushCommand::new(args, branch.as_deref())?;

        self.exec(&command.args(), Some(&command.display())).await?;

        if let Some((remote, branch)) = command.upstream() {
            tracing::info!(remote, branch, "set up tracking branch");
            self.console().log(&format!(
                "Branch '{branch}' set up to track remote branch '{branch}' from '{remote}'."
            ));
        }
        Ok(())
    }
}
