//! Mutating operations: staging, committing, tagging, resetting and cloning.

use std::path::Path;

use super::error::{GitError, Result};
use super::parse::is_nothing_to_commit;
use super::repo::{Git, check_remote};
use super::runner::CommandRunner;

/// Options for [`Git::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitArgs {
    pub message: String,
    /// Extra arguments appended to `git commit`.
    pub args: Vec<String>,
    /// Treat "nothing to commit" as success (with a warning).
    pub allow_nothing_to_commit: bool,
}

impl CommitArgs {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            args: Vec::new(),
            allow_nothing_to_commit: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    NothingToCommit,
}

/// Options for [`Git::tag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArgs {
    pub name: String,
    /// Message of an annotated tag. A lightweight tag is created when `None`.
    pub annotation: Option<String>,
    pub args: Vec<String>,
}

impl TagArgs {
    pub fn lightweight(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            args: Vec::new(),
        }
    }

    pub fn annotated(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            annotation: Some(annotation.into()),
            ..Self::lightweight(name)
        }
    }
}

impl<R: CommandRunner> Git<R> {
    pub async fn clone(&self, remote_url: &str, target_dir: &Path) -> Result<()> {
        let args = vec![
            "clone".to_string(),
            "--".to_string(),
            remote_url.to_string(),
            target_dir.to_string_lossy().into_owned(),
        ];
        self.exec(&args, None).await?;
        Ok(())
    }

    /// Add paths to the index. Paths without changes are not an error.
    pub async fn stage(&self, paths: &[&str]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add".to_string(), "--".to_string()];
        args.extend(paths.iter().map(|path| (*path).to_string()));
        self.exec(&args, None).await?;
        Ok(())
    }

    /// Discard working tree changes for paths. Best effort: failures are
    /// reported on the console, never returned.
    pub async fn reset(&self, paths: &[&str]) {
        if paths.is_empty() {
            return;
        }
        let mut args = vec!["checkout".to_string(), "HEAD".to_string(), "--".to_string()];
        args.extend(paths.iter().map(|path| (*path).to_string()));

        if let Err(e) = self.exec(&args, None).await {
            tracing::warn!(error = %e, ?paths, "reset failed");
            self.console()
                .warn(&format!("Could not reset `{}`", paths.join(" ")));
        }
    }

    pub async fn commit(&self, commit: &CommitArgs) -> Result<CommitOutcome> {
        let mut args = vec!["commit".to_string(), format!("--message={}", commit.message)];
        args.extend(commit.args.iter().cloned());

        match self.exec(&args, None).await {
            Ok(_) => Ok(CommitOutcome::Committed),
            Err(e) if e.process_message().is_some_and(is_nothing_to_commit) => {
                if commit.allow_nothing_to_commit {
                    self.console().warn("No changes to commit");
                    Ok(CommitOutcome::NothingToCommit)
                } else {
                    Err(GitError::NothingToCommit)
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn tag(&self, tag: &TagArgs) -> Result<()> {
        let mut args = vec!["tag".to_string()];
        if let Some(annotation) = &tag.annotation {
            args.push("--annotate".to_string());
            args.push(format!("--message={annotation}"));
        }
        args.extend(tag.args.iter().cloned());
        args.push(tag.name.clone());

        match self.exec(&args, None).await {
            Ok(_) => Ok(()),
            Err(e)
                if e
                    .process_message()
                    .is_some_and(|message| message.contains("already exists")) =>
            {
                Err(GitError::TagExists(tag.name.clone()))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch branches and tags from a remote (git's default when `None`).
    pub async fn fetch(&self, remote: Option<&str>) -> Result<()> {
        if let Some(remote) = remote {
            check_remote(remote)?;
        }
        let mut args = vec!["fetch".to_string(), "--tags".to_string()];
        args.extend(remote.map(str::to_string));
        self.exec(&args, None).await?;
        Ok(())
    }
}
