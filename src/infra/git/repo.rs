//! Repository facade and state queries.
//!
//! Queries never fail: outside a repository (or when git itself fails) they
//! report `false` / `None`.

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use super::console::{Console, StdoutConsole};
use super::error::{GitError, Result};
use super::parse::{RepositoryIdentity, StatusEntry, is_remote_url, parse_status};
use super::runner::{CommandOutput, CommandRunner, ProcessRunner};

pub(super) const DEFAULT_REMOTE: &str = "origin";

/// Shell-out facade over the `git` binary for one working directory.
pub struct Git<R: CommandRunner = ProcessRunner> {
    cwd: PathBuf,
    runner: R,
    console: Arc<dyn Console>,
    verbose: bool,
}

impl Git<ProcessRunner> {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_runner(cwd, ProcessRunner::new())
    }
}

impl<R: CommandRunner> Git<R> {
    pub fn with_runner(cwd: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            cwd: cwd.into(),
            runner,
            console: Arc::new(StdoutConsole),
            verbose: false,
        }
    }

    /// Echo mutating commands to the console before running them.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub(super) fn console(&self) -> &dyn Console {
        self.console.as_ref()
    }

    /// Spawn a program in the working directory.
    pub(super) async fn spawn(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = self
            .runner
            .run(&self.cwd, program, args)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound if program == "git" => GitError::GitNotFound,
                _ => GitError::Io(e),
            })?;
        tracing::debug!(program, ?args, success = output.success, "ran command");
        Ok(output)
    }

    /// Run a read-only git command, returning trimmed stdout on success.
    pub(super) async fn query(&self, args: &[&str]) -> Option<String> {
        let output = self.spawn("git", &to_args(args)).await.ok()?;
        output
            .success
            .then(|| output.stdout.trim().to_string())
    }

    /// Run a read-only git command, reporting only whether it succeeded.
    pub(super) async fn probe(&self, args: &[&str]) -> bool {
        self.query(args).await.is_some()
    }

    /// Run a mutating git command, echoing `display` (or the command line)
    /// first in verbose mode. Fails with the process error text.
    pub(super) async fn exec(&self, args: &[String], display: Option<&str>) -> Result<String> {
        self.exec_program("git", args, display).await
    }

    pub(super) async fn exec_program(
        &self,
        program: &str,
        args: &[String],
        display: Option<&str>,
    ) -> Result<String> {
        let command = match display {
            Some(display) => display.to_string(),
            None => command_line(program, args),
        };
        if self.verbose {
            self.console.log(&command);
        }

        let output = self.spawn(program, args).await?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(GitError::CommandFailed {
                command,
                message: output.error_text(),
            })
        }
    }

    pub async fn is_git_repo(&self) -> bool {
        self.probe(&["rev-parse", "--git-dir"]).await
    }

    /// Top-level directory of the working tree, if inside one.
    pub async fn root_dir(&self) -> Option<PathBuf> {
        self.query(&["rev-parse", "--show-toplevel"])
            .await
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
    }

    /// Whether the working directory is the repository root (not a subdirectory).
    pub async fn is_in_git_root_dir(&self) -> bool {
        let Some(root) = self.root_dir().await else {
            return false;
        };
        // Resolve symlinks (e.g. /var -> /private/var on macOS) on both sides.
        match (
            tokio::fs::canonicalize(&root).await,
            tokio::fs::canonicalize(&self.cwd).await,
        ) {
            (Ok(root), Ok(cwd)) => root == cwd,
            _ => false,
        }
    }

    /// True when there are no staged, unstaged or untracked changes.
    pub async fn is_working_dir_clean(&self) -> bool {
        self.query(&["status", "--porcelain"])
            .await
            .is_some_and(|status| status.is_empty())
    }

    /// Short status of tracked files, trimmed as a whole.
    pub async fn status(&self) -> Result<String> {
        let output = self.status_output(&["--untracked-files=no"]).await?;
        Ok(output.trim().to_string())
    }

    /// Porcelain status (untracked files included) as structured entries.
    pub async fn status_entries(&self) -> Result<Vec<StatusEntry>> {
        let output = self.status_output(&[]).await?;
        Ok(parse_status(&output))
    }

    async fn status_output(&self, extra: &[&str]) -> Result<String> {
        let mut args = to_args(&["status", "--short"]);
        args.extend(to_args(extra));
        let output = self.spawn("git", &args).await?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(GitError::CommandFailed {
                command: command_line("git", &args),
                message: output.error_text(),
            })
        }
    }

    pub async fn tag_exists(&self, name: &str) -> bool {
        let reference = format!("refs/tags/{name}");
        self.probe(&["show-ref", "--tags", "--quiet", "--verify", "--", reference.as_str()])
            .await
    }

    /// Most recent tag reachable from HEAD.
    pub async fn get_latest_tag(&self) -> Option<String> {
        self.query(&["describe", "--tags", "--abbrev=0"])
            .await
            .filter(|tag| !tag.is_empty())
    }

    /// Resolve a remote name (default `origin`) to its URL.
    /// Values that already look like URLs are returned unchanged.
    pub async fn get_remote_url(&self, remote: Option<&str>) -> Option<String> {
        if let Some(remote) = remote
            && is_remote_url(remote)
        {
            return Some(remote.to_string());
        }

        let key = format!("remote.{}.url", remote.unwrap_or(DEFAULT_REMOTE));
        self.query(&["config", "--get", key.as_str()])
            .await
            .filter(|url| !url.is_empty())
    }

    /// Identity of the repository behind a remote name or URL.
    pub async fn repository_identity(&self, remote: Option<&str>) -> Option<RepositoryIdentity> {
        let url = self.get_remote_url(remote).await?;
        RepositoryIdentity::parse(&url)
    }
}

/// Reject remotes git would parse as an option.
pub(super) fn check_remote(remote: &str) -> Result<()> {
    if remote.starts_with('-') {
        return Err(GitError::InvalidRemote(remote.to_string()));
    }
    Ok(())
}

pub(super) fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_string()).collect()
}

/// Render a command line for display, quoting arguments where needed.
pub(super) fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(Cow::Borrowed(program))
        .chain(
            args.iter()
                .map(|arg| shlex::try_quote(arg).unwrap_or(Cow::Borrowed(arg.as_str()))),
        )
        .collect::<Vec<_>>()
        .join(" ")
}
