//! Changelog generation from a shell command template.

use super::error::{GitError, Result};
use super::repo::Git;
use super::runner::CommandRunner;
use crate::shared::template::render;

/// Template used when no changelog command is configured.
pub const DEFAULT_CHANGELOG_COMMAND: &str = r#"git log --pretty=format:"* %s (%h)" ${version}...HEAD"#;

/// Options for [`Git::get_changelog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangelogArgs<'a> {
    /// Command template; `${version}` and `${latestTag}` expand to `tag_name`,
    /// `${latestVersion}` to `latest_version`.
    pub command: &'a str,
    pub tag_name: &'a str,
    pub latest_version: Option<&'a str>,
}

impl<R: CommandRunner> Git<R> {
    /// Run the changelog command and return its trimmed output.
    pub async fn get_changelog(&self, args: &ChangelogArgs<'_>) -> Result<String> {
        self.run_changelog(args)
            .await
            .map(|output| output.trim().to_string())
            .map_err(|e| GitError::Changelog {
                source: Box::new(e),
            })
    }

    async fn run_changelog(&self, args: &ChangelogArgs<'_>) -> Result<String> {
        let command = render(
            args.command,
            &[
                ("version", args.tag_name),
                ("latestTag", args.tag_name),
                ("latestVersion", args.latest_version.unwrap_or_default()),
            ],
        );
        if command.trim().is_empty() {
            return Err(GitError::InvalidTemplate(command));
        }

        // Templates are shell command lines (pipes, `&&`, redirects).
        let shell_args = vec!["-c".to_string(), command.clone()];
        self.exec_program("sh", &shell_args, Some(&command)).await
    }
}
