use clap::Args;

use crate::infra::git::{
    ChangelogArgs as LogArgs, ChangelogEntry, CommandRunner, Git, Result as GitResult,
};
use crate::shared::config::Config;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ChangelogArgs {
    /// Tag to start from (default: latest tag reachable from HEAD)
    #[arg(long)]
    pub from: Option<String>,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

/// Changelog since `from`, or since the latest tag.
/// `None` when no tag is given and the repository has none.
pub async fn changelog_since<R: CommandRunner>(
    git: &Git<R>,
    config: &Config,
    from: Option<&str>,
) -> GitResult<Option<String>> {
    let tag = match from {
        Some(tag) => tag.to_string(),
        None => match git.get_latest_tag().await {
            Some(tag) => tag,
            None => return Ok(None),
        },
    };

    let changelog = git
        .get_changelog(&LogArgs {
            command: &config.scripts.changelog,
            tag_name: &tag,
            latest_version: Some(tag.trim_start_matches('v')),
        })
        .await?;
    Ok(Some(changelog))
}

pub async fn run<R: CommandRunner>(
    args: &ChangelogArgs,
    config: &Config,
    git: &Git<R>,
) -> anyhow::Result<()> {
    let Some(changelog) = changelog_since(git, config, args.from.as_deref()).await? else {
        eprintln!("No tags found. Use --from to pick a starting point.");
        return Ok(());
    };

    if args.json {
        let entries: Vec<ChangelogEntry> =
            changelog.lines().filter_map(ChangelogEntry::parse).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if !changelog.is_empty() {
        println!("{changelog}");
    }
    Ok(())
}
