use clap::Args;
use thiserror::Error;

use super::changelog::changelog_since;
use crate::infra::git::{CommandRunner, CommitArgs, CommitOutcome, Git, PushArgs, TagArgs};
use crate::shared::config::Config;
use crate::shared::template::render;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ReleaseArgs {
    /// Version being released (substituted for ${version} in templates)
    pub version: String,

    /// Files to stage into the release commit (e.g. bumped manifests)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Skip staging and committing
    #[arg(long)]
    pub no_commit: bool,

    /// Skip tagging
    #[arg(long)]
    pub no_tag: bool,

    /// Skip pushing
    #[arg(long)]
    pub no_push: bool,
}

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Working directory is not clean:\n{0}")]
    DirtyWorkingDir(String),

    #[error("No upstream branch configured for the current branch")]
    NoUpstream,

    #[error("Tag \"{0}\" already exists")]
    TagExists(String),
}

/// What a release did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReleaseReport {
    pub changelog: Option<String>,
    pub commit: Option<CommitOutcome>,
    pub tag: Option<String>,
    pub pushed: bool,
}

/// Check preconditions, then commit, tag and push a release.
pub async fn release<R: CommandRunner>(
    args: &ReleaseArgs,
    config: &Config,
    git: &Git<R>,
) -> anyhow::Result<ReleaseReport> {
    let vars = [("version", args.version.as_str())];
    let tag_name = render(&config.git.tag_name, &vars);

    check_preconditions(args, config, git, &tag_name).await?;

    let mut report = ReleaseReport {
        changelog: changelog_since(git, config, None).await?,
        ..ReleaseReport::default()
    };

    if !args.no_commit {
        let files: Vec<&str> = args.files.iter().map(String::as_str).collect();
        git.stage(&files).await?;
        let commit = CommitArgs {
            message: render(&config.git.commit_message, &vars),
            args: config.git.commit_args.clone(),
            allow_nothing_to_commit: config.git.allow_nothing_to_commit,
        };
        report.commit = Some(git.commit(&commit).await?);
    }

    if !args.no_tag {
        let annotation = render(&config.git.tag_annotation, &vars);
        let tag = TagArgs {
            annotation: (!annotation.is_empty()).then_some(annotation),
            ..TagArgs::lightweight(tag_name.clone())
        };
        git.tag(&tag).await?;
        report.tag = Some(tag_name);
    }

    if !args.no_push {
        let has_upstream_branch = git.has_upstream().await;
        let push_repo = config
            .git
            .push_repo
            .clone()
            .or_else(|| (!has_upstream_branch).then(|| config.git.remote.clone()));
        git.push(&PushArgs {
            push_repo,
            has_upstream_branch,
        })
        .await?;
        report.pushed = true;
    }

    Ok(report)
}

async fn check_preconditions<R: CommandRunner>(
    args: &ReleaseArgs,
    config: &Config,
    git: &Git<R>,
    tag_name: &str,
) -> Result<(), ReleaseError> {
    if !git.is_git_repo().await {
        return Err(ReleaseError::NotInGitRepo);
    }

    if config.git.require_clean_working_dir {
        // Files being released are expected to be modified.
        let unrelated: Vec<String> = git
            .status_entries()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| !args.files.contains(&entry.path))
            .map(|entry| format!("{}{} {}", entry.index, entry.worktree, entry.path))
            .collect();
        if !unrelated.is_empty() {
            return Err(ReleaseError::DirtyWorkingDir(unrelated.join("\n")));
        }
    }

    if config.git.require_upstream && !git.has_upstream().await {
        return Err(ReleaseError::NoUpstream);
    }

    if !args.no_tag && git.tag_exists(tag_name).await {
        return Err(ReleaseError::TagExists(tag_name.to_string()));
    }

    Ok(())
}

pub async fn run<R: CommandRunner>(
    args: &ReleaseArgs,
    config: &Config,
    git: &Git<R>,
) -> anyhow::Result<()> {
    let report = release(args, config, git).await?;

    if let Some(changelog) = report.changelog.as_deref().filter(|c| !c.is_empty()) {
        println!("Changelog:\n{changelog}\n");
    }
    if report.commit == Some(CommitOutcome::Committed) {
        println!("Committed release {}", args.version);
    }
    if let Some(tag) = &report.tag {
        println!("Tagged {tag}");
    }
    if report.pushed {
        println!("Pushed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRepo;
    use rstest::rstest;

    fn release_args(version: &str, files: &[&str]) -> ReleaseArgs {
        ReleaseArgs {
            version: version.to_string(),
            files: files.iter().map(|f| (*f).to_string()).collect(),
            no_commit: false,
            no_tag: false,
            no_push: false,
        }
    }

    /// Repo with a released 1.0.0 and one unreleased commit.
    fn released_repo() -> TestRepo {
        let repo = TestRepo::new();
        repo.commit_file("VERSION", "1.0.0", "Add VERSION");
        repo.git_ok(&["tag", "--annotate", "--message=Release 1.0.0", "1.0.0"]);
        repo.commit_file("feature", "feature", "Add feature");
        repo
    }

    #[tokio::test]
    async fn release_commits_tags_and_pushes() {
        let repo = released_repo();
        let _remote = repo.add_bare_remote("origin");
        repo.write_file("VERSION", "1.1.0");
        let (git, _) = repo.facade();

        let report = release(&release_args("1.1.0", &["VERSION"]), &Config::default(), &git)
            .await
            .unwrap();

        assert_eq!(report.commit, Some(CommitOutcome::Committed));
        assert_eq!(report.tag.as_deref(), Some("1.1.0"));
        assert!(report.pushed);
        assert!(report.changelog.unwrap().starts_with("* Add feature ("));

        assert_eq!(
            repo.git_ok(&["log", "-1", "--format=%s"]).trim(),
            "Release 1.1.0"
        );
        assert_eq!(repo.git_ok(&["cat-file", "-t", "1.1.0"]).trim(), "tag");
        assert!(git.has_upstream().await);
        assert!(git.is_working_dir_clean().await);
        let remote_tags = repo.git_ok(&["ls-remote", "--tags", "origin"]);
        assert!(remote_tags.contains("refs/tags/1.1.0"));
    }

    #[tokio::test]
    async fn release_uses_configured_templates() {
        let repo = released_repo();
        let (git, _) = repo.facade();
        let mut config = Config::default();
        config.git.tag_name = "v${version}".to_string();
        config.git.tag_annotation = String::new();
        config.git.commit_message = "chore: release v${version}".to_string();
        config.git.commit_args = vec!["--allow-empty".to_string()];
        let args = ReleaseArgs {
            no_push: true,
            ..release_args("2.0.0", &[])
        };

        let report = release(&args, &config, &git).await.unwrap();

        assert_eq!(report.tag.as_deref(), Some("v2.0.0"));
        assert!(!report.pushed);
        assert_eq!(
            repo.git_ok(&["log", "-1", "--format=%s"]).trim(),
            "chore: release v2.0.0"
        );
        assert_eq!(repo.git_ok(&["cat-file", "-t", "v2.0.0"]).trim(), "commit");
    }

    #[tokio::test]
    async fn release_rejects_unrelated_changes() {
        let repo = released_repo();
        repo.write_file("VERSION", "1.1.0");
        repo.write_file("stray.txt", "oops");
        let (git, _) = repo.facade();

        let err = release(&release_args("1.1.0", &["VERSION"]), &Config::default(), &git)
            .await
            .unwrap_err();

        match err.downcast_ref::<ReleaseError>() {
            Some(ReleaseError::DirtyWorkingDir(files)) => {
                assert_eq!(files, "?? stray.txt");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!git.tag_exists("1.1.0").await);
    }

    #[tokio::test]
    async fn release_exempts_listed_files_with_non_ascii_names() {
        let repo = released_repo();
        repo.commit_file("änderungen.md", "1.0.0", "Add änderungen.md");
        repo.write_file("änderungen.md", "1.1.0");
        let (git, _) = repo.facade();
        let args = ReleaseArgs {
            no_push: true,
            ..release_args("1.1.0", &["änderungen.md"])
        };

        let report = release(&args, &Config::default(), &git).await.unwrap();

        assert_eq!(report.commit, Some(CommitOutcome::Committed));
        assert!(git.is_working_dir_clean().await);
    }

    #[tokio::test]
    async fn release_allows_dirty_dir_when_configured() {
        let repo = released_repo();
        repo.write_file("stray.txt", "oops");
        let (git, _) = repo.facade();
        let mut config = Config::default();
        config.git.require_clean_working_dir = false;
        let args = ReleaseArgs {
            no_commit: true,
            no_push: true,
            ..release_args("1.1.0", &[])
        };

        let report = release(&args, &config, &git).await.unwrap();

        assert_eq!(report.commit, None);
        assert_eq!(report.tag.as_deref(), Some("1.1.0"));
    }

    #[rstest]
    #[case::default_template("${version}", "1.0.0")]
    #[case::prefixed_template("v${version}", "v1.0.0")]
    #[tokio::test]
    async fn release_rejects_existing_tag(#[case] template: &str, #[case] existing: &str) {
        let repo = released_repo();
        if existing != "1.0.0" {
            repo.git_ok(&["tag", existing]);
        }
        let (git, _) = repo.facade();
        let mut config = Config::default();
        config.git.tag_name = template.to_string();

        let err = release(&release_args("1.0.0", &[]), &config, &git)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::TagExists(tag)) if tag == existing
        ));
    }

    #[tokio::test]
    async fn release_requires_upstream_when_configured() {
        let repo = released_repo();
        let (git, _) = repo.facade();
        let mut config = Config::default();
        config.git.require_upstream = true;

        let err = release(&release_args("1.1.0", &[]), &config, &git)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::NoUpstream)
        ));
    }

    #[tokio::test]
    async fn release_outside_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::with_runner(dir.path(), crate::testing::isolated_runner());

        let err = release(&release_args("1.0.0", &[]), &Config::default(), &git)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::NotInGitRepo)
        ));
    }

    #[tokio::test]
    async fn release_without_changes_tolerates_nothing_to_commit() {
        let repo = released_repo();
        let (git, console) = repo.facade();
        let args = ReleaseArgs {
            no_push: true,
            ..release_args("1.0.1", &[])
        };

        let report = release(&args, &Config::default(), &git).await.unwrap();

        assert_eq!(report.commit, Some(CommitOutcome::NothingToCommit));
        assert_eq!(report.tag.as_deref(), Some("1.0.1"));
        assert!(console.lines().contains(&"No changes to commit".to_string()));
    }
}
