use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use super::RecordingConsole;
use crate::infra::git::{Git, ProcessRunner};

/// Ignore global/system git config so tests are isolated from local settings
/// (e.g., GPG signing, aliases, hooks, init.defaultBranch).
const ISOLATED_GIT_ENV: [(&str, &str); 2] = [
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_SYSTEM", "/dev/null"),
];

/// Process runner for facades under test.
/// Git never searches above the temp dir, so a temp dir outside a repo stays outside one.
pub fn isolated_runner() -> ProcessRunner {
    ISOLATED_GIT_ENV
        .iter()
        .fold(ProcessRunner::new(), |runner, (key, value)| {
            runner.env(*key, *value)
        })
        .env("GIT_CEILING_DIRECTORIES", std::env::temp_dir())
}

/// A temporary git repository for testing.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    fn git_command(dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir);
        cmd.envs(ISOLATED_GIT_ENV);
        cmd
    }

    fn run_in(dir: &Path, args: &[&str]) -> String {
        let output = Self::git_command(dir)
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Create an empty repository on `master` without any commits.
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        Self::run_in(dir.path(), &["init", "--initial-branch=master"]);
        Self::run_in(dir.path(), &["config", "user.email", "test@example.com"]);
        Self::run_in(dir.path(), &["config", "user.name", "Test User"]);

        Self { dir }
    }

    /// Create a new test repository with an initial commit.
    pub fn new() -> Self {
        let repo = Self::init();
        repo.git_ok(&["commit", "--allow-empty", "-m", "Initial commit"]);
        repo
    }

    /// Get the canonicalized path to the repository.
    /// This resolves symlinks (e.g., /var -> /private/var on macOS).
    pub fn path(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize path")
    }

    /// Run git in the repository, asserting success. Returns stdout.
    pub fn git_ok(&self, args: &[&str]) -> String {
        Self::run_in(&self.path(), args)
    }

    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).expect("Failed to write file");
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("Failed to read file")
    }

    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        self.write_file(name, content);
        self.git_ok(&["add", name]);
        self.git_ok(&["commit", "-m", message]);
    }

    /// Create a bare repository and register it as a remote.
    /// The returned dir must outlive the test's use of the remote.
    pub fn add_bare_remote(&self, name: &str) -> TempDir {
        let remote = tempfile::tempdir().expect("Failed to create temp dir");
        Self::run_in(remote.path(), &["init", "--bare"]);
        let url = remote.path().to_string_lossy().into_owned();
        self.git_ok(&["remote", "add", name, url.as_str()]);
        remote
    }

    /// Facade over this repository plus the console it reports to.
    pub fn facade(&self) -> (Git, Arc<RecordingConsole>) {
        let console = Arc::new(RecordingConsole::default());
        let git = Git::with_runner(self.path(), isolated_runner()).with_console(console.clone());
        (git, console)
    }
}
