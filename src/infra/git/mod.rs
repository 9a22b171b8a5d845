//! Git operations by shelling out to the `git` binary.
//!
//! Every call spawns a fresh `git` process in the facade's working directory
//! and inspects the result; nothing is cached between calls. Calls are meant
//! to be made one at a time since they share the repository's index.

mod branch;
mod changelog;
mod console;
mod error;
mod parse;
mod repo;
mod runner;
mod write;

pub use branch::{PushArgs, PushCommand};
pub use changelog::{ChangelogArgs, DEFAULT_CHANGELOG_COMMAND};
pub use console::{Console, StdoutConsole};
pub use error::{GitError, Result};
pub use parse::{
    ChangelogEntry, RepositoryIdentity, StatusEntry, is_nothing_to_commit, is_remote_url,
    is_same_repo, parse_status,
};
pub use repo::Git;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use write::{CommitArgs, CommitOutcome, TagArgs};
