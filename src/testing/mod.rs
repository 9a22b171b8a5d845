//! Test helpers shared across modules.

mod git_repo;
mod mocks;

pub use git_repo::{TestRepo, isolated_runner};
pub use mocks::{MockRunner, RecordingConsole};
