//! Git error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found in PATH")]
    GitNotFound,

    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Tag \"{0}\" already exists")]
    TagExists(String),

    #[error("Invalid remote \"{0}\": must not start with '-'")]
    InvalidRemote(String),

    #[error("Cannot set upstream: HEAD is not on a branch")]
    DetachedHead,

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Invalid command template: {0}")]
    InvalidTemplate(String),

    #[error("Could not create changelog: {source}")]
    Changelog { source: Box<GitError> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Error text reported by the failed process, if this is a process failure.
    pub fn process_message(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitError>;
