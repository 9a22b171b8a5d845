//! Git facade for release automation.
//!
//! [`infra::git::Git`] answers repository-state questions and performs the
//! mutations a release needs (stage, commit, tag, push) by shelling out to
//! `git`. The `commands` module builds the `relgit` CLI on top of it.

pub mod cli;
pub mod commands;
pub mod infra;
pub mod shared;

#[cfg(test)]
mod testing;
