use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::changelog::ChangelogArgs;
use crate::commands::config::ConfigCommands;
use crate::commands::info::InfoArgs;
use crate::commands::release::ReleaseArgs;

#[derive(Parser)]
#[command(
    name = "relgit",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Echo git commands and enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show repository state (branch, upstream, remote, latest tag, ...)
    Info(InfoArgs),

    /// Show the short status of tracked files
    Status,

    /// Print the changelog since the latest (or a given) tag
    Changelog(ChangelogArgs),

    /// Commit, tag and push a release
    Release(ReleaseArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}
