use std::io;

use clap::{CommandFactory, Parser};
use relgit::cli::{Cli, Commands};
use relgit::commands;
use relgit::infra::git::Git;
use relgit::shared::{config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        verbose,
        dir,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "relgit", &mut io::stdout());
        return Ok(());
    }

    let cwd = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = config::load_config(&cwd)?;
    let verbose = verbose || config.verbose;
    logging::init(verbose);

    let git = Git::new(cwd).verbose(verbose);

    match command {
        Commands::Info(args) => commands::info::run(&args, &config, &git).await?,
        Commands::Status => commands::status::run(&git).await?,
        Commands::Changelog(args) => commands::changelog::run(&args, &config, &git).await?,
        Commands::Release(args) => commands::release::run(&args, &config, &git).await?,
        Commands::Config(config_cmd) => config_cmd.run(&config)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
