use crate::infra::git::{CommandRunner, Git};

/// Print the short status of tracked files.
pub async fn run<R: CommandRunner>(git: &Git<R>) -> anyhow::Result<()> {
    let status = git.status().await?;
    if !status.is_empty() {
        println!("{status}");
    }
    Ok(())
}
