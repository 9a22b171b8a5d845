use clap::Subcommand;

/// Configuration management commands.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print JSON Schema for the configuration file
    Schema,

    /// Print the effective configuration as JSON
    Show,
}

impl ConfigCommands {
    pub fn run(&self, config: &crate::shared::config::Config) -> anyhow::Result<()> {
        match self {
            Self::Schema => {
                let schema = crate::shared::config::generate_schema();
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            Self::Show => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
        }
        Ok(())
    }
}
