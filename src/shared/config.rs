use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::infra::git::DEFAULT_CHANGELOG_COMMAND;

/// Project-level config file names, looked up in the working directory.
const PROJECT_CONFIG_FILES: [&str; 2] = [".relgit.yaml", ".relgit.yml"];

/// Top-level configuration for relgit.
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Echo mutating git commands before running them (default: false).
    #[serde(default)]
    pub verbose: bool,

    /// Git settings.
    #[serde(default)]
    pub git: GitConfig,

    /// Commands run during a release.
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

/// Git configuration.
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    /// Remote used for tracking and identity lookups (default: "origin").
    #[serde(default = "default_remote")]
    #[schemars(default = "default_remote")]
    pub remote: String,

    /// Remote (name or URL) to push to. Git's push default when unset.
    #[serde(default)]
    pub push_repo: Option<String>,

    /// Refuse to release with unrelated uncommitted changes (default: true).
    #[serde(default = "default_true")]
    #[schemars(default = "default_true")]
    pub require_clean_working_dir: bool,

    /// Refuse to release when the branch has no upstream (default: false).
    #[serde(default)]
    pub require_upstream: bool,

    /// Commit message template (default: "Release ${version}").
    #[serde(default = "default_release_message")]
    #[schemars(default = "default_release_message")]
    pub commit_message: String,

    /// Extra arguments for `git commit`.
    #[serde(default)]
    pub commit_args: Vec<String>,

    /// Tag name template (default: "${version}").
    #[serde(default = "default_tag_name")]
    #[schemars(default = "default_tag_name")]
    pub tag_name: String,

    /// Annotated tag message template (default: "Release ${version}").
    /// An empty string creates lightweight tags.
    #[serde(default = "default_release_message")]
    #[schemars(default = "default_release_message")]
    pub tag_annotation: String,

    /// Treat "nothing to commit" as success (default: true).
    #[serde(default = "default_true")]
    #[schemars(default = "default_true")]
    pub allow_nothing_to_commit: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            push_repo: None,
            require_clean_working_dir: default_true(),
            require_upstream: false,
            commit_message: default_release_message(),
            commit_args: Vec::new(),
            tag_name: default_tag_name(),
            tag_annotation: default_release_message(),
            allow_nothing_to_commit: default_true(),
        }
    }
}

/// Script templates.
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Changelog command; `${version}` expands to the previous tag.
    #[serde(default = "default_changelog")]
    #[schemars(default = "default_changelog")]
    pub changelog: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            changelog: default_changelog(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_true() -> bool {
    true
}

fn default_release_message() -> String {
    "Release ${version}".to_string()
}

fn default_tag_name() -> String {
    "${version}".to_string()
}

fn default_changelog() -> String {
    DEFAULT_CHANGELOG_COMMAND.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Load configuration for a working directory.
///
/// Looks for `.relgit.yaml` / `.relgit.yml` in `cwd` first, then
/// `config.yaml` / `config.yml` under the user config dir
/// (`$XDG_CONFIG_HOME/relgit` or `~/.config/relgit`).
/// Returns Config::default() if no config file exists.
pub fn load_config(cwd: &Path) -> anyhow::Result<Config> {
    if let Some(config) = load_first(cwd, &PROJECT_CONFIG_FILES)? {
        return Ok(config);
    }
    let Some(dir) = user_config_dir() else {
        return Ok(Config::default());
    };
    Ok(load_first(&dir, &["config.yaml", "config.yml"])?.unwrap_or_default())
}

/// Parse the first existing file among `filenames` in `dir`.
fn load_first(dir: &Path, filenames: &[&str]) -> anyhow::Result<Option<Config>> {
    for filename in filenames {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }
    Ok(None)
}

/// Parse YAML content into Config.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
        .map_err(Into::into)
}

/// `relgit` directory under the XDG config dir (~/.config or $XDG_CONFIG_HOME).
/// Empty values are treated as unset per XDG Base Directory Specification.
fn user_config_dir() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join("relgit"))
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}
