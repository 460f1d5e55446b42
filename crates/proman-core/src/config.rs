use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::DEFAULT_API_BASE;
use crate::time::is_rfc3339;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromanConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for PromanConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            paths: PathsConfig::default(),
            github: GitHubConfig::default(),
            editor: EditorConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub projects_root: String,
    pub audit_log: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            projects_root: "~/projekte".to_string(),
            audit_log: "~/logs/proman.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneProtocol {
    #[default]
    Ssh,
    Https,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    pub api_base: String,
    pub per_page: u32,
    pub clone_protocol: CloneProtocol,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: 100,
            clone_protocol: CloneProtocol::Ssh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub program: String,
    pub socket_dir: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            program: "nvim".to_string(),
            socket_dir: "/tmp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Pins every audit entry to this timestamp instead of the wall clock.
    pub timestamp: Option<String>,
}

/// Settings resolved once at startup and passed by reference from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub projects_root: PathBuf,
    pub audit_log: PathBuf,
    pub fixed_timestamp: Option<String>,
    pub api_base: String,
    pub per_page: u32,
    pub clone_protocol: CloneProtocol,
    pub editor_program: String,
    pub socket_dir: PathBuf,
}

impl ProjectConfig {
    pub fn from_config(config: &PromanConfig, home: &Path) -> Self {
        Self {
            projects_root: expand_home(&config.paths.projects_root, home),
            audit_log: expand_home(&config.paths.audit_log, home),
            fixed_timestamp: config.audit.timestamp.clone(),
            api_base: config.github.api_base.clone(),
            per_page: config.github.per_page,
            clone_protocol: config.github.clone_protocol,
            editor_program: config.editor.program.clone(),
            socket_dir: expand_home(&config.editor.socket_dir, home),
        }
    }

    pub fn local_path_for(&self, repo_short_name: &str) -> PathBuf {
        self.projects_root.join(repo_short_name)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

fn default_version() -> u32 {
    1
}

pub fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::HomeDirectoryUnavailable)
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?
        .join(".config")
        .join("proman")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<PromanConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: PromanConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<PromanConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(PromanConfig::default());
    }

    load_config(path)
}

pub fn validate_config(config: &PromanConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(validation("version must be 1"));
    }

    if config.paths.projects_root.trim().is_empty() {
        return Err(validation("paths.projects_root must be non-empty"));
    }

    if config.paths.audit_log.trim().is_empty() {
        return Err(validation("paths.audit_log must be non-empty"));
    }

    if !(1..=100).contains(&config.github.per_page) {
        return Err(validation("github.per_page must be between 1 and 100"));
    }

    if !config.github.api_base.starts_with("http://")
        && !config.github.api_base.starts_with("https://")
    {
        return Err(validation("github.api_base must be an http(s) URL"));
    }

    if config.editor.program.trim().is_empty() {
        return Err(validation("editor.program must be non-empty"));
    }

    if let Some(timestamp) = &config.audit.timestamp {
        if !is_rfc3339(timestamp) {
            return Err(validation("audit.timestamp must be an RFC 3339 timestamp"));
        }
    }

    Ok(())
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}

pub fn expand_home(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        return home.to_path_buf();
    }

    match value.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_config_from_toml(raw: &str) -> Result<PromanConfig, ConfigError> {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        fs::write(file.path(), raw).expect("write temp config");
        load_config(file.path())
    }

    #[test]
    fn accepts_full_config() {
        let raw = r#"
version = 1

[paths]
projects_root = "~/code"
audit_log = "/var/tmp/proman.log"

[github]
api_base = "https://ghe.example.com/api/v3"
per_page = 50
clone_protocol = "https"

[editor]
program = "/usr/local/bin/nvim"
socket_dir = "~/.cache/proman"

[audit]
timestamp = "2025-01-01T00:00:00Z"
"#;

        let config = load_config_from_toml(raw).expect("valid config");
        assert_eq!(config.github.per_page, 50);
        assert_eq!(config.github.clone_protocol, CloneProtocol::Https);

        let settings = ProjectConfig::from_config(&config, Path::new("/home/u"));
        assert_eq!(settings.projects_root, PathBuf::from("/home/u/code"));
        assert_eq!(settings.audit_log, PathBuf::from("/var/tmp/proman.log"));
        assert_eq!(settings.socket_dir, PathBuf::from("/home/u/.cache/proman"));
        assert_eq!(
            settings.fixed_timestamp.as_deref(),
            Some("2025-01-01T00:00:00Z")
        );
        assert_eq!(
            settings.local_path_for("alpha"),
            PathBuf::from("/home/u/code/alpha")
        );
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = load_config_from_toml("").expect("defaults");
        assert_eq!(config, PromanConfig::default());

        let settings = ProjectConfig::from_config(&config, Path::new("/home/u"));
        assert_eq!(settings.projects_root, PathBuf::from("/home/u/projekte"));
        assert_eq!(settings.audit_log, PathBuf::from("/home/u/logs/proman.log"));
        assert_eq!(settings.editor_program, "nvim");
        assert_eq!(settings.clone_protocol, CloneProtocol::Ssh);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config =
            load_config_or_default(&temp.path().join("config.toml")).expect("defaults");
        assert_eq!(config, PromanConfig::default());
    }

    #[test]
    fn rejects_unknown_version() {
        let error = load_config_from_toml("version = 2\n").expect_err("config should fail");
        assert!(error.to_string().contains("version must be 1"));
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let error = load_config_from_toml("[github]\nper_page = 500\n")
            .expect_err("config should fail");
        assert!(error.to_string().contains("per_page"));
    }

    #[test]
    fn rejects_free_text_timestamp() {
        let error = load_config_from_toml("[audit]\ntimestamp = \"last tuesday\"\n")
            .expect_err("config should fail");
        assert!(error.to_string().contains("RFC 3339"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let error = load_config_from_toml("[paths]\nproject_root = \"~/x\"\n")
            .expect_err("config should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        let home = Path::new("/home/u");
        assert_eq!(expand_home("~", home), PathBuf::from("/home/u"));
        assert_eq!(expand_home("~/a", home), PathBuf::from("/home/u/a"));
        assert_eq!(expand_home("/abs/~/a", home), PathBuf::from("/abs/~/a"));
        assert_eq!(expand_home("~other/a", home), PathBuf::from("~other/a"));
    }
}
