pub mod dispatch;
pub mod export;
pub mod inventory;
pub mod record;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use proman_core::audit::AuditLog;
use proman_core::command_runner::CommandRunner;
use proman_core::config::{ProjectConfig, home_dir, load_config_or_default};
use proman_core::editor::ReadinessPolicy;
use proman_core::remote::RepositorySource;
use proman_core::time::{Clock, FixedClock, SystemClock};

pub struct App<'a> {
    pub runner: &'a dyn CommandRunner,
    pub remote: &'a dyn RepositorySource,
    pub settings: &'a ProjectConfig,
    pub audit: &'a AuditLog,
    pub editor_readiness: ReadinessPolicy,
}

impl<'a> App<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        remote: &'a dyn RepositorySource,
        settings: &'a ProjectConfig,
        audit: &'a AuditLog,
    ) -> Self {
        Self {
            runner,
            remote,
            settings,
            audit,
            editor_readiness: ReadinessPolicy::default(),
        }
    }

    pub fn with_editor_readiness(mut self, policy: ReadinessPolicy) -> Self {
        self.editor_readiness = policy;
        self
    }
}

/// Loads the optional config file and resolves it against the home directory.
pub fn load_settings(config_path: &Path) -> Result<ProjectConfig> {
    let config = load_config_or_default(config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry.",
            config_path.display()
        )
    })?;
    let home = home_dir().context("failed to resolve home directory")?;

    Ok(ProjectConfig::from_config(&config, &home))
}

pub fn audit_log_for(settings: &ProjectConfig) -> AuditLog {
    let clock: Box<dyn Clock> = match &settings.fixed_timestamp {
        Some(timestamp) => Box::new(FixedClock(timestamp.clone())),
        None => Box::new(SystemClock),
    };

    AuditLog::new(settings.audit_log.clone(), clock)
}
