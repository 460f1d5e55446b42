//! Append-only record of state-changing actions.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::time::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Clone,
    LocalDeleteBeforeClone,
    LocalDelete,
    RemoteDelete,
    Edit,
    Create,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::LocalDeleteBeforeClone => "local_delete_before_clone",
            Self::LocalDelete => "local_delete",
            Self::RemoteDelete => "remote_delete",
            Self::Edit => "edit",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: String,
    pub action: AuditAction,
    pub repository: String,
    pub local_path: Option<PathBuf>,
    pub success: bool,
    pub detail: Option<String>,
}

impl AuditEntry {
    pub fn to_line(&self) -> String {
        let local_path = self
            .local_path
            .as_ref()
            .map(|path| quote_if_needed(&path.display().to_string()))
            .unwrap_or_else(|| "-".to_string());

        let mut line = format!(
            "{} {} repo={} local_path={} success={}",
            self.timestamp, self.action, self.repository, local_path, self.success
        );

        if let Some(detail) = &self.detail {
            line.push_str(" error=");
            line.push_str(&flatten(detail));
        }

        line
    }
}

/// Paths with whitespace or quotes are written as escaped, double-quoted strings
/// so every line still splits into `key=value` fields.
fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.chars().any(|ch| ch.is_whitespace() || ch == '"') {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

fn flatten(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to create audit log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to audit log {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct AuditLog {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl AuditLog {
    pub fn new(path: PathBuf, clock: Box<dyn Clock>) -> Self {
        Self { path, clock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamps and appends one entry. The file is opened and closed per call.
    pub fn record(
        &self,
        action: AuditAction,
        repository: &str,
        local_path: Option<&Path>,
        outcome: Result<(), &str>,
    ) -> Result<AuditEntry, AuditError> {
        let entry = AuditEntry {
            timestamp: self.clock.timestamp(),
            action,
            repository: repository.to_string(),
            local_path: local_path.map(Path::to_path_buf),
            success: outcome.is_ok(),
            detail: outcome.err().map(str::to_string),
        };

        self.append(&entry)?;
        Ok(entry)
    }

    pub fn append(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|source| AuditError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| AuditError::Append {
                path: self.path.clone(),
                source,
            })?;

        writeln!(file, "{}", entry.to_line()).map_err(|source| AuditError::Append {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(
            action = %entry.action,
            repo = %entry.repository,
            success = entry.success,
            "audit entry recorded"
        );
        Ok(())
    }
}
