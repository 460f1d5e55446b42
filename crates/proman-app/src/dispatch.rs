//! Confirmation-gated actions against a single inventory record.
//!
//! Every operation takes the session's inventory and an index into it. The
//! index is checked before anything else happens, and nothing touches the
//! filesystem outside the projects root.

use std::path::{Path, PathBuf};

use proman_core::audit::AuditAction;
use proman_core::editor::{self, EditorError};
use proman_core::git::{self, AheadBehind, GitError};
use proman_core::local_state::{self, LocalState};
use proman_core::names::{NameError, validate_repository_name};
use proman_core::path_safety::{PathEscape, ensure_contained};
use proman_core::remote::{NewRepository, RemoteError, RepositoryEdit};
use thiserror::Error;

use crate::App;
use crate::inventory::Inventory;
use crate::record::RepositoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    /// Anything starting with `y` (any case) confirms.
    pub fn from_input(input: &str) -> Self {
        if input.trim().to_lowercase().starts_with('y') {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }

    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    RecordUpdated,
    RecordRemoved,
    RefreshRequired,
    Unchanged,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub summary: String,
    pub effect: ActionEffect,
    /// Set when the action succeeded but its audit entry could not be written.
    pub audit_error: Option<String>,
}

impl ActionOutcome {
    fn new(summary: impl Into<String>, effect: ActionEffect) -> Self {
        Self {
            summary: summary.into(),
            effect,
            audit_error: None,
        }
    }

    fn cancelled(summary: impl Into<String>) -> Self {
        Self::new(summary, ActionEffect::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDeletePreview {
    pub identity: String,
    pub local_path: PathBuf,
    pub dirty: Option<bool>,
    pub ahead_behind: Option<AheadBehind>,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("selection {index} is out of range ({len} repositories)")]
    StaleIndex { index: usize, len: usize },
    #[error("no local copy found at {path}")]
    LocalNotFound { path: PathBuf },
    #[error("{path} already exists; confirm overwrite to replace it")]
    TargetExists { path: PathBuf },
    #[error(transparent)]
    PathEscape(#[from] PathEscape),
    #[error("failed to create {path}: {source}")]
    CreateProjectsRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("clone of {identity} failed: {source}")]
    CloneFailed {
        identity: String,
        #[source]
        source: GitError,
    },
    #[error("failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: GitError,
    },
    #[error("remote {operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },
    #[error("editor failed: {0}")]
    Editor(#[from] EditorError),
    #[error("invalid repository name: {0}")]
    InvalidName(#[from] NameError),
}

impl<'a> App<'a> {
    /// True when the clone target is already on disk and an overwrite must be confirmed.
    pub fn clone_target_exists(
        &self,
        inventory: &Inventory,
        index: usize,
    ) -> Result<bool, ActionError> {
        Ok(record_at(inventory, index)?.local_path().exists())
    }

    pub fn clone_repository(
        &self,
        inventory: &mut Inventory,
        index: usize,
        overwrite: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        let record = record_at(inventory, index)?;
        let identity = record.identity().to_string();
        let local_path = record.local_path().to_path_buf();
        let url = record.clone_url.clone();

        if local_path.exists() {
            if !overwrite.is_confirmed() {
                return Err(ActionError::TargetExists { path: local_path });
            }

            ensure_contained(&self.settings.projects_root, &local_path)?;
            if let Err(error) = git::remove_tree(&local_path) {
                self.audit_failure(
                    AuditAction::LocalDeleteBeforeClone,
                    &identity,
                    Some(&local_path),
                    &error.to_string(),
                );
                return Err(ActionError::RemoveFailed {
                    path: local_path,
                    source: error,
                });
            }
            if let Some(record) = inventory.get_mut(index) {
                record.mark_not_cloned();
            }
            self.audit_success(
                AuditAction::LocalDeleteBeforeClone,
                &identity,
                Some(&local_path),
            );
        }

        std::fs::create_dir_all(&self.settings.projects_root).map_err(|source| {
            ActionError::CreateProjectsRoot {
                path: self.settings.projects_root.clone(),
                source,
            }
        })?;

        tracing::info!(repo = %identity, path = %local_path.display(), "cloning");
        if let Err(error) = git::clone_repository(&url, &local_path, self.runner) {
            self.audit_failure(
                AuditAction::Clone,
                &identity,
                Some(&local_path),
                &error.to_string(),
            );
            return Err(ActionError::CloneFailed {
                identity,
                source: error,
            });
        }

        if let Some(record) = inventory.get_mut(index) {
            record.mark_cloned();
        }
        let audit_error = self.audit_success(AuditAction::Clone, &identity, Some(&local_path));

        Ok(ActionOutcome {
            summary: format!("Cloned {identity} into {}", local_path.display()),
            effect: ActionEffect::RecordUpdated,
            audit_error,
        })
    }

    /// Fresh status of a working copy, shown before asking to delete it.
    pub fn local_delete_preview(
        &self,
        inventory: &mut Inventory,
        index: usize,
    ) -> Result<LocalDeletePreview, ActionError> {
        ensure_local_copy(inventory, index)?;
        let record = record_at(inventory, index)?;
        let identity = record.identity().to_string();
        let local_path = record.local_path().to_path_buf();

        let (dirty, ahead_behind) = match local_state::inspect(&local_path, self.runner) {
            LocalState::Cloned {
                dirty,
                ahead_behind,
            } => (dirty, ahead_behind),
            LocalState::NotCloned => {
                forget_local_copy(inventory, index);
                return Err(ActionError::LocalNotFound { path: local_path });
            }
        };

        Ok(LocalDeletePreview {
            identity,
            local_path,
            dirty,
            ahead_behind,
        })
    }

    pub fn delete_local(
        &self,
        inventory: &mut Inventory,
        index: usize,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        ensure_local_copy(inventory, index)?;
        let record = record_at(inventory, index)?;
        let identity = record.identity().to_string();
        let local_path = record.local_path().to_path_buf();

        if !confirmation.is_confirmed() {
            return Ok(ActionOutcome::cancelled(format!(
                "Kept local copy of {identity}"
            )));
        }

        ensure_contained(&self.settings.projects_root, &local_path)?;

        if let Err(error) = git::remove_tree(&local_path) {
            self.audit_failure(
                AuditAction::LocalDelete,
                &identity,
                Some(&local_path),
                &error.to_string(),
            );
            return Err(ActionError::RemoveFailed {
                path: local_path,
                source: error,
            });
        }

        if let Some(record) = inventory.get_mut(index) {
            record.mark_not_cloned();
        }
        let audit_error = self.audit_success(AuditAction::LocalDelete, &identity, Some(&local_path));

        Ok(ActionOutcome {
            summary: format!("Deleted local copy {}", local_path.display()),
            effect: ActionEffect::RecordUpdated,
            audit_error,
        })
    }

    pub fn delete_remote(
        &self,
        inventory: &mut Inventory,
        index: usize,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, ActionError> {
        let record = record_at(inventory, index)?;
        let identity = record.identity().to_string();
        let local_path = record.local_path().to_path_buf();

        if !confirmation.is_confirmed() {
            return Ok(ActionOutcome::cancelled(format!("Kept {identity}")));
        }

        if let Err(error) = self.remote.delete_repository(&identity) {
            self.audit_failure(
                AuditAction::RemoteDelete,
                &identity,
                Some(&local_path),
                &error.to_string(),
            );
            return Err(ActionError::Remote {
                operation: "delete",
                source: error,
            });
        }

        inventory.remove(index);
        let audit_error =
            self.audit_success(AuditAction::RemoteDelete, &identity, Some(&local_path));

        Ok(ActionOutcome {
            summary: format!("Deleted repository {identity}"),
            effect: ActionEffect::RecordRemoved,
            audit_error,
        })
    }

    pub fn edit_repository(
        &self,
        inventory: &mut Inventory,
        index: usize,
        edit: RepositoryEdit,
    ) -> Result<ActionOutcome, ActionError> {
        let record = record_at(inventory, index)?;
        let identity = record.identity().to_string();
        let local_path = record.local_path().to_path_buf();

        if edit.is_empty() {
            return Ok(ActionOutcome::cancelled(format!("No changes for {identity}")));
        }

        if let Some(name) = &edit.name {
            validate_repository_name(name)?;
        }

        let updated = match self.remote.edit_repository(&identity, &edit) {
            Ok(updated) => updated,
            Err(error) => {
                self.audit_failure(
                    AuditAction::Edit,
                    &identity,
                    Some(&local_path),
                    &error.to_string(),
                );
                return Err(ActionError::Remote {
                    operation: "edit",
                    source: error,
                });
            }
        };

        if let Some(record) = inventory.get_mut(index) {
            record.display_name = updated.name;
            record.description = updated.description;
            record.is_private = updated.private;
        }
        let audit_error = self.audit_success(AuditAction::Edit, &identity, Some(&local_path));

        Ok(ActionOutcome {
            summary: format!("Updated {identity}"),
            effect: ActionEffect::RecordUpdated,
            audit_error,
        })
    }

    /// The audit line names the directory a later clone would use.
    pub fn create_repository(&self, request: NewRepository) -> Result<ActionOutcome, ActionError> {
        validate_repository_name(&request.name)?;
        let local_path = self.settings.local_path_for(&request.name);

        match self.remote.create_repository(&request) {
            Ok(created) => {
                let audit_error =
                    self.audit_success(AuditAction::Create, &created.full_name, Some(&local_path));
                Ok(ActionOutcome {
                    summary: format!("Created repository {}", created.full_name),
                    effect: ActionEffect::RefreshRequired,
                    audit_error,
                })
            }
            Err(error) => {
                self.audit_failure(
                    AuditAction::Create,
                    &request.name,
                    Some(&local_path),
                    &error.to_string(),
                );
                Err(ActionError::Remote {
                    operation: "create",
                    source: error,
                })
            }
        }
    }

    /// Opens the working copy in a per-repository editor server, starting it if needed.
    pub fn open_in_editor(
        &self,
        inventory: &mut Inventory,
        index: usize,
    ) -> Result<ActionOutcome, ActionError> {
        ensure_local_copy(inventory, index)?;
        let record = record_at(inventory, index)?;

        let program = self.settings.editor_program.as_str();
        let address = editor::session_address(&self.settings.socket_dir, record.short_name());

        let start = editor::ensure_server_running(
            program,
            &address,
            record.local_path(),
            self.editor_readiness,
            self.runner,
        )?;
        editor::open_paths(program, &address, &[record.local_path()], self.runner)?;

        tracing::info!(repo = record.identity(), address = %address.display(), ?start, "opened in editor");
        Ok(ActionOutcome::new(
            format!("Opened {} in editor at {}", record.identity(), address.display()),
            ActionEffect::Unchanged,
        ))
    }

    fn audit_success(
        &self,
        action: AuditAction,
        identity: &str,
        local_path: Option<&Path>,
    ) -> Option<String> {
        self.write_audit(action, identity, local_path, Ok(()))
    }

    fn audit_failure(
        &self,
        action: AuditAction,
        identity: &str,
        local_path: Option<&Path>,
        detail: &str,
    ) {
        self.write_audit(action, identity, local_path, Err(detail));
    }

    fn write_audit(
        &self,
        action: AuditAction,
        identity: &str,
        local_path: Option<&Path>,
        outcome: Result<(), &str>,
    ) -> Option<String> {
        match self.audit.record(action, identity, local_path, outcome) {
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(%error, %action, repo = identity, "audit write failed");
                Some(error.to_string())
            }
        }
    }
}

fn record_at(inventory: &Inventory, index: usize) -> Result<&RepositoryRecord, ActionError> {
    inventory.get(index).ok_or(ActionError::StaleIndex {
        index,
        len: inventory.len(),
    })
}

/// Fails with `LocalNotFound` unless the record is cloned and its directory is
/// still there. A record whose directory vanished is marked not cloned.
fn ensure_local_copy(inventory: &mut Inventory, index: usize) -> Result<(), ActionError> {
    let record = record_at(inventory, index)?;
    if record.is_cloned_locally() && record.local_path().exists() {
        return Ok(());
    }

    let path = record.local_path().to_path_buf();
    forget_local_copy(inventory, index);
    Err(ActionError::LocalNotFound { path })
}

fn forget_local_copy(inventory: &mut Inventory, index: usize) {
    if let Some(record) = inventory.get_mut(index)
        && record.is_cloned_locally()
    {
        tracing::info!(
            repo = record.identity(),
            path = %record.local_path().display(),
            "local copy disappeared"
        );
        record.mark_not_cloned();
    }
}
