use std::path::Path;

use crate::command_runner::CommandRunner;
use crate::git::{self, AheadBehind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalState {
    NotCloned,
    /// `None` fields mean git could not tell.
    Cloned {
        dirty: Option<bool>,
        ahead_behind: Option<AheadBehind>,
    },
}

impl LocalState {
    pub fn is_cloned(&self) -> bool {
        matches!(self, Self::Cloned { .. })
    }
}

pub fn inspect(local_path: &Path, runner: &dyn CommandRunner) -> LocalState {
    if !local_path.exists() {
        return LocalState::NotCloned;
    }

    let dirty = match git::status_is_dirty(local_path, runner) {
        Ok(dirty) => Some(dirty),
        Err(error) => {
            tracing::debug!(path = %local_path.display(), %error, "dirty check unavailable");
            None
        }
    };

    let ahead_behind = match git::ahead_behind(local_path, runner) {
        Ok(counts) => counts,
        Err(error) => {
            tracing::debug!(path = %local_path.display(), %error, "ahead/behind unavailable");
            None
        }
    };

    LocalState::Cloned {
        dirty,
        ahead_behind,
    }
}
