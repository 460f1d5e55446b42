use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use proman_core::config::{CloneProtocol, ProjectConfig};
use proman_core::git::AheadBehind;
use proman_core::local_state::LocalState;
use proman_core::names::short_name;
use proman_core::remote::RemoteRepository;

/// A remote repository annotated with what is on disk for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    identity: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub web_url: String,
    pub clone_url: String,
    pub star_count: u64,
    pub fork_count: u64,
    pub open_issue_count: u64,
    pub primary_language: Option<String>,
    pub default_branch: Option<String>,
    pub topics: BTreeSet<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub archived: bool,
    pub disabled: bool,
    local_path: PathBuf,
    local: LocalState,
}

impl RepositoryRecord {
    /// Maps a fetched repository. Local state starts as not cloned until inspected.
    pub fn from_remote(remote: RemoteRepository, settings: &ProjectConfig) -> Self {
        let clone_url = match settings.clone_protocol {
            CloneProtocol::Ssh => remote.ssh_url.clone(),
            CloneProtocol::Https => remote.clone_url.clone(),
        }
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| remote.html_url.clone());

        let local_path = settings.local_path_for(short_name(&remote.full_name));

        Self {
            identity: remote.full_name,
            display_name: remote.name,
            description: remote.description,
            is_private: remote.private,
            web_url: remote.html_url,
            clone_url,
            star_count: remote.stargazers_count,
            fork_count: remote.forks_count,
            open_issue_count: remote.open_issues_count,
            primary_language: remote.language,
            default_branch: remote.default_branch,
            topics: remote.topics.into_iter().collect(),
            created_at: remote.created_at,
            updated_at: remote.updated_at,
            archived: remote.archived,
            disabled: remote.disabled,
            local_path,
            local: LocalState::NotCloned,
        }
    }

    /// `owner/name` as fetched. Renames do not change it until the next refetch.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.identity)
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn local_state(&self) -> LocalState {
        self.local
    }

    pub fn is_cloned_locally(&self) -> bool {
        self.local.is_cloned()
    }

    pub fn ahead_behind(&self) -> Option<AheadBehind> {
        match self.local {
            LocalState::Cloned { ahead_behind, .. } => ahead_behind,
            LocalState::NotCloned => None,
        }
    }

    pub fn ahead_count(&self) -> Option<u32> {
        self.ahead_behind().map(|counts| counts.ahead)
    }

    pub fn behind_count(&self) -> Option<u32> {
        self.ahead_behind().map(|counts| counts.behind)
    }

    pub fn has_uncommitted_changes(&self) -> Option<bool> {
        match self.local {
            LocalState::Cloned { dirty, .. } => dirty,
            LocalState::NotCloned => None,
        }
    }

    pub fn apply_local_state(&mut self, state: LocalState) {
        self.local = state;
    }

    /// Freshly cloned: present on disk, status not read yet.
    pub fn mark_cloned(&mut self) {
        self.local = LocalState::Cloned {
            dirty: None,
            ahead_behind: None,
        };
    }

    pub fn mark_not_cloned(&mut self) {
        self.local = LocalState::NotCloned;
    }
}
