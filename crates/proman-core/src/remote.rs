use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("authentication failed: token is invalid or expired")]
    Unauthorized,
    #[error("token contains characters that cannot be sent in a header")]
    InvalidToken,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("GitHub API returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to parse GitHub response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteOwner {
    pub login: String,
}

/// One repository as returned by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteRepository {
    pub full_name: String,
    pub name: String,
    pub owner: RemoteOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    #[serde(default)]
    pub ssh_url: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepositoryPage {
    pub items: Vec<RemoteRepository>,
    pub next_page: Option<u32>,
    /// Upper bound on the number of repositories, when the service reports a last page.
    pub total_hint: Option<usize>,
}

/// Fields to change on an existing repository. `None` leaves a field as is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RepositoryEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl RepositoryEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.private.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepository {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
}

pub trait RepositorySource {
    fn fetch_page(&self, page: u32) -> Result<RepositoryPage, RemoteError>;

    fn create_repository(&self, request: &NewRepository) -> Result<RemoteRepository, RemoteError>;

    fn edit_repository(
        &self,
        full_name: &str,
        edit: &RepositoryEdit,
    ) -> Result<RemoteRepository, RemoteError>;

    fn delete_repository(&self, full_name: &str) -> Result<(), RemoteError>;
}

/// Lazy paginator: pages are requested one at a time as items are consumed.
/// After the first error the iterator is exhausted.
pub struct Pages<'a> {
    source: &'a dyn RepositorySource,
    next_page: Option<u32>,
    buffered: VecDeque<RemoteRepository>,
    total_hint: Option<usize>,
}

impl<'a> Pages<'a> {
    pub fn new(source: &'a dyn RepositorySource) -> Self {
        Self {
            source,
            next_page: Some(1),
            buffered: VecDeque::new(),
            total_hint: None,
        }
    }

    pub fn total_hint(&self) -> Option<usize> {
        self.total_hint
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<RemoteRepository, RemoteError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }

            let page_number = self.next_page.take()?;
            tracing::debug!(page = page_number, "fetching repository page");

            match self.source.fetch_page(page_number) {
                Ok(page) => {
                    if page.total_hint.is_some() {
                        self.total_hint = page.total_hint;
                    }
                    self.next_page = page.next_page.filter(|next| *next > page_number);
                    self.buffered.extend(page.items);
                }
                Err(error) => return Some(Err(error)),
            }
        }
    }
}
