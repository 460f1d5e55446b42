use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::inventory::Inventory;
use crate::record::RepositoryRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedRepository {
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub private: bool,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub language: Option<String>,
    pub default_branch: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub archived: bool,
    pub disabled: bool,
    pub topics: Vec<String>,
    pub cloned: bool,
    pub local_path: String,
}

impl From<&RepositoryRecord> for ExportedRepository {
    fn from(record: &RepositoryRecord) -> Self {
        let owner = record
            .identity()
            .split_once('/')
            .map(|(owner, _)| owner.to_string())
            .unwrap_or_default();

        Self {
            name: record.display_name.clone(),
            full_name: record.identity().to_string(),
            owner,
            private: record.is_private,
            description: record.description.clone(),
            html_url: record.web_url.clone(),
            stargazers_count: record.star_count,
            forks_count: record.fork_count,
            open_issues_count: record.open_issue_count,
            language: record.primary_language.clone(),
            default_branch: record.default_branch.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
            archived: record.archived,
            disabled: record.disabled,
            topics: record.topics.iter().cloned().collect(),
            cloned: record.is_cloned_locally(),
            local_path: record.local_path().display().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    generated_at: &'a str,
    count: usize,
    repos: &'a [ExportedRepository],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub json_path: PathBuf,
    pub markdown_files: usize,
}

/// Writes `repos.json` plus one `<owner>__<repo>.md` per repository into `out_dir`.
pub fn export_inventory(
    inventory: &Inventory,
    out_dir: &Path,
    generated_at: &str,
) -> Result<ExportSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create export directory {}", out_dir.display()))?;

    let repos: Vec<ExportedRepository> = inventory
        .records()
        .iter()
        .map(ExportedRepository::from)
        .collect();

    for repo in &repos {
        let path = out_dir.join(markdown_file_name(&repo.full_name));
        fs::write(&path, render_markdown(repo))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let document = ExportDocument {
        generated_at,
        count: repos.len(),
        repos: &repos,
    };
    let json = serde_json::to_string_pretty(&document).context("failed to serialize inventory")?;
    let json_path = out_dir.join("repos.json");
    fs::write(&json_path, json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    tracing::info!(path = %json_path.display(), count = repos.len(), "inventory exported");
    Ok(ExportSummary {
        json_path,
        markdown_files: repos.len(),
    })
}

pub fn markdown_file_name(full_name: &str) -> String {
    format!("{}.md", full_name.replace('/', "__"))
}

pub fn render_markdown(repo: &ExportedRepository) -> String {
    let mut lines = vec![format!("# {}", repo.full_name)];

    if let Some(description) = repo.description.as_deref().filter(|text| !text.is_empty()) {
        lines.push(String::new());
        lines.push(description.to_string());
    }

    lines.push(String::new());
    lines.push(format!("- URL: {}", repo.html_url));
    lines.push(format!("- Private: {}", repo.private));
    lines.push(format!("- Stars: {}", repo.stargazers_count));
    lines.push(format!("- Forks: {}", repo.forks_count));
    lines.push(format!("- Open issues: {}", repo.open_issues_count));
    lines.push(format!(
        "- Language: {}",
        repo.language.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "- Default branch: {}",
        repo.default_branch.as_deref().unwrap_or("-")
    ));
    lines.push(format!("- Archived: {}", repo.archived));

    if !repo.topics.is_empty() {
        lines.push(format!("- Topics: {}", repo.topics.join(", ")));
    }
    if let Some(created_at) = &repo.created_at {
        lines.push(format!("- Created: {created_at}"));
    }
    if let Some(updated_at) = &repo.updated_at {
        lines.push(format!("- Updated: {updated_at}"));
    }

    lines.join("\n")
}
