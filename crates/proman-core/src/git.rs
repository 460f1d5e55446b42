use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command_adapter;
use crate::command_runner::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AheadBehind {
    pub ahead: u32,
    pub behind: u32,
}

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git command failed: git {command} (exit {status}) {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("failed to execute git command: {0}")]
    Execute(String),
    #[error("failed to parse git output: {0}")]
    Parse(String),
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn clone_repository(
    url: &str,
    destination: &Path,
    runner: &dyn CommandRunner,
) -> Result<(), GitError> {
    let url = non_empty_trimmed(url, "clone url cannot be empty")?;
    let target = utf8_path(destination, "clone destination is not valid UTF-8")?;

    run_git_checked(runner, &["clone", url, target], None)?;
    Ok(())
}

pub fn status_is_dirty(repo_path: &Path, runner: &dyn CommandRunner) -> Result<bool, GitError> {
    let output = run_git_checked(runner, &["status", "--porcelain"], Some(repo_path))?;
    Ok(output.stdout.lines().any(|line| !line.trim().is_empty()))
}

/// Commits ahead of and behind the upstream branch.
///
/// Returns `Ok(None)` when git refuses the comparison, which covers a missing
/// upstream and a detached HEAD.
pub fn ahead_behind(
    repo_path: &Path,
    runner: &dyn CommandRunner,
) -> Result<Option<AheadBehind>, GitError> {
    let output = run_git(
        runner,
        &["rev-list", "--left-right", "--count", "@{u}...HEAD"],
        Some(repo_path),
    )?;

    if output.status_code != 0 {
        return Ok(None);
    }

    parse_left_right_counts(&output).map(Some)
}

pub fn remove_tree(path: &Path) -> Result<(), GitError> {
    std::fs::remove_dir_all(path).map_err(|source| GitError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_left_right_counts(output: &CommandOutput) -> Result<AheadBehind, GitError> {
    let line = first_non_empty_stdout_line(output, "git rev-list returned no counts")?;
    let mut fields = line.split_whitespace();

    let mut next_count = |label: &str| -> Result<u32, GitError> {
        fields
            .next()
            .ok_or_else(|| GitError::Parse(format!("missing {label} count in '{line}'")))?
            .parse::<u32>()
            .map_err(|error| GitError::Parse(format!("invalid {label} count: {error}")))
    };

    // Left side of `@{u}...HEAD` is the upstream, so it counts commits we are behind.
    let behind = next_count("behind")?;
    let ahead = next_count("ahead")?;

    Ok(AheadBehind { ahead, behind })
}

fn utf8_path<'a>(path: &'a Path, message: &str) -> Result<&'a str, GitError> {
    path.to_str()
        .ok_or_else(|| GitError::Parse(message.to_string()))
}

fn non_empty_trimmed<'a>(value: &'a str, message: &str) -> Result<&'a str, GitError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GitError::Parse(message.to_string()));
    }

    Ok(trimmed)
}

fn first_non_empty_stdout_line(output: &CommandOutput, message: &str) -> Result<String, GitError> {
    output
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GitError::Parse(message.to_string()))
}

fn run_git_checked(
    runner: &dyn CommandRunner,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, GitError> {
    let output = run_git(runner, args, cwd)?;
    command_adapter::ensure_success(args, output).map_err(|failure| GitError::CommandFailed {
        command: failure.command,
        status: failure.status,
        stderr: failure.stderr,
    })
}

fn run_git(
    runner: &dyn CommandRunner,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, GitError> {
    command_adapter::run_program(runner, "git", args, cwd).map_err(GitError::Execute)
}
