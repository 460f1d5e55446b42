use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::command_adapter;
use crate::command_runner::{CommandOutput, CommandRunner};
use crate::names::sanitize_socket_component;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to execute editor command: {0}")]
    Execute(String),
    #[error("editor command failed: {program} {command} (exit {status}) {stderr}")]
    CommandFailed {
        program: String,
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("failed to remove stale editor socket {path}: {source}")]
    StaleSocket {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("editor server at {address} did not become ready")]
    NotReady { address: String },
    #[error("editor path is not valid UTF-8")]
    InvalidPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStart {
    AlreadyRunning,
    Started,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(100),
        }
    }
}

pub fn session_address(socket_dir: &Path, repo_short_name: &str) -> PathBuf {
    socket_dir.join(format!(
        "proman_{}",
        sanitize_socket_component(repo_short_name)
    ))
}

pub fn server_is_live(
    program: &str,
    address: &Path,
    runner: &dyn CommandRunner,
) -> Result<bool, EditorError> {
    let address = utf8_path(address)?;
    let output = run_editor(
        runner,
        program,
        &["--server", address, "--remote-expr", "1"],
        None,
    )?;

    Ok(output.status_code == 0)
}

/// Starts a headless editor listening on `address` unless one already answers there.
pub fn ensure_server_running(
    program: &str,
    address: &Path,
    cwd: &Path,
    policy: ReadinessPolicy,
    runner: &dyn CommandRunner,
) -> Result<ServerStart, EditorError> {
    if server_is_live(program, address, runner)? {
        return Ok(ServerStart::AlreadyRunning);
    }

    if address.exists() {
        tracing::debug!(address = %address.display(), "removing stale editor socket");
        std::fs::remove_file(address).map_err(|source| EditorError::StaleSocket {
            path: address.to_path_buf(),
            source,
        })?;
    }

    let address_value = utf8_path(address)?;
    runner
        .spawn_detached(
            program,
            &["--headless", "--listen", address_value],
            Some(cwd),
        )
        .map_err(|error| EditorError::Execute(format!("{program}: {error}")))?;

    for _ in 0..policy.attempts {
        if server_is_live(program, address, runner)? {
            tracing::info!(address = %address.display(), "editor server started");
            return Ok(ServerStart::Started);
        }
        thread::sleep(policy.interval);
    }

    Err(EditorError::NotReady {
        address: address_value.to_string(),
    })
}

pub fn open_paths(
    program: &str,
    address: &Path,
    paths: &[&Path],
    runner: &dyn CommandRunner,
) -> Result<(), EditorError> {
    let mut args = vec!["--server", utf8_path(address)?, "--remote"];
    for path in paths {
        args.push(utf8_path(path)?);
    }

    let output = run_editor(runner, program, &args, None)?;
    command_adapter::ensure_success(&args, output)
        .map(|_| ())
        .map_err(|failure| EditorError::CommandFailed {
            program: program.to_string(),
            command: failure.command,
            status: failure.status,
            stderr: failure.stderr,
        })
}

fn utf8_path(path: &Path) -> Result<&str, EditorError> {
    path.to_str().ok_or(EditorError::InvalidPath)
}

fn run_editor(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, EditorError> {
    command_adapter::run_program(runner, program, args, cwd).map_err(EditorError::Execute)
}
