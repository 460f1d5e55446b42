//! GitHub token bootstrap from `~/.proman`, `GITHUB_TOKEN`, or a prompt.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const TOKEN_FILE_NAME: &str = ".proman";

const DATETIME_MARKER: &str = "current_datetime:";
const SAVED_AT_MARKER: &str = "saved_at:";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read token from stdin: {0}")]
    Prompt(#[source] io::Error),
    #[error("no GitHub token: set GITHUB_TOKEN or write one to {path}")]
    Missing { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenFile {
    pub token: Option<String>,
    pub current_datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    /// Fixed audit timestamp carried in the token file, if any.
    pub current_datetime: Option<String>,
}

pub trait TokenPrompt {
    fn read_token(&mut self) -> io::Result<String>;
}

#[derive(Debug, Default)]
pub struct StdinPrompt;

impl TokenPrompt for StdinPrompt {
    fn read_token(&mut self) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(
            stderr,
            "No ~/{TOKEN_FILE_NAME} found. Enter a GitHub token (saved to ~/{TOKEN_FILE_NAME}): "
        )?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Blank lines and comments are skipped; the first other line is the token.
/// A `current_datetime:` marker, commented or bare, is picked up on the way.
pub fn parse_token_file(contents: &str) -> TokenFile {
    let mut parsed = TokenFile::default();

    for line in contents.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let body = line.trim_start_matches('#').trim();
        if let Some(value) = strip_marker(body) {
            if parsed.current_datetime.is_none() {
                let value = strip_tags(value);
                if !value.is_empty() {
                    parsed.current_datetime = Some(value);
                }
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        parsed.token = Some(line.to_string());
        break;
    }

    parsed
}

fn strip_marker(line: &str) -> Option<&str> {
    let prefix = line.get(..DATETIME_MARKER.len())?;
    prefix
        .eq_ignore_ascii_case(DATETIME_MARKER)
        .then(|| line[DATETIME_MARKER.len()..].trim())
}

/// Drops `<...>` wrappers such as `<current_datetime>...</current_datetime>`.
fn strip_tags(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut in_tag = false;
    for ch in value.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => output.push(ch),
            _ => {}
        }
    }
    output.trim().to_string()
}

/// Resolves the token. A token that did not come from the file is saved there.
pub fn load_credentials(
    token_path: &Path,
    env_token: Option<String>,
    prompt: &mut dyn TokenPrompt,
    saved_at: &str,
) -> Result<Credentials, CredentialsError> {
    let from_file = if token_path.exists() {
        let contents = fs::read_to_string(token_path).map_err(|source| CredentialsError::Read {
            path: token_path.to_path_buf(),
            source,
        })?;
        parse_token_file(&contents)
    } else {
        TokenFile::default()
    };

    if let Some(token) = from_file.token {
        tracing::debug!(path = %token_path.display(), "token loaded from file");
        return Ok(Credentials {
            token,
            current_datetime: from_file.current_datetime,
        });
    }

    let token = match env_token.map(|value| value.trim().to_string()) {
        Some(token) if !token.is_empty() => token,
        _ => prompt.read_token().map_err(CredentialsError::Prompt)?,
    };
    if token.is_empty() {
        return Err(CredentialsError::Missing {
            path: token_path.to_path_buf(),
        });
    }

    if let Err(error) = save_token(token_path, &token, saved_at) {
        tracing::warn!(path = %token_path.display(), %error, "failed to save token file");
    }

    Ok(Credentials {
        token,
        current_datetime: from_file.current_datetime,
    })
}

/// The header records when the file was written. It is not a
/// `current_datetime:` marker, so reading it back leaves the audit clock live.
pub fn save_token(token_path: &Path, token: &str, saved_at: &str) -> io::Result<()> {
    fs::write(
        token_path,
        format!("# {SAVED_AT_MARKER} {saved_at}\n{}\n", token.trim()),
    )?;
    restrict_permissions(token_path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
