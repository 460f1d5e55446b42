use thiserror::Error;

const MAX_REPOSITORY_NAME_LEN: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("repository name must be between 1 and {MAX_REPOSITORY_NAME_LEN} characters")]
    InvalidLength,
    #[error("repository name cannot be '.' or '..'")]
    Reserved,
    #[error("repository name contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub fn validate_repository_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() || name.chars().count() > MAX_REPOSITORY_NAME_LEN {
        return Err(NameError::InvalidLength);
    }

    if name == "." || name == ".." {
        return Err(NameError::Reserved);
    }

    for character in name.chars() {
        if is_repository_name_character(character) {
            continue;
        }

        return Err(NameError::InvalidCharacter { character });
    }

    Ok(())
}

/// Final segment of an `owner/name` identity.
pub fn short_name(identity: &str) -> &str {
    identity
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(identity)
}

/// Makes `value` safe to embed in a socket file name.
pub fn sanitize_socket_component(value: &str) -> String {
    let output: String = value
        .chars()
        .map(|character| {
            if is_repository_name_character(character) {
                character
            } else {
                '-'
            }
        })
        .collect();

    if output.is_empty() || output.chars().all(|character| character == '.') {
        return "repo".to_string();
    }

    output
}

fn is_repository_name_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_repository_name_accepts_github_style_names() {
        assert!(validate_repository_name("proman").is_ok());
        assert!(validate_repository_name("My.Repo_2-x").is_ok());
        assert!(validate_repository_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn validate_repository_name_rejects_invalid_input() {
        assert_eq!(validate_repository_name(""), Err(NameError::InvalidLength));
        assert_eq!(
            validate_repository_name(&"a".repeat(101)),
            Err(NameError::InvalidLength)
        );
        assert_eq!(validate_repository_name(".."), Err(NameError::Reserved));
        assert_eq!(
            validate_repository_name("owner/repo"),
            Err(NameError::InvalidCharacter { character: '/' })
        );
        assert_eq!(
            validate_repository_name("has space"),
            Err(NameError::InvalidCharacter { character: ' ' })
        );
    }

    #[test]
    fn short_name_takes_last_identity_segment() {
        assert_eq!(short_name("u/alpha"), "alpha");
        assert_eq!(short_name("alpha"), "alpha");
        assert_eq!(short_name("org/team/alpha/"), "alpha");
    }

    #[test]
    fn sanitize_socket_component_replaces_separators() {
        assert_eq!(sanitize_socket_component("my repo"), "my-repo");
        assert_eq!(sanitize_socket_component("a/../b"), "a-..-b");
        assert_eq!(sanitize_socket_component(".."), "repo");
        assert_eq!(sanitize_socket_component(""), "repo");
    }
}
