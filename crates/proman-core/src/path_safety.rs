//! Containment checks run before any destructive filesystem operation.

use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("refusing to touch {candidate}: path resolves outside {root}")]
pub struct PathEscape {
    pub root: PathBuf,
    pub candidate: PathBuf,
}

/// Resolves `path` to an absolute path with symlinks expanded.
///
/// Paths that do not exist yet are resolved through their longest existing
/// ancestor; the missing tail is normalized lexically.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    let components: Vec<Component<'_>> = absolute.components().collect();
    let mut last_error = None;

    for split in (1..=components.len()).rev() {
        let existing: PathBuf = components[..split].iter().collect();
        match fs::canonicalize(&existing) {
            Ok(canonical) => return Ok(apply_lexically(canonical, &components[split..])),
            Err(error) => last_error = Some(error),
        }
    }

    Err(last_error.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "empty path")))
}

fn apply_lexically(mut base: PathBuf, remainder: &[Component<'_>]) -> PathBuf {
    for component in remainder {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            Component::Normal(segment) => base.push(segment),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    base
}

/// True when `candidate` resolves to `root` itself or to a path below it.
/// Any resolution failure counts as not contained.
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    match (resolve(root), resolve(candidate)) {
        (Ok(root), Ok(candidate)) => candidate.starts_with(&root),
        _ => false,
    }
}

pub fn ensure_contained(root: &Path, candidate: &Path) -> Result<(), PathEscape> {
    if is_contained(root, candidate) {
        return Ok(());
    }

    tracing::warn!(
        root = %root.display(),
        candidate = %candidate.display(),
        "path escapes projects root"
    );
    Err(PathEscape {
        root: root.to_path_buf(),
        candidate: candidate.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_child_and_root_itself() {
        let root = Path::new("/home/u/projekte");

        assert!(is_contained(root, Path::new("/home/u/projekte/foo")));
        assert!(is_contained(root, Path::new("/home/u/projekte")));
        assert!(is_contained(root, Path::new("/home/u/projekte/./foo/bar")));
    }

    #[test]
    fn rejects_sibling_with_shared_prefix() {
        assert!(!is_contained(
            Path::new("/home/u/projekte"),
            Path::new("/home/u/projekte-evil/foo")
        ));
    }

    #[test]
    fn rejects_parent_traversal() {
        assert!(!is_contained(
            Path::new("/home/u/projekte"),
            Path::new("/home/u/projekte/../escape")
        ));
        assert!(is_contained(
            Path::new("/home/u/projekte"),
            Path::new("/home/u/projekte/a/../b")
        ));
    }

    #[test]
    fn resolves_existing_directories_on_disk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("projects");
        let child = root.join("repo");
        fs::create_dir_all(&child).expect("create child");

        assert!(is_contained(&root, &child));
        assert!(!is_contained(&child, &root));
        assert!(ensure_contained(&root, &child.join("not-yet")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlink_pointing_outside_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("projects");
        let outside = temp.path().join("elsewhere");
        fs::create_dir_all(&root).expect("create root");
        fs::create_dir_all(&outside).expect("create outside");
        let link = root.join("sneaky");
        std::os::unix::fs::symlink(&outside, &link).expect("symlink");

        assert!(!is_contained(&root, &link));
        let error = ensure_contained(&root, &link).expect_err("escape");
        assert_eq!(error.candidate, link);
    }
}
