//! Atomic file writes and path checks shared by the repositories.

use super::{RepoError, RepoResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Maps an `io::Error` at `path` to the repository taxonomy.
pub(crate) fn io_error(path: &Path, source: std::io::Error) -> RepoError {
    if source.kind() == ErrorKind::NotFound {
        RepoError::NotFound(path.to_path_buf())
    } else {
        RepoError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Replaces `path` with `bytes`, creating parent directories as needed.
pub(crate) fn write_replace(path: &Path, bytes: &[u8]) -> RepoResult<()> {
    let staged = stage(path, bytes)?;
    staged.persist(path).map_err(|err| RepoError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

/// Writes `path` only if nothing exists there yet.
pub(crate) fn write_new(path: &Path, bytes: &[u8]) -> RepoResult<()> {
    if path.exists() {
        return Err(RepoError::Conflict(path.to_path_buf()));
    }
    let staged = stage(path, bytes)?;
    staged.persist_noclobber(path).map_err(|err| {
        if err.error.kind() == ErrorKind::AlreadyExists {
            RepoError::Conflict(path.to_path_buf())
        } else {
            RepoError::Io {
                path: path.to_path_buf(),
                source: err.error,
            }
        }
    })?;
    Ok(())
}

fn stage(path: &Path, bytes: &[u8]) -> RepoResult<NamedTempFile> {
    let parent = path
        .parent()
        .ok_or_else(|| RepoError::InvalidPath(path.to_path_buf()))?;
    fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;

    let mut staged = NamedTempFile::new_in(parent).map_err(|err| io_error(parent, err))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.flush())
        .map_err(|err| io_error(path, err))?;
    Ok(staged)
}

/// Returns `path` when it lies under `root` without `..` hops.
pub(crate) fn contained_in(root: &Path, path: &Path) -> RepoResult<PathBuf> {
    let escapes = path
        .components()
        .any(|component| matches!(component, Component::ParentDir));
    if escapes || !path.starts_with(root) || path == root {
        return Err(RepoError::InvalidPath(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// A single directory-name component: non-empty, no separators, not `.`/`..`.
pub(crate) fn is_plain_component(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_new_refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/file.txt");

        write_new(&target, b"first").unwrap();
        let err = write_new(&target, b"second").unwrap_err();
        assert!(matches!(err, RepoError::Conflict(path) if path == target));
        assert_eq!(fs::read(&target).unwrap(), b"first");

        write_replace(&target, b"third").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"third");
    }

    #[test]
    fn staged_files_do_not_linger() {
        let dir = tempfile::tempdir().unwrap();
        write_replace(&dir.path().join("a.md"), b"x").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|item| item.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("a.md")]);
    }

    #[test]
    fn containment_rejects_escapes() {
        let root = Path::new("/data/entries");
        assert!(contained_in(root, Path::new("/data/entries/2024-01-01/a.md")).is_ok());
        assert!(contained_in(root, Path::new("/data/entries/../secret.md")).is_err());
        assert!(contained_in(root, Path::new("/data/other/a.md")).is_err());
        assert!(contained_in(root, root).is_err());
    }

    #[test]
    fn plain_component_check() {
        assert!(is_plain_component("MMA_Dimer"));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component("a/b"));
        assert!(!is_plain_component(""));
    }
}
