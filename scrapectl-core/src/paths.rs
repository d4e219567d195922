//! Allow-list enforcement for caller-supplied paths.

use std::{
    ffi::OsString,
    io,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use crate::error::PathAccessError;

/// Restricts caller-supplied paths to a fixed set of directories.
///
/// Existing paths are canonicalised, so a symlink pointing outside the
/// allowed directories is rejected even when the link itself lives inside.
#[derive(Debug, Clone, Default)]
pub struct PathGuard {
    allowed: Vec<PathBuf>,
}

impl PathGuard {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let allowed = dirs
            .into_iter()
            .map(Into::into)
            .map(|dir| resolve_existing_prefix(&dir).unwrap_or(dir))
            .collect();
        Self { allowed }
    }

    pub fn allowed_dirs(&self) -> &[PathBuf] {
        &self.allowed
    }

    /// Resolve `path` and verify it sits under one of the allowed
    /// directories. Relative paths are taken relative to the first one.
    pub fn check_access(&self, path: &Path) -> Result<PathBuf, PathAccessError> {
        let base = self
            .allowed
            .first()
            .ok_or(PathAccessError::NoAllowedDirectories)?;

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };

        let resolved = resolve_existing_prefix(&absolute).map_err(|source| {
            PathAccessError::Unresolvable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if self.allowed.iter().any(|dir| resolved.starts_with(dir)) {
            Ok(resolved)
        } else {
            debug!(path = %resolved.display(), "path rejected by allow-list");
            Err(PathAccessError::Denied(resolved))
        }
    }
}

/// Collapse `.` and `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                out.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Canonicalise the deepest existing ancestor of `path` and re-append the
/// missing tail.
fn resolve_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    let lexical = normalize_lexically(path);
    let mut existing = lexical.as_path();
    let mut tail: Vec<OsString> = Vec::new();

    loop {
        match std::fs::canonicalize(existing) {
            Ok(mut resolved) => {
                for part in tail.iter().rev() {
                    resolved.push(part);
                }
                return Ok(resolved);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) =
                    (existing.parent(), existing.file_name())
                else {
                    return Ok(lexical.clone());
                };
                tail.push(name.to_os_string());
                existing = parent;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lexical_normalization_collapses_parent_segments() {
        assert_eq!(
            normalize_lexically(Path::new("/media/./movies/../tv/show")),
            PathBuf::from("/media/tv/show")
        );
        assert_eq!(
            normalize_lexically(Path::new("/../../etc")),
            PathBuf::from("/etc")
        );
    }

    #[test]
    fn files_inside_allowed_dir_are_accepted() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("video1.mp4");
        fs::write(&file, b"fake").unwrap();

        let guard = PathGuard::new([dir.path()]);
        let resolved = guard.check_access(&file).unwrap();
        assert_eq!(resolved, fs::canonicalize(&file).unwrap());
    }

    #[test]
    fn missing_files_inside_allowed_dir_are_accepted() {
        let dir = TempDir::new().unwrap();
        let guard = PathGuard::new([dir.path()]);
        let resolved = guard
            .check_access(&dir.path().join("later/clip.mkv"))
            .unwrap();
        assert!(resolved.ends_with("later/clip.mkv"));
    }

    #[test]
    fn relative_paths_resolve_against_first_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mp4"), b"fake").unwrap();
        let guard = PathGuard::new([dir.path()]);
        let resolved = guard.check_access(Path::new("a.mp4")).unwrap();
        assert_eq!(resolved, fs::canonicalize(dir.path().join("a.mp4")).unwrap());
    }

    #[test]
    fn paths_outside_or_escaping_are_denied() {
        let dir = TempDir::new().unwrap();
        let guard = PathGuard::new([dir.path().join("library")]);

        let err = guard
            .check_access(Path::new("/lib/video1.mp4"))
            .unwrap_err();
        assert!(matches!(err, PathAccessError::Denied(_)));

        let escape = dir.path().join("library/../secrets.txt");
        assert!(matches!(
            guard.check_access(&escape),
            Err(PathAccessError::Denied(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_pointing_outside_are_denied() {
        let allowed = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("secret.mp4");
        fs::write(&target, b"fake").unwrap();
        let link = allowed.path().join("link.mp4");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let guard = PathGuard::new([allowed.path()]);
        assert!(matches!(
            guard.check_access(&link),
            Err(PathAccessError::Denied(_))
        ));
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        let guard = PathGuard::default();
        assert!(matches!(
            guard.check_access(Path::new("/tmp")),
            Err(PathAccessError::NoAllowedDirectories)
        ));
    }
}
