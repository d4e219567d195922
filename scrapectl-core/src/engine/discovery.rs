use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::EngineError;

/// Walks media roots and collects the files a directory scrape will visit.
#[derive(Debug, Clone)]
pub struct MediaDiscovery {
    /// Lower-case extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Maximum depth for directory traversal (None = unlimited)
    pub max_depth: Option<usize>,
    pub follow_links: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Media files, sorted per root in traversal order.
    pub items: Vec<PathBuf>,
    pub skipped_files: usize,
    pub errors: Vec<String>,
}

impl MediaDiscovery {
    pub fn new(extensions: Vec<String>) -> Self {
        Self {
            extensions,
            max_depth: None,
            follow_links: false,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn is_media_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|candidate| *candidate == ext)
            })
            .unwrap_or(false)
    }

    pub fn check_root(root: &Path) -> Result<(), EngineError> {
        if root.is_dir() {
            Ok(())
        } else {
            Err(EngineError::InvalidRoot(root.to_path_buf()))
        }
    }

    /// Fails only when a root is missing or not a directory; unreadable
    /// entries below a root are collected into `errors`.
    pub fn discover(&self, roots: &[PathBuf]) -> Result<DiscoveryResult, EngineError> {
        if roots.is_empty() {
            return Err(EngineError::NoMediaRoots);
        }

        let mut combined = DiscoveryResult::default();
        for root in roots {
            let result = self.discover_root(root)?;
            combined.items.extend(result.items);
            combined.skipped_files += result.skipped_files;
            combined.errors.extend(result.errors);
        }

        info!(
            roots = roots.len(),
            items = combined.items.len(),
            skipped = combined.skipped_files,
            errors = combined.errors.len(),
            "media discovery complete"
        );
        Ok(combined)
    }

    fn discover_root(&self, root: &Path) -> Result<DiscoveryResult, EngineError> {
        Self::check_root(root)?;

        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut result = DiscoveryResult::default();
        for entry in walker.into_iter().filter_entry(|entry| !is_hidden(entry)) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if self.is_media_file(entry.path()) {
                        result.items.push(entry.into_path());
                    } else {
                        debug!(path = %entry.path().display(), "skipping non-media file");
                        result.skipped_files += 1;
                    }
                }
                Err(err) => {
                    warn!("Error walking directory: {}", err);
                    result.errors.push(format!("Directory walk error: {err}"));
                }
            }
        }

        Ok(result)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::DEFAULT_MEDIA_EXTENSIONS;
    use std::fs;
    use tempfile::TempDir;

    fn discovery() -> MediaDiscovery {
        MediaDiscovery::new(
            DEFAULT_MEDIA_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        )
    }

    #[test]
    fn test_is_media_file() {
        let discovery = discovery();

        assert!(discovery.is_media_file(Path::new("test.mp4")));
        assert!(discovery.is_media_file(Path::new("TEST.MKV")));
        assert!(!discovery.is_media_file(Path::new("poster.jpg")));
        assert!(!discovery.is_media_file(Path::new("no_extension")));
    }

    #[test]
    fn test_discover_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = discovery()
            .discover(&[temp_dir.path().to_path_buf()])
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.skipped_files, 0);
    }

    #[test]
    fn test_discover_requires_roots() {
        assert!(matches!(
            discovery().discover(&[]),
            Err(EngineError::NoMediaRoots)
        ));
        assert!(matches!(
            discovery().discover(&[PathBuf::from("/nonexistent/path")]),
            Err(EngineError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_discover_sorted_media_skipping_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b-series")).unwrap();
        fs::create_dir_all(root.join(".trash")).unwrap();
        fs::write(root.join("b-series/ep2.mkv"), b"fake").unwrap();
        fs::write(root.join("a-movie.mp4"), b"fake").unwrap();
        fs::write(root.join("cover.jpg"), b"fake").unwrap();
        fs::write(root.join(".trash/old.mp4"), b"fake").unwrap();

        let result = discovery().discover(&[root.to_path_buf()]).unwrap();

        assert_eq!(
            result.items,
            vec![root.join("a-movie.mp4"), root.join("b-series/ep2.mkv")]
        );
        assert_eq!(result.skipped_files, 1);
    }
}
