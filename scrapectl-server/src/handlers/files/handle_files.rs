use std::path::{Path, PathBuf};

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Upper bound on entries returned by one listing.
pub const MAX_LISTED_ENTRIES: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    /// Absolute path, or a path relative to the first safe dir.
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileItemKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListResponse {
    /// Directories first, then files; each group sorted by name ignoring case.
    pub items: Vec<FileItem>,
    /// Entry count before truncation.
    pub total: usize,
}

pub async fn list_files_handler(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> AppResult<Json<FileListResponse>> {
    let guard = state.path_guard().await?;
    let requested = PathBuf::from(query.path.trim());
    let candidate = if requested.is_absolute() {
        requested
    } else {
        let base = guard.allowed_dirs().first().ok_or_else(|| {
            AppError::internal("no allowed directories are configured")
        })?;
        base.join(requested)
    };

    let resolved = tokio::fs::canonicalize(&candidate).await.map_err(|_| {
        AppError::bad_request(format!(
            "failed to resolve path {}; it may not exist or be inaccessible",
            candidate.display()
        ))
    })?;
    let resolved = guard.check_access(&resolved)?;

    let directory = if tokio::fs::metadata(&resolved).await?.is_dir() {
        resolved
    } else {
        match resolved.parent() {
            Some(parent) => parent.to_path_buf(),
            None => resolved,
        }
    };

    let mut items = read_directory(&directory).await?;
    sort_items(&mut items);
    let total = items.len();
    items.truncate(MAX_LISTED_ENTRIES);

    debug!(path = %directory.display(), total, "listed directory");
    Ok(Json(FileListResponse { items, total }))
}

async fn read_directory(directory: &Path) -> AppResult<Vec<FileItem>> {
    let mut entries = tokio::fs::read_dir(directory).await?;
    let mut items = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        // Follow symlinks for the type; fall back to the link itself.
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => Some(metadata),
            Err(_) => entry.metadata().await.ok(),
        };
        let kind = match &metadata {
            Some(metadata) if metadata.is_dir() => FileItemKind::Directory,
            _ => FileItemKind::File,
        };
        let size = match (&metadata, kind) {
            (Some(metadata), FileItemKind::File) => Some(metadata.len()),
            _ => None,
        };
        let last_modified = metadata
            .as_ref()
            .and_then(|metadata| metadata.modified().ok())
            .map(DateTime::<Utc>::from);

        items.push(FileItem {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: path.to_string_lossy().into_owned(),
            kind,
            size,
            last_modified,
        });
    }

    Ok(items)
}

fn sort_items(items: &mut [FileItem]) {
    items.sort_by_cached_key(|item| {
        (item.kind != FileItemKind::Directory, item.name.to_lowercase())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, kind: FileItemKind) -> FileItem {
        FileItem {
            name: name.into(),
            path: format!("/lib/{name}"),
            kind,
            size: None,
            last_modified: None,
        }
    }

    #[test]
    fn directories_sort_before_files_ignoring_case() {
        let mut items = vec![
            item("b.mp4", FileItemKind::File),
            item("Zeta", FileItemKind::Directory),
            item("A.mkv", FileItemKind::File),
            item("alpha", FileItemKind::Directory),
        ];
        sort_items(&mut items);
        let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Zeta", "A.mkv", "b.mp4"]);
    }

    #[test]
    fn item_kind_serialises_as_type() {
        let json = serde_json::to_value(item("x", FileItemKind::Directory)).unwrap();
        assert_eq!(json["type"], "directory");
        assert!(json.get("size").is_none());
    }
}
