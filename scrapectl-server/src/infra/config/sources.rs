use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub library: FileLibraryConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<FileProviderConfig>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLibraryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_roots: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_dirs: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_links: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileProviderConfig {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub media_roots: Option<Vec<PathBuf>>,
    pub safe_dirs: Option<Vec<PathBuf>>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: std::env::var("SCRAPECTL_CONFIG").ok().map(PathBuf::from),
            server_host: std::env::var("SERVER_HOST").ok(),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
            media_roots: std::env::var("SCRAPECTL_MEDIA_ROOTS")
                .ok()
                .map(|raw| split_path_list(&raw)),
            safe_dirs: std::env::var("SCRAPECTL_SAFE_DIRS")
                .ok()
                .map(|raw| split_path_list(&raw)),
        }
    }
}

/// Split a `:`-separated path list, dropping empty segments.
pub fn split_path_list(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_lists_skip_blank_segments() {
        assert_eq!(
            split_path_list("/srv/media: :/mnt/nas::"),
            vec![PathBuf::from("/srv/media"), PathBuf::from("/mnt/nas")]
        );
        assert!(split_path_list("").is_empty());
    }

    #[test]
    fn file_config_parses_all_sections() {
        let raw = r#"
            [server]
            port = 8080

            [library]
            media_roots = ["/srv/media"]
            extensions = ["mp4", "mkv"]
            max_depth = 3

            [[providers]]
            name = "tmdb"
            hosts = ["themoviedb.org"]
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.server.host, None);
        assert_eq!(
            config.library.media_roots,
            Some(vec![PathBuf::from("/srv/media")])
        );
        assert_eq!(config.library.safe_dirs, None);
        assert_eq!(config.library.max_depth, Some(3));
        assert_eq!(config.library.follow_links, None);
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].hosts, vec!["themoviedb.org"]);
    }
}
