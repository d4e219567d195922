use super::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Boot-time check of the whole configuration, listener included.
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push("server.port must be non-zero".to_string());
    }

    errors.extend(validate_library(config));
    errors
}

/// Checks a scrape start depends on. An empty list means the configuration
/// can back a scrape job.
pub fn validate_library(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    for root in &config.library.media_roots {
        if !root.exists() {
            errors.push(format!(
                "library.media_roots entry does not exist: {}",
                root.display()
            ));
        } else if !root.is_dir() {
            errors.push(format!(
                "library.media_roots entry is not a directory: {}",
                root.display()
            ));
        }
    }

    if config.library.safe_dirs.is_empty() {
        errors.push("library.safe_dirs must list at least one directory".to_string());
    }

    for provider in &config.providers {
        if provider.hosts.iter().all(|host| host.trim().is_empty()) {
            errors.push(format!(
                "provider '{}' must list at least one host",
                provider.name
            ));
        }
    }

    errors
}

/// Non-fatal findings worth surfacing at boot.
pub fn collect_warnings(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.library.media_roots.is_empty() {
        warnings.push_with_hint(
            "no media roots configured; default-mode scrapes will be rejected",
            "Set library.media_roots or SCRAPECTL_MEDIA_ROOTS",
        );
    }

    if config.library.extensions.is_empty() {
        warnings.push("library.extensions is empty; discovery will find no media");
    }

    for dir in &config.library.safe_dirs {
        if !dir.is_dir() {
            warnings.push(format!(
                "safe dir does not exist yet: {}",
                dir.display()
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::models::{
        ConfigMetadata, LibraryConfig, ServerConfig,
    };
    use scrapectl_core::ProviderEntry;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(media_root: PathBuf) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
            },
            library: LibraryConfig {
                media_roots: vec![media_root.clone()],
                safe_dirs: vec![media_root],
                extensions: vec!["mp4".into()],
                max_depth: None,
                follow_links: false,
            },
            providers: vec![ProviderEntry::new("tmdb", ["themoviedb.org"])],
            metadata: ConfigMetadata::default(),
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path().to_path_buf());
        assert!(validate(&config).is_empty());
        assert!(collect_warnings(&config).is_empty());
    }

    #[test]
    fn every_problem_is_reported() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("movie.mp4");
        std::fs::write(&file, b"fake").unwrap();

        let mut config = config(dir.path().join("missing"));
        config.server.port = 0;
        config.library.media_roots.push(file);
        config.library.safe_dirs.clear();
        config.providers.push(ProviderEntry::new("broken", [" "]));

        let errors = validate(&config);
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].contains("server.port"));
        assert!(errors[1].contains("does not exist"));
        assert!(errors[2].contains("not a directory"));
        assert!(errors[3].contains("safe_dirs"));
        assert!(errors[4].contains("broken"));

        // The listener port is not part of what a scrape start checks.
        let library_errors = validate_library(&config);
        assert_eq!(library_errors.len(), 4, "{library_errors:?}");
        assert!(library_errors.iter().all(|e| !e.contains("server.port")));
    }

    #[test]
    fn empty_roots_only_warn() {
        let dir = TempDir::new().unwrap();
        let mut config = config(dir.path().to_path_buf());
        config.library.media_roots.clear();

        assert!(validate(&config).is_empty());
        let warnings = collect_warnings(&config);
        assert_eq!(warnings.items.len(), 1);
        assert!(warnings.items[0].hint.is_some());
    }
}
