//! Maps explicit source URLs to known metadata providers.

use serde::{Deserialize, Serialize};
use url::Url;

/// A metadata provider and the hosts that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub name: String,
    pub hosts: Vec<String>,
}

impl ProviderEntry {
    pub fn new<I, S>(name: impl Into<String>, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    fn matches_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|candidate| {
            let candidate = candidate.trim().trim_start_matches('.');
            host.eq_ignore_ascii_case(candidate)
                || host
                    .to_ascii_lowercase()
                    .ends_with(&format!(".{}", candidate.to_ascii_lowercase()))
        })
    }
}

pub fn default_providers() -> Vec<ProviderEntry> {
    vec![
        ProviderEntry::new("tmdb", ["themoviedb.org"]),
        ProviderEntry::new("imdb", ["imdb.com"]),
        ProviderEntry::new("tvdb", ["thetvdb.com"]),
        ProviderEntry::new("anidb", ["anidb.net"]),
    ]
}

#[derive(Debug, Clone)]
pub struct ProviderResolver {
    entries: Vec<ProviderEntry>,
}

impl ProviderResolver {
    pub fn new(entries: Vec<ProviderEntry>) -> Self {
        Self { entries }
    }

    /// Resolve `raw` to `(provider, url)`, or `None` when the URL is
    /// malformed, not http(s), or hosted by no known provider.
    pub fn resolve(&self, raw: &str) -> Option<(String, Url)> {
        let url = Url::parse(raw.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let host = url.host_str()?;
        self.entries
            .iter()
            .find(|entry| entry.matches_host(host))
            .map(|entry| (entry.name.clone(), url.clone()))
    }
}

impl Default for ProviderResolver {
    fn default() -> Self {
        Self::new(default_providers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_hosts_and_subdomains() {
        let resolver = ProviderResolver::default();

        let (provider, url) = resolver
            .resolve("https://www.themoviedb.org/movie/603")
            .unwrap();
        assert_eq!(provider, "tmdb");
        assert_eq!(url.path(), "/movie/603");

        let (provider, _) =
            resolver.resolve("http://imdb.com/title/tt0133093").unwrap();
        assert_eq!(provider, "imdb");
    }

    #[test]
    fn rejects_unknown_malformed_and_non_http() {
        let resolver = ProviderResolver::default();
        assert!(resolver.resolve("https://example.com/video").is_none());
        assert!(resolver.resolve("not a url").is_none());
        assert!(resolver.resolve("ftp://imdb.com/title").is_none());
        // Suffix match must respect label boundaries.
        assert!(resolver.resolve("https://notimdb.com/title").is_none());
    }

    #[test]
    fn custom_entries_replace_defaults() {
        let resolver = ProviderResolver::new(vec![ProviderEntry::new(
            "local",
            ["meta.internal"],
        )]);
        assert!(resolver.resolve("https://imdb.com/title").is_none());
        let (provider, _) =
            resolver.resolve("https://meta.internal/item/1").unwrap();
        assert_eq!(provider, "local");
    }
}
