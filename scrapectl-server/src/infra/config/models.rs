use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use scrapectl_core::{ProviderEntry, ScrapeSettings};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub providers: Vec<ProviderEntry>,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Roots walked by a default-mode scrape.
    pub media_roots: Vec<PathBuf>,
    /// Directories that caller-supplied paths must stay inside.
    pub safe_dirs: Vec<PathBuf>,
    /// Lower-case media extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Maximum discovery depth below each root (None = unlimited)
    pub max_depth: Option<usize>,
    pub follow_links: bool,
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl Config {
    pub fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings::new(self.library.media_roots.clone())
            .with_extensions(self.library.extensions.clone())
            .with_safe_dirs(self.library.safe_dirs.clone())
            .with_providers(self.providers.clone())
            .with_max_depth(self.library.max_depth)
            .with_follow_links(self.library.follow_links)
    }
}
