use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use scrapectl_core::{
    ConfigSource, ProviderEntry, ScrapeSettings, job::DEFAULT_MEDIA_EXTENSIONS,
    providers::default_providers,
};

use super::{
    models::{Config, ConfigMetadata, LibraryConfig, ServerConfig},
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("scrapectl.toml"),
        PathBuf::from("config/scrapectl.toml"),
    ]
});

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Load `.env`, then resolve the configuration from file and process
    /// environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolve the configuration against an explicit environment snapshot.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            self.compose_config(file_config, env, config_path);
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(path) => path.clone(),
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> (Config, ConfigWarnings) {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No scrapectl.toml detected; falling back to environment variables",
                "Create scrapectl.toml or point SCRAPECTL_CONFIG at one",
            );
        }

        let FileConfig {
            server: file_server,
            library: file_library,
            providers: file_providers,
        } = file_config.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let media_roots = env
            .media_roots
            .or(file_library.media_roots)
            .unwrap_or_default();
        let safe_dirs = match env.safe_dirs.or(file_library.safe_dirs) {
            Some(dirs) => dirs,
            None => {
                if !media_roots.is_empty() {
                    warnings.push(
                        "library.safe_dirs not set; using media roots as safe dirs",
                    );
                }
                media_roots.clone()
            }
        };
        let extensions = file_library
            .extensions
            .map(|extensions| {
                extensions
                    .into_iter()
                    .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                    .collect()
            })
            .unwrap_or_else(|| {
                DEFAULT_MEDIA_EXTENSIONS
                    .iter()
                    .map(|ext| (*ext).to_string())
                    .collect()
            });

        let providers = if file_providers.is_empty() {
            default_providers()
        } else {
            file_providers
                .into_iter()
                .map(|provider| ProviderEntry::new(provider.name, provider.hosts))
                .collect()
        };

        let config = Config {
            server,
            library: LibraryConfig {
                media_roots,
                safe_dirs,
                extensions,
                max_depth: file_library.max_depth,
                follow_links: file_library.follow_links.unwrap_or(false),
            },
            providers,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        warnings.extend(validation::collect_warnings(&config));
        (config, warnings)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Configuration collaborator for the job controller.
///
/// Re-reads the file and environment on every call so edits take effect on
/// the next start without a restart.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    loader: ConfigLoader,
}

impl FileConfigSource {
    pub fn new(loader: ConfigLoader) -> Self {
        Self { loader }
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<ScrapeSettings, Vec<String>> {
        let ConfigLoad { config, .. } = self
            .loader
            .load_with_env(EnvConfig::gather())
            .map_err(|err| vec![describe(&err)])?;

        // The listener is bound once at boot; only library and provider
        // settings gate a start.
        let errors = validation::validate_library(&config);
        if errors.is_empty() {
            Ok(config.scrape_settings())
        } else {
            Err(errors)
        }
    }
}

fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
