pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    FileConfigSource,
};
pub use models::{Config, ConfigMetadata, LibraryConfig, ServerConfig};
pub use validation::{ConfigWarning, ConfigWarnings};
