//! Built-in scraping workload: media discovery plus a per-item scraper port.

pub mod directory;
pub mod discovery;
pub mod scraper;

pub use directory::DirectoryScrapeEngine;
pub use discovery::{DiscoveryResult, MediaDiscovery};
pub use scraper::{IdentifierScraper, ItemScraper, ScrapeItem, ScrapedItem};
