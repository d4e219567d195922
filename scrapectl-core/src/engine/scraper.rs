use std::path::{Path, PathBuf};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::ScrapeError, job::SourceOverride};

/// Catalogue identifiers such as `ABC-123`, `abc_0042` or `XYZ077`.
static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])([a-z]{2,6})[-_]?(\d{2,5})(?:[^0-9]|$)")
        .expect("identifier regex should compile")
});

/// One unit of work handed to an [`ItemScraper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeItem {
    pub path: PathBuf,
    pub source: Option<SourceOverride>,
}

impl ScrapeItem {
    pub fn discovered(path: PathBuf) -> Self {
        Self { path, source: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedItem {
    pub number: Option<String>,
}

/// Metadata lookup for a single file. Implementations own the network and
/// file-writing side of scraping.
#[async_trait]
pub trait ItemScraper: Send + Sync {
    async fn scrape(&self, item: &ScrapeItem) -> Result<ScrapedItem, ScrapeError>;
}

/// Built-in scraper that resolves an identifier from the file name, or from
/// the explicit source URL when one was given.
#[derive(Debug, Clone, Default)]
pub struct IdentifierScraper;

impl IdentifierScraper {
    pub fn new() -> Self {
        Self
    }

    pub fn identifier_from_path(path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        let captures = IDENTIFIER_PATTERN.captures(stem)?;
        Some(format!(
            "{}-{}",
            captures[1].to_ascii_uppercase(),
            &captures[2]
        ))
    }

    fn identifier_from_source(source: &SourceOverride) -> Option<String> {
        source
            .url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()
            .map(str::to_string)
    }
}

#[async_trait]
impl ItemScraper for IdentifierScraper {
    async fn scrape(&self, item: &ScrapeItem) -> Result<ScrapedItem, ScrapeError> {
        let metadata = tokio::fs::metadata(&item.path).await?;
        if !metadata.is_file() {
            return Err(ScrapeError::Internal(format!(
                "not a regular file: {}",
                item.path.display()
            )));
        }

        if let Some(source) = &item.source {
            let number = Self::identifier_from_source(source).ok_or_else(|| {
                ScrapeError::Source(format!(
                    "{} url has no identifier: {}",
                    source.provider, source.url
                ))
            })?;
            return Ok(ScrapedItem {
                number: Some(number),
            });
        }

        Self::identifier_from_path(&item.path)
            .map(|number| ScrapedItem {
                number: Some(number),
            })
            .ok_or(ScrapeError::IdentifierNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use url::Url;

    #[test]
    fn identifiers_are_normalised() {
        let cases = [
            ("/lib/abc-123.mp4", Some("ABC-123")),
            ("/lib/[group] XYZ_0042 (1080p).mkv", Some("XYZ-0042")),
            ("/lib/Movie Title 2019.mkv", None),
            ("/lib/holiday.mp4", None),
        ];
        for (path, expected) in cases {
            assert_eq!(
                IdentifierScraper::identifier_from_path(Path::new(path)).as_deref(),
                expected,
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn scrape_reports_missing_files_and_unknown_names() {
        let dir = TempDir::new().unwrap();
        let scraper = IdentifierScraper::new();

        let missing = ScrapeItem::discovered(dir.path().join("ABC-001.mp4"));
        assert!(matches!(
            scraper.scrape(&missing).await,
            Err(ScrapeError::Io(_))
        ));

        let plain = dir.path().join("holiday.mp4");
        fs::write(&plain, b"fake").unwrap();
        assert!(matches!(
            scraper.scrape(&ScrapeItem::discovered(plain)).await,
            Err(ScrapeError::IdentifierNotFound)
        ));
    }

    #[tokio::test]
    async fn explicit_source_wins_over_file_name() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("holiday.mp4");
        fs::write(&file, b"fake").unwrap();

        let item = ScrapeItem {
            path: file,
            source: Some(SourceOverride {
                provider: "imdb".into(),
                url: Url::parse("https://www.imdb.com/title/tt0133093/").unwrap(),
            }),
        };
        let scraped = IdentifierScraper::new().scrape(&item).await.unwrap();
        assert_eq!(scraped.number.as_deref(), Some("tt0133093"));
    }
}
