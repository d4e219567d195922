use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    /// Scan every configured media root.
    #[default]
    Default,
    /// Scrape one file, optionally from an explicit source.
    Single,
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobMode::Default => f.write_str("default"),
            JobMode::Single => f.write_str("single"),
        }
    }
}

/// Raw start command as received from a caller, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartScrapeRequest {
    #[serde(default)]
    pub mode: JobMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StartScrapeRequest {
    pub fn single(path: impl Into<String>) -> Self {
        Self {
            mode: JobMode::Single,
            path: Some(path.into()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Explicit source overriding automatic discovery for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOverride {
    pub provider: String,
    pub url: Url,
}

/// Validated single-file target. The path is known to be inside an allowed
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleJobTarget {
    pub path: PathBuf,
    pub source: Option<SourceOverride>,
}

/// Validated job description handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Default,
    Single(SingleJobTarget),
}

impl JobRequest {
    pub fn mode(&self) -> JobMode {
        match self {
            JobRequest::Default => JobMode::Default,
            JobRequest::Single(_) => JobMode::Single,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_defaults_to_directory_scan() {
        let request: StartScrapeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, StartScrapeRequest::default());
        assert_eq!(request.mode, JobMode::Default);
    }

    #[test]
    fn single_mode_body_parses() {
        let request: StartScrapeRequest = serde_json::from_str(
            r#"{"mode":"single","path":"/media/a.mp4","url":"https://www.imdb.com/title/tt1"}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            StartScrapeRequest::single("/media/a.mp4")
                .with_url("https://www.imdb.com/title/tt1")
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let parsed =
            serde_json::from_str::<StartScrapeRequest>(r#"{"mode":"batch"}"#);
        assert!(parsed.is_err());
    }
}
