//! Read-only views over job state, shaped for the control surface.

use serde::{Deserialize, Serialize};

use super::{
    progress::{CompletedItem, FailedItem, ProgressCounters, ProgressResults},
    state::JobState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStatusResponse {
    pub status: JobState,
    /// Items processed so far.
    pub current: u64,
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    /// Whole percent in `0..=100`.
    pub progress: u8,
}

impl ScrapeStatusResponse {
    pub fn project(status: JobState, counters: &ProgressCounters) -> Self {
        let total = counters.total.unwrap_or(0);
        Self {
            status,
            current: counters.done,
            total,
            success: counters.succeeded,
            failed: counters.failed,
            progress: percent(counters.done, total),
        }
    }
}

fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (u128::from(done) * 100) / u128::from(total);
    pct.min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResultItem {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&CompletedItem> for ScrapeResultItem {
    fn from(item: &CompletedItem) -> Self {
        Self {
            path: item.path.display().to_string(),
            number: item.number.clone(),
            error: None,
        }
    }
}

impl From<&FailedItem> for ScrapeResultItem {
    fn from(item: &FailedItem) -> Self {
        Self {
            path: item.path.display().to_string(),
            number: None,
            error: Some(item.error.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResultsResponse {
    pub success: Vec<ScrapeResultItem>,
    pub failed: Vec<ScrapeResultItem>,
}

impl From<&ProgressResults> for ScrapeResultsResponse {
    fn from(results: &ProgressResults) -> Self {
        Self {
            success: results.success.iter().map(Into::into).collect(),
            failed: results.failed.iter().map(Into::into).collect(),
        }
    }
}

/// Acknowledgement for start and stop commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeCommandResponse {
    pub message: String,
    pub status: JobState,
}

impl ScrapeCommandResponse {
    pub fn new(message: impl Into<String>, status: JobState) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }
}
