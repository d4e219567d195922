use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of the single scrape job.
///
/// Not persisted. `Idle` is both the initial state and the state every job
/// drains back to, whether it ran to completion or was stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Idle,
    #[serde(rename = "scraping")]
    Running,
    Stopping,
}

impl JobState {
    /// `true` while a job holds the single job slot.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::Running => "scraping",
            JobState::Stopping => "stopping",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_display() {
        for state in [JobState::Idle, JobState::Running, JobState::Stopping] {
            let encoded = serde_json::to_string(&state).unwrap();
            assert_eq!(encoded, format!("\"{}\"", state));
        }
    }

    #[test]
    fn only_running_and_stopping_are_active() {
        assert!(!JobState::Idle.is_active());
        assert!(JobState::Running.is_active());
        assert!(JobState::Stopping.is_active());
    }
}
