use super::{recent_window, FeedbackSource, HistorySource, SettingsSource};
use crate::error::SourceError;
use crate::models::{FeedbackRecord, SettingsSnapshot, VisitRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source reading JSON exports of the history, feedback and settings stores.
///
/// Files are re-read on every call so that edits are picked up. Feedback and
/// settings files are optional; history is required.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    history_path: PathBuf,
    feedback_path: Option<PathBuf>,
    settings_path: Option<PathBuf>,
}

impl JsonSnapshotSource {
    pub fn new(
        history_path: impl Into<PathBuf>,
        feedback_path: Option<PathBuf>,
        settings_path: Option<PathBuf>,
    ) -> Self {
        Self {
            history_path: history_path.into(),
            feedback_path,
            settings_path,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl HistorySource for JsonSnapshotSource {
    async fn recent_history(&self, limit: usize) -> Result<Vec<VisitRecord>, SourceError> {
        let records: Vec<VisitRecord> = Self::read_json(&self.history_path).await?;
        debug!(
            path = %self.history_path.display(),
            records = records.len(),
            "History snapshot loaded"
        );
        Ok(recent_window(records, limit))
    }
}

#[async_trait]
impl FeedbackSource for JsonSnapshotSource {
    async fn all_feedback(&self) -> Result<Vec<FeedbackRecord>, SourceError> {
        match &self.feedback_path {
            Some(path) => Self::read_json(path).await,
            None => Ok(Vec::new()),
        }
    }
}

impl SettingsSource for JsonSnapshotSource {
    fn personalization_settings(&self) -> SettingsSnapshot {
        let Some(path) = &self.settings_path else {
            return SettingsSnapshot::default();
        };

        let parsed = std::fs::read_to_string(path)
            .map_err(SourceError::from)
            .and_then(|raw| serde_json::from_str(&raw).map_err(SourceError::from));

        match parsed {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Settings snapshot unreadable, using defaults");
                SettingsSnapshot::default()
            }
        }
    }
}
