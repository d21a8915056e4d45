use super::{recent_window, FeedbackSource, HistorySource, SettingsSource};
use crate::error::SourceError;
use crate::models::{FeedbackRecord, SettingsSnapshot, VisitRecord};
use async_trait::async_trait;
use std::sync::RwLock;

/// Source backed by in-process vectors.
///
/// Useful for embedding hosts that already hold the records, and for tests.
#[derive(Debug, Default)]
pub struct InMemorySource {
    history: RwLock<Vec<VisitRecord>>,
    feedback: RwLock<Vec<FeedbackRecord>>,
    settings: RwLock<SettingsSnapshot>,
}

impl InMemorySource {
    pub fn new(history: Vec<VisitRecord>, feedback: Vec<FeedbackRecord>) -> Self {
        Self {
            history: RwLock::new(history),
            feedback: RwLock::new(feedback),
            settings: RwLock::new(SettingsSnapshot::default()),
        }
    }

    pub fn with_settings(self, settings: SettingsSnapshot) -> Self {
        self.set_settings(settings);
        self
    }

    pub fn set_history(&self, history: Vec<VisitRecord>) {
        match self.history.write() {
            Ok(mut guard) => *guard = history,
            Err(poisoned) => *poisoned.into_inner() = history,
        }
    }

    pub fn set_feedback(&self, feedback: Vec<FeedbackRecord>) {
        match self.feedback.write() {
            Ok(mut guard) => *guard = feedback,
            Err(poisoned) => *poisoned.into_inner() = feedback,
        }
    }

    pub fn set_settings(&self, settings: SettingsSnapshot) {
        match self.settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}

#[async_trait]
impl HistorySource for InMemorySource {
    async fn recent_history(&self, limit: usize) -> Result<Vec<VisitRecord>, SourceError> {
        let history = self
            .history
            .read()
            .map_err(|_| SourceError::Unavailable("history lock poisoned".to_string()))?
            .clone();
        Ok(recent_window(history, limit))
    }
}

#[async_trait]
impl FeedbackSource for InMemorySource {
    async fn all_feedback(&self) -> Result<Vec<FeedbackRecord>, SourceError> {
        let feedback = self
            .feedback
            .read()
            .map_err(|_| SourceError::Unavailable("feedback lock poisoned".to_string()))?
            .clone();
        Ok(feedback)
    }
}

impl SettingsSource for InMemorySource {
    fn personalization_settings(&self) -> SettingsSnapshot {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let source = InMemorySource::new(
            vec![VisitRecord {
                url: "https://a.com".to_string(),
                title: None,
                visited_at: 1,
                visit_count: 1,
            }],
            vec![],
        )
        .with_settings(SettingsSnapshot {
            max_recommendations: Some(3),
            ..Default::default()
        });

        assert_eq!(source.recent_history(10).await.unwrap().len(), 1);
        assert!(source.all_feedback().await.unwrap().is_empty());
        assert_eq!(source.personalization_settings().max_recommendations, Some(3));

        source.set_history(vec![]);
        assert!(source.recent_history(10).await.unwrap().is_empty());
    }
}
