//! Collaborator boundary
//!
//! The engine only reads typed snapshots through these traits. Storage,
//! durability and refresh policy belong to the implementations.

mod memory;
mod snapshot;

pub use memory::InMemorySource;
pub use snapshot::JsonSnapshotSource;

use crate::error::SourceError;
use crate::models::{FeedbackRecord, SettingsSnapshot, VisitRecord};
use async_trait::async_trait;

/// Default size of the recent-history window
pub const DEFAULT_HISTORY_WINDOW: usize = 200;

/// Recent browsing history, most recent first
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn recent_history(&self, limit: usize) -> Result<Vec<VisitRecord>, SourceError>;
}

/// Every like/dislike the user has recorded
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    async fn all_feedback(&self) -> Result<Vec<FeedbackRecord>, SourceError>;
}

/// Current personalization settings
#[cfg_attr(test, mockall::automock)]
pub trait SettingsSource: Send + Sync {
    fn personalization_settings(&self) -> SettingsSnapshot;
}

/// Most-recent-first ordering and window cap shared by implementations.
pub(crate) fn recent_window(mut records: Vec<VisitRecord>, limit: usize) -> Vec<VisitRecord> {
    // Stable: equal timestamps keep store order
    records.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
    records.truncate(limit);
    records
}
