//! In-memory recommendation cache
//!
//! Holds at most one ranked list, tagged with the hash of the personalization
//! settings it was computed under. An entry is served only while the current
//! settings hash matches and it is younger than the TTL.
//!
//! The slot is owned by one cache instance and shared by handle; overlapping
//! recomputations simply overwrite each other (last write wins).

use crate::metrics::RecommendationMetrics;
use crate::models::{PersonalizationSettings, Recommendation};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Default time-to-live of a cached list (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Deterministic digest of the output-affecting personalization fields.
///
/// Floats are hashed by bit pattern so that any change, however small,
/// invalidates the cache.
pub fn settings_hash(settings: &PersonalizationSettings) -> String {
    let canonical = format!(
        "{}|{}|{}|{}|{}",
        settings.recency_weight.to_bits(),
        settings.frequency_weight.to_bits(),
        settings.feedback_weight.to_bits(),
        settings.min_score.to_bits(),
        settings.max_recommendations
    );

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub recommendations: Vec<Recommendation>,
    /// Epoch milliseconds at which the entry was computed
    pub timestamp: i64,
    pub settings_hash: String,
}

/// Why a lookup did not produce a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    Empty,
    SettingsChanged,
    Stale,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::Empty => "empty",
            MissReason::SettingsChanged => "settings_changed",
            MissReason::Stale => "stale",
        }
    }
}

pub struct RecommendationCache {
    slot: RwLock<Option<CacheEntry>>,
    ttl: Duration,
    metrics: RecommendationMetrics,
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl RecommendationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            metrics: RecommendationMetrics::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the cached list for `settings_hash` at time `now_ms`.
    pub async fn lookup(
        &self,
        settings_hash: &str,
        now_ms: i64,
    ) -> Result<Vec<Recommendation>, MissReason> {
        let slot = self.slot.read().await;

        let result = match slot.as_ref() {
            None => Err(MissReason::Empty),
            Some(entry) if entry.settings_hash != settings_hash => Err(MissReason::SettingsChanged),
            Some(entry) if !self.is_fresh(entry, now_ms) => Err(MissReason::Stale),
            Some(entry) => Ok(entry.recommendations.clone()),
        };

        match &result {
            Ok(recommendations) => {
                debug!(
                    count = recommendations.len(),
                    cache_age_ms = slot.as_ref().map(|e| now_ms.saturating_sub(e.timestamp)),
                    "Recommendation cache hit"
                );
                self.metrics.record_cache_hit();
            }
            Err(reason) => {
                debug!(reason = reason.as_str(), "Recommendation cache miss");
                self.metrics.record_cache_miss(reason.as_str());
            }
        }

        result
    }

    /// Replace the slot with a freshly computed entry.
    pub async fn store(&self, entry: CacheEntry) {
        let mut slot = self.slot.write().await;
        debug!(
            count = entry.recommendations.len(),
            settings_hash = %entry.settings_hash,
            "Recommendation cache updated"
        );
        *slot = Some(entry);
    }

    /// Drop the cached entry outright.
    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        if slot.take().is_some() {
            debug!("Recommendation cache cleared");
        }
        self.metrics.record_cache_clear();
    }

    pub async fn entry(&self) -> Option<CacheEntry> {
        self.slot.read().await.clone()
    }

    fn is_fresh(&self, entry: &CacheEntry, now_ms: i64) -> bool {
        let age_ms = now_ms.saturating_sub(entry.timestamp);
        // Entries stamped in the future are treated as brand new
        age_ms < 0 || (age_ms as u128) < self.ttl.as_millis()
    }
}
