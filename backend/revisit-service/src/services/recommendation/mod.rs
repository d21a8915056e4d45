// ============================================
// Recommendation Service (推薦服務)
// ============================================
//
// End-to-end pipeline behind `get_recommendations`:
//
//   settings snapshot ──► settings hash ──► cache lookup ──hit──► truncate
//                                               │
//                                              miss
//                                               ↓
//   history ──► Domain Aggregator ──┐
//                                   ├──► Classifier ──► Weighter ──► Adjust ──► sort/truncate ──► store
//   feedback ──► Feedback Index ────┘
//
// Scoring is a pure function of the fetched snapshots, so overlapping misses
// may both recompute and both store without producing inconsistent state.

use crate::error::{RecommendationError, Result};
use crate::metrics::{ExclusionRule, RecommendationMetrics};
use crate::models::{
    FeedbackRecord, PersonalizationSettings, Recommendation, VisitRecord,
};
use crate::services::aggregation::DomainAggregator;
use crate::services::cache::{settings_hash, CacheEntry, RecommendationCache};
use crate::services::classifier::{compose_reason, CandidateClassifier};
use crate::services::feedback::{adjust, FeedbackIndex};
use crate::services::personalization::PersonalizationWeighter;
use crate::sources::{FeedbackSource, HistorySource, SettingsSource, DEFAULT_HISTORY_WINDOW};
use crate::utils::days_between;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Engine tunables that are not user personalization
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Size of the recent-history window requested from the history source
    pub history_window: usize,
    /// Fallbacks for fields missing from the settings snapshot
    pub defaults: PersonalizationSettings,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            defaults: PersonalizationSettings::default(),
        }
    }
}

/// Recommendation Service
///
/// Owns the cache for its whole lifetime; clones share the same cache handle.
#[derive(Clone)]
pub struct RecommendationService {
    history: Arc<dyn HistorySource>,
    feedback: Arc<dyn FeedbackSource>,
    settings: Arc<dyn SettingsSource>,
    cache: Arc<RecommendationCache>,
    options: EngineOptions,
    metrics: RecommendationMetrics,
}

impl RecommendationService {
    pub fn new(
        history: Arc<dyn HistorySource>,
        feedback: Arc<dyn FeedbackSource>,
        settings: Arc<dyn SettingsSource>,
        cache: Arc<RecommendationCache>,
        options: EngineOptions,
    ) -> Self {
        Self {
            history,
            feedback,
            settings,
            cache,
            options,
            metrics: RecommendationMetrics::new(),
        }
    }

    /// Handle to the cache, for collaborators that must invalidate it
    pub fn cache(&self) -> Arc<RecommendationCache> {
        Arc::clone(&self.cache)
    }

    /// Ranked recommendations, at most `limit` long.
    pub async fn get_recommendations(&self, limit: usize) -> Result<Vec<Recommendation>> {
        self.get_recommendations_at(limit, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// [`Self::get_recommendations`] evaluated at an explicit clock reading.
    pub async fn get_recommendations_at(
        &self,
        limit: usize,
        now_ms: i64,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.settings.personalization_settings();
        let settings = PersonalizationSettings::resolve(&snapshot, &self.options.defaults);
        let effective_limit = limit.min(settings.max_recommendations);
        let hash = settings_hash(&settings);

        // A hit is served as cached even if `effective_limit` grew since it was stored
        if let Ok(mut cached) = self.cache.lookup(&hash, now_ms).await {
            cached.truncate(effective_limit);
            return Ok(cached);
        }

        let (history, feedback) = tokio::try_join!(
            async {
                self.history
                    .recent_history(self.options.history_window)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "History fetch failed");
                        RecommendationError::History(e)
                    })
            },
            async {
                self.feedback
                    .all_feedback()
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Feedback fetch failed");
                        RecommendationError::Feedback(e)
                    })
            },
        )?;

        let started = Instant::now();
        let recommendations = self.compute(&history, &feedback, &settings, effective_limit, now_ms);
        self.metrics.observe_pipeline(started.elapsed());

        info!(
            history = history.len(),
            feedback = feedback.len(),
            count = recommendations.len(),
            settings_hash = %hash,
            "Recommendations recomputed"
        );

        self.cache
            .store(CacheEntry {
                recommendations: recommendations.clone(),
                timestamp: now_ms,
                settings_hash: hash,
            })
            .await;

        Ok(recommendations)
    }

    /// Drop any cached list.
    ///
    /// Must be called whenever personalization settings change through a
    /// channel other than this service.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Run the scoring pipeline over already-fetched snapshots.
    pub fn compute(
        &self,
        history: &[VisitRecord],
        feedback: &[FeedbackRecord],
        settings: &PersonalizationSettings,
        limit: usize,
        now_ms: i64,
    ) -> Vec<Recommendation> {
        let domains = DomainAggregator::aggregate(history);
        if domains.is_empty() || limit == 0 {
            return Vec::new();
        }

        let index = FeedbackIndex::build(feedback);
        let classifier = CandidateClassifier::new(&domains);
        let weighter = PersonalizationWeighter::new(settings);
        let max_visits = classifier.max_visits();

        let mut ranked: Vec<Recommendation> = Vec::with_capacity(domains.len());

        for stats in &domains {
            let days = days_between(stats.last_visited_at, now_ms);

            let Some(kind) = classifier.classify(stats, days) else {
                self.metrics.record_excluded(ExclusionRule::Unclassified);
                continue;
            };

            let fb = index.get(&stats.representative_url);
            if classifier.is_excluded(kind, fb) {
                debug!(domain = %stats.domain, "Disliked explore candidate dropped");
                self.metrics.record_excluded(ExclusionRule::DislikedExplore);
                continue;
            }

            let component_scores = weighter.score(stats, max_visits, fb, now_ms);
            if !weighter.passes(&component_scores) {
                self.metrics.record_excluded(ExclusionRule::BelowMinScore);
                continue;
            }

            let adjustment = adjust(component_scores.combined, fb, Some(kind));

            ranked.push(Recommendation {
                url: stats.representative_url.clone(),
                title: stats.title.clone().unwrap_or_else(|| stats.domain.clone()),
                reason: compose_reason(kind, &adjustment.reason, days),
                score: adjustment.score,
                kind,
                component_scores,
            });
        }

        // Stable sort: ties keep first-seen domain order
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        weighter.truncate(&mut ranked, limit);

        debug!(
            domains = domains.len(),
            ranked = ranked.len(),
            top_score = ranked.first().map(|r| r.score),
            "Scoring complete"
        );

        ranked
    }
}
