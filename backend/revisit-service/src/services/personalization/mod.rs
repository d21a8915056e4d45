use crate::models::{ComponentScores, DomainStats, FeedbackStats, PersonalizationSettings};
use crate::services::decay::decay;
use crate::services::feedback::{feedback_component, NEUTRAL_FEEDBACK};
use crate::utils::{days_between, unit_or};

/// Component weights after normalization; always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeights {
    pub frequency: f64,
    pub recency: f64,
    pub feedback: f64,
}

impl NormalizedWeights {
    /// Normalize user weights to sum to 1.
    ///
    /// Falls back to equal weights when every weight is zero or the sum is not finite.
    pub fn from_settings(settings: &PersonalizationSettings) -> Self {
        Self::normalize(
            settings.frequency_weight,
            settings.recency_weight,
            settings.feedback_weight,
        )
    }

    fn normalize(frequency: f64, recency: f64, feedback: f64) -> Self {
        let sanitize = |w: f64| if w.is_finite() { w.max(0.0) } else { 0.0 };
        let frequency = sanitize(frequency);
        let recency = sanitize(recency);
        let feedback = sanitize(feedback);
        let total = frequency + recency + feedback;

        if total <= f64::EPSILON || !total.is_finite() {
            let third = 1.0 / 3.0;
            return Self {
                frequency: third,
                recency: third,
                feedback: third,
            };
        }

        Self {
            frequency: frequency / total,
            recency: recency / total,
            feedback: feedback / total,
        }
    }

    /// Weights with the feedback share redistributed over frequency and recency.
    fn without_feedback(&self) -> (f64, f64) {
        let total = self.frequency + self.recency;
        if total <= f64::EPSILON {
            (0.5, 0.5)
        } else {
            (self.frequency / total, self.recency / total)
        }
    }
}

/// Personalization Weighter
///
/// Blends frequency, recency and feedback into one `combined` score using the
/// user's weights, and applies the minimum-score cutoff and result cap.
#[derive(Debug, Clone)]
pub struct PersonalizationWeighter {
    weights: NormalizedWeights,
    min_score: f64,
    max_recommendations: usize,
}

impl PersonalizationWeighter {
    pub fn new(settings: &PersonalizationSettings) -> Self {
        Self {
            weights: NormalizedWeights::from_settings(settings),
            min_score: unit_or(settings.min_score, 0.0),
            max_recommendations: settings.max_recommendations,
        }
    }

    pub fn weights(&self) -> NormalizedWeights {
        self.weights
    }

    /// Compute the component scores for one domain.
    ///
    /// A domain without any feedback reports the neutral feedback value but
    /// is blended on frequency and recency only.
    pub fn score(
        &self,
        stats: &DomainStats,
        max_visits: u64,
        feedback: Option<FeedbackStats>,
        now_ms: i64,
    ) -> ComponentScores {
        let frequency = if max_visits == 0 {
            0.0
        } else {
            unit_or(stats.visit_count as f64 / max_visits as f64, 0.0)
        };
        let recency = decay(days_between(stats.last_visited_at, now_ms));

        let has_feedback = feedback.map(|f| !f.is_empty()).unwrap_or(false);
        let feedback_score = feedback_component(feedback);

        let combined = if has_feedback {
            self.weights.frequency * frequency
                + self.weights.recency * recency
                + self.weights.feedback * feedback_score
        } else {
            let (wf, wr) = self.weights.without_feedback();
            wf * frequency + wr * recency
        };

        ComponentScores {
            frequency,
            recency,
            feedback: if has_feedback { feedback_score } else { NEUTRAL_FEEDBACK },
            combined: unit_or(combined, 0.0),
        }
    }

    /// Whether a candidate survives the minimum-score cutoff.
    pub fn passes(&self, scores: &ComponentScores) -> bool {
        scores.combined >= self.min_score
    }

    /// Effective result cap for a caller-supplied limit.
    pub fn limit(&self, caller_limit: usize) -> usize {
        caller_limit.min(self.max_recommendations)
    }

    pub fn truncate<T>(&self, items: &mut Vec<T>, caller_limit: usize) {
        items.truncate(self.limit(caller_limit));
    }
}
