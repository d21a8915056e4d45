use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use validator::Validate;

// ============================================
// Collaborator boundary records
// ============================================

/// A single history entry as handed over by the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Epoch milliseconds
    pub visited_at: i64,
    #[serde(default = "default_visit_count")]
    pub visit_count: u32,
}

fn default_visit_count() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackValue {
    Like,
    Dislike,
}

/// Explicit like/dislike left by the user on a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub url: String,
    pub value: FeedbackValue,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Personalization settings exactly as the settings store reports them.
///
/// Every field is optional; [`PersonalizationSettings::resolve`] turns this
/// into the validated record the engine works with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub recency_weight: Option<f64>,
    pub frequency_weight: Option<f64>,
    pub feedback_weight: Option<f64>,
    pub min_score: Option<f64>,
    pub max_recommendations: Option<usize>,
}

// ============================================
// Resolved settings
// ============================================

/// Personalization knobs for one pipeline run.
///
/// Weights need not sum to 1; the weighter normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationSettings {
    #[validate(range(min = 0.0, max = 1.0))]
    pub recency_weight: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub frequency_weight: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub feedback_weight: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_score: f64,
    #[validate(range(min = 1))]
    pub max_recommendations: usize,
}

impl Default for PersonalizationSettings {
    fn default() -> Self {
        Self {
            recency_weight: 0.4,
            frequency_weight: 0.4,
            feedback_weight: 0.2,
            min_score: 0.0,
            max_recommendations: 10,
        }
    }
}

impl PersonalizationSettings {
    /// Build the settings for one call from a store snapshot.
    ///
    /// Missing or non-finite fields take the value from `defaults`, weights and
    /// `min_score` are clamped to [0, 1], and a zero `max_recommendations`
    /// falls back to the default.
    pub fn resolve(snapshot: &SettingsSnapshot, defaults: &PersonalizationSettings) -> Self {
        let field = |name: &str, value: Option<f64>, fallback: f64| -> f64 {
            match value {
                None => fallback,
                Some(v) if !v.is_finite() => {
                    warn!(field = name, value = v, "Non-finite personalization value, using default");
                    fallback
                }
                Some(v) => {
                    let clamped = v.clamp(0.0, 1.0);
                    if clamped != v {
                        warn!(field = name, value = v, clamped, "Personalization value out of range");
                    }
                    clamped
                }
            }
        };

        let max_recommendations = match snapshot.max_recommendations {
            Some(0) => {
                warn!("maxRecommendations of 0 ignored, using default");
                defaults.max_recommendations
            }
            Some(n) => n,
            None => defaults.max_recommendations,
        };

        Self {
            recency_weight: field("recency_weight", snapshot.recency_weight, defaults.recency_weight),
            frequency_weight: field(
                "frequency_weight",
                snapshot.frequency_weight,
                defaults.frequency_weight,
            ),
            feedback_weight: field(
                "feedback_weight",
                snapshot.feedback_weight,
                defaults.feedback_weight,
            ),
            min_score: field("min_score", snapshot.min_score, defaults.min_score),
            max_recommendations,
        }
    }
}

// ============================================
// Derived pipeline state
// ============================================

/// Per-domain aggregate built from the recent history window.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainStats {
    pub domain: String,
    pub visit_count: u64,
    pub last_visited_at: i64,
    pub keywords: HashSet<String>,
    /// First URL seen for this domain; used for feedback lookup and as the link.
    pub representative_url: String,
    /// Title of the first record that carried one.
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackStats {
    pub likes: u32,
    pub dislikes: u32,
}

impl FeedbackStats {
    pub fn new(likes: u32, dislikes: u32) -> Self {
        Self { likes, dislikes }
    }

    pub fn is_empty(&self) -> bool {
        self.likes == 0 && self.dislikes == 0
    }
}

// ============================================
// Output
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Favorite,
    OldButGold,
    Explore,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::Favorite => "favorite",
            RecommendationKind::OldButGold => "old_but_gold",
            RecommendationKind::Explore => "explore",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub frequency: f64,
    pub recency: f64,
    pub feedback: f64,
    pub combined: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub url: String,
    pub title: String,
    pub reason: String,
    pub score: f64,
    pub kind: RecommendationKind,
    pub component_scores: ComponentScores,
}
