/// Feedback Module
///
/// Turns raw like/dislike records into per-URL counts and applies them to
/// candidate scores.
///
/// # Adjustment rules
/// - Likes only: `+0.15` per like, capped at 3 likes
/// - Dislikes only: `-0.2` per dislike, capped at 3; two or more dislikes
///   additionally mute the candidate (`×0.1`)
/// - Mixed: half-strength step in the direction of the net signal, capped at 2
///
/// The adjusted score is clamped to [0, 1] and falls back to the base score on NaN.
use crate::models::{FeedbackRecord, FeedbackStats, FeedbackValue, RecommendationKind};
use crate::utils::unit_or;
use std::collections::HashMap;
use tracing::debug;

const LIKE_STEP: f64 = 0.15;
const DISLIKE_STEP: f64 = 0.2;
const MAX_COUNTED_SIGNALS: u32 = 3;
const MAX_COUNTED_NET: u32 = 2;
const MIXED_DAMPING: f64 = 0.5;

/// Dislike count at which a candidate is muted
pub const MUTE_DISLIKE_THRESHOLD: u32 = 2;
const MUTE_FACTOR: f64 = 0.1;

/// Neutral value of the absolute feedback component
pub const NEUTRAL_FEEDBACK: f64 = 0.5;

/// Like/dislike counts keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct FeedbackIndex {
    by_url: HashMap<String, FeedbackStats>,
}

impl FeedbackIndex {
    /// Single pass over all feedback records.
    pub fn build(records: &[FeedbackRecord]) -> Self {
        let mut by_url: HashMap<String, FeedbackStats> = HashMap::with_capacity(records.len());

        for record in records {
            let stats = by_url.entry(record.url.clone()).or_default();
            match record.value {
                FeedbackValue::Like => stats.likes = stats.likes.saturating_add(1),
                FeedbackValue::Dislike => stats.dislikes = stats.dislikes.saturating_add(1),
            }
        }

        debug!(
            records = records.len(),
            urls = by_url.len(),
            "Feedback index built"
        );

        Self { by_url }
    }

    pub fn get(&self, url: &str) -> Option<FeedbackStats> {
        self.by_url.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

/// Result of [`adjust`]
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub score: f64,
    /// Empty when no feedback applied
    pub reason: String,
}

/// Apply explicit feedback to a base score.
///
/// `kind` is accepted so callers can pass the candidate's classification;
/// the rules are currently identical for every kind.
pub fn adjust(
    base_score: f64,
    feedback: Option<FeedbackStats>,
    _kind: Option<RecommendationKind>,
) -> Adjustment {
    let stats = match feedback {
        Some(stats) if !stats.is_empty() => stats,
        _ => {
            return Adjustment {
                score: base_score,
                reason: String::new(),
            }
        }
    };

    let mut score = base_score;
    let reason;

    match (stats.likes, stats.dislikes) {
        (likes, 0) => {
            score += LIKE_STEP * likes.min(MAX_COUNTED_SIGNALS) as f64;
            reason = liked_message(likes);
        }
        (0, dislikes) => {
            score -= DISLIKE_STEP * dislikes.min(MAX_COUNTED_SIGNALS) as f64;
            if dislikes >= MUTE_DISLIKE_THRESHOLD {
                score *= MUTE_FACTOR;
                reason = muted_message(dislikes);
            } else {
                reason = disliked_message(dislikes);
            }
        }
        (likes, dislikes) => {
            let net = likes as i64 - dislikes as i64;
            let counted = (net.unsigned_abs() as u32).min(MAX_COUNTED_NET) as f64;
            if net > 0 {
                score += LIKE_STEP * counted * MIXED_DAMPING;
                reason = "Mixed feedback, mostly positive".to_string();
            } else if net < 0 {
                score -= DISLIKE_STEP * counted * MIXED_DAMPING;
                reason = "Mixed feedback, mostly negative".to_string();
            } else {
                reason = "Mixed feedback".to_string();
            }
        }
    }

    Adjustment {
        score: unit_or(score, base_score),
        reason,
    }
}

/// Feedback expressed as an absolute score instead of a delta.
///
/// Starts at [`NEUTRAL_FEEDBACK`], moves toward 1.0 with likes and toward 0.0
/// with dislikes, following the same directional rules as [`adjust`].
pub fn feedback_component(feedback: Option<FeedbackStats>) -> f64 {
    let stats = match feedback {
        Some(stats) if !stats.is_empty() => stats,
        _ => return NEUTRAL_FEEDBACK,
    };

    let cap = MAX_COUNTED_SIGNALS as f64;
    let net_cap = MAX_COUNTED_NET as f64;

    let value = match (stats.likes, stats.dislikes) {
        (likes, 0) => {
            NEUTRAL_FEEDBACK + NEUTRAL_FEEDBACK * likes.min(MAX_COUNTED_SIGNALS) as f64 / cap
        }
        (0, dislikes) => {
            let value =
                NEUTRAL_FEEDBACK - NEUTRAL_FEEDBACK * dislikes.min(MAX_COUNTED_SIGNALS) as f64 / cap;
            if dislikes >= MUTE_DISLIKE_THRESHOLD {
                value * MUTE_FACTOR
            } else {
                value
            }
        }
        (likes, dislikes) => {
            let net = likes as i64 - dislikes as i64;
            let counted = (net.unsigned_abs() as u32).min(MAX_COUNTED_NET) as f64;
            let step = NEUTRAL_FEEDBACK * MIXED_DAMPING * counted / net_cap;
            match net.signum() {
                1 => NEUTRAL_FEEDBACK + step,
                -1 => NEUTRAL_FEEDBACK - step,
                _ => NEUTRAL_FEEDBACK,
            }
        }
    };

    unit_or(value, NEUTRAL_FEEDBACK)
}

fn liked_message(likes: u32) -> String {
    if likes == 1 {
        "You liked this previously".to_string()
    } else {
        format!("You liked this {} times previously", likes)
    }
}

fn disliked_message(dislikes: u32) -> String {
    if dislikes == 1 {
        "You disliked this previously".to_string()
    } else {
        format!("You disliked this {} times previously", dislikes)
    }
}

fn muted_message(dislikes: u32) -> String {
    format!("Muted after {} dislikes", dislikes)
}
