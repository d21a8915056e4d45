// ============================================
// Candidate Classifier (候選分類器)
// ============================================
//
// Assigns each aggregated domain a recommendation kind:
// 1. favorite      - more than half the top visit count, visited within a week
// 2. old_but_gold  - more than half the top visit count, not visited for a week
// 3. explore       - shares more than one keyword with the top-5 domains
//
// Domains matching none of the above are not recommended. Explore candidates
// with repeated dislikes and no likes are dropped once the history is large
// enough that filtering them cannot empty the list.

use crate::models::{DomainStats, FeedbackStats, RecommendationKind};
use crate::services::feedback::MUTE_DISLIKE_THRESHOLD;
use std::collections::HashSet;

/// Visit share above which a domain counts as a favorite
pub const FAVORITE_VISIT_SHARE: f64 = 0.5;
/// Days within which a favorite is still "current"
pub const RECENT_DAYS: f64 = 7.0;
/// Number of top domains whose keywords define the user's interests
pub const TOP_FAVORITES: usize = 5;
/// Keyword overlap must exceed this to suggest exploring a domain
pub const MIN_KEYWORD_OVERLAP: usize = 1;
/// Disliked explore candidates are only filtered above this many domains
pub const EXPLORE_FILTER_MIN_DOMAINS: usize = 10;

pub struct CandidateClassifier {
    max_visits: u64,
    favorite_keywords: HashSet<String>,
    domain_count: usize,
}

impl CandidateClassifier {
    /// Prepare classification over one aggregated history window.
    pub fn new(domains: &[DomainStats]) -> Self {
        let max_visits = domains.iter().map(|d| d.visit_count).max().unwrap_or(0);

        // Stable sort keeps first-seen order among equal visit counts
        let mut by_visits: Vec<&DomainStats> = domains.iter().collect();
        by_visits.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));

        let favorite_keywords = by_visits
            .iter()
            .take(TOP_FAVORITES)
            .flat_map(|d| d.keywords.iter().cloned())
            .collect();

        Self {
            max_visits,
            favorite_keywords,
            domain_count: domains.len(),
        }
    }

    pub fn max_visits(&self) -> u64 {
        self.max_visits
    }

    pub fn domain_count(&self) -> usize {
        self.domain_count
    }

    pub fn favorite_keywords(&self) -> &HashSet<String> {
        &self.favorite_keywords
    }

    /// Kind for a domain, or `None` when it should not be recommended.
    pub fn classify(&self, stats: &DomainStats, days_since_visit: f64) -> Option<RecommendationKind> {
        if self.max_visits == 0 {
            return None;
        }

        let normalized_visits = stats.visit_count as f64 / self.max_visits as f64;

        if normalized_visits > FAVORITE_VISIT_SHARE {
            if days_since_visit <= RECENT_DAYS {
                return Some(RecommendationKind::Favorite);
            }
            return Some(RecommendationKind::OldButGold);
        }

        if self.keyword_overlap(stats) > MIN_KEYWORD_OVERLAP {
            return Some(RecommendationKind::Explore);
        }

        None
    }

    pub fn keyword_overlap(&self, stats: &DomainStats) -> usize {
        stats
            .keywords
            .iter()
            .filter(|k| self.favorite_keywords.contains(*k))
            .count()
    }

    /// Whether a classified candidate must be dropped because of feedback.
    pub fn is_excluded(&self, kind: RecommendationKind, feedback: Option<FeedbackStats>) -> bool {
        if kind != RecommendationKind::Explore || self.domain_count <= EXPLORE_FILTER_MIN_DOMAINS {
            return false;
        }

        feedback
            .map(|f| f.dislikes >= MUTE_DISLIKE_THRESHOLD && f.likes == 0)
            .unwrap_or(false)
    }
}

/// Reason text shown for a kind before feedback or recency notes.
pub fn base_reason(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::Favorite => "One of your most visited sites",
        RecommendationKind::OldButGold => "A favorite you used to visit often",
        RecommendationKind::Explore => "Related to sites you visit often",
    }
}

/// Suffix describing how long ago the domain was last visited.
pub fn temporal_suffix(days_since_visit: f64) -> Option<&'static str> {
    if days_since_visit > 90.0 {
        Some("(Old favorite)")
    } else if days_since_visit > 30.0 {
        Some("(Haven't visited in a while)")
    } else if days_since_visit > RECENT_DAYS {
        Some("(Not visited recently)")
    } else {
        None
    }
}

/// Compose the final reason: base text, feedback note, then recency suffix.
pub fn compose_reason(kind: RecommendationKind, feedback_reason: &str, days_since_visit: f64) -> String {
    let mut reason = base_reason(kind).to_string();

    if !feedback_reason.is_empty() {
        reason.push_str(". ");
        reason.push_str(feedback_reason);
    }

    if let Some(suffix) = temporal_suffix(days_since_visit) {
        reason.push(' ');
        reason.push_str(suffix);
    }

    reason
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(name: &str, visit_count: u64, keywords: &[&str]) -> DomainStats {
        DomainStats {
            domain: name.to_string(),
            visit_count,
            last_visited_at: 0,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            representative_url: format!("https://{}", name),
            title: None,
        }
    }

    #[test]
    fn test_favorite_and_old_but_gold() {
        let domains = vec![domain("a.com", 10, &[]), domain("b.com", 6, &[])];
        let classifier = CandidateClassifier::new(&domains);

        assert_eq!(
            classifier.classify(&domains[0], 1.0),
            Some(RecommendationKind::Favorite)
        );
        assert_eq!(
            classifier.classify(&domains[0], 7.0),
            Some(RecommendationKind::Favorite)
        );
        assert_eq!(
            classifier.classify(&domains[1], 7.5),
            Some(RecommendationKind::OldButGold)
        );
    }

    #[test]
    fn test_half_share_is_not_favorite() {
        let domains = vec![domain("a.com", 10, &[]), domain("b.com", 5, &[])];
        let classifier = CandidateClassifier::new(&domains);
        assert_eq!(classifier.classify(&domains[1], 0.0), None);
    }

    #[test]
    fn test_explore_requires_overlap_above_one() {
        let domains = vec![
            domain("rust-lang.org", 100, &["rust", "lang", "programming"]),
            domain("blog.rust.dev", 1, &["blog", "rust", "programming"]),
            domain("news.site", 1, &["news", "rust"]),
        ];
        let classifier = CandidateClassifier::new(&domains);

        assert_eq!(
            classifier.classify(&domains[1], 0.0),
            Some(RecommendationKind::Explore)
        );
        assert_eq!(classifier.keyword_overlap(&domains[2]), 2);
        assert_eq!(
            classifier.classify(&domains[2], 0.0),
            Some(RecommendationKind::Explore)
        );

        let lonely = domain("other.org", 1, &["unrelated", "rust"]);
        assert_eq!(classifier.keyword_overlap(&lonely), 1);
        assert_eq!(classifier.classify(&lonely, 0.0), None);
    }

    #[test]
    fn test_favorite_keywords_limited_to_top_five() {
        let mut domains: Vec<_> = (0..6)
            .map(|i| domain(&format!("d{}.com", i), 100 - i as u64, &[]))
            .collect();
        domains[5].keywords = ["sixth", "only"].iter().map(|s| s.to_string()).collect();
        domains[0].keywords = ["first", "top"].iter().map(|s| s.to_string()).collect();

        let classifier = CandidateClassifier::new(&domains);
        assert!(classifier.favorite_keywords().contains("first"));
        assert!(!classifier.favorite_keywords().contains("sixth"));
    }

    #[test]
    fn test_explore_exclusion_needs_large_history() {
        let small: Vec<_> = (0..10).map(|i| domain(&format!("d{}.com", i), 1, &[])).collect();
        let large: Vec<_> = (0..11).map(|i| domain(&format!("d{}.com", i), 1, &[])).collect();
        let disliked = Some(FeedbackStats::new(0, 2));

        let small = CandidateClassifier::new(&small);
        let large = CandidateClassifier::new(&large);

        assert!(!small.is_excluded(RecommendationKind::Explore, disliked));
        assert!(large.is_excluded(RecommendationKind::Explore, disliked));
        assert!(!large.is_excluded(RecommendationKind::Explore, Some(FeedbackStats::new(1, 2))));
        assert!(!large.is_excluded(RecommendationKind::Explore, Some(FeedbackStats::new(0, 1))));
        assert!(!large.is_excluded(RecommendationKind::Favorite, disliked));
    }

    #[test]
    fn test_compose_reason() {
        assert_eq!(
            compose_reason(RecommendationKind::Favorite, "", 1.0),
            "One of your most visited sites"
        );
        assert_eq!(
            compose_reason(RecommendationKind::OldButGold, "You liked this previously", 45.0),
            "A favorite you used to visit often. You liked this previously (Haven't visited in a while)"
        );
        assert!(compose_reason(RecommendationKind::OldButGold, "", 120.0).ends_with("(Old favorite)"));
        assert!(compose_reason(RecommendationKind::OldButGold, "", 8.0)
            .ends_with("(Not visited recently)"));
    }

    #[test]
    fn test_empty_domains() {
        let classifier = CandidateClassifier::new(&[]);
        assert_eq!(classifier.max_visits(), 0);
        assert_eq!(classifier.domain_count(), 0);
    }
}
