use revisit_service::models::{FeedbackRecord, FeedbackValue, SettingsSnapshot, VisitRecord};
use revisit_service::{
    EngineOptions, InMemorySource, RecommendationCache, RecommendationKind, RecommendationService,
};
use std::sync::Arc;
use std::time::Duration;

const NOW: i64 = 1_700_000_000_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;
const TTL_MS: i64 = 300_000;

fn visit(url: &str, title: Option<&str>, visited_at: i64, visit_count: u32) -> VisitRecord {
    VisitRecord {
        url: url.to_string(),
        title: title.map(str::to_string),
        visited_at,
        visit_count,
    }
}

fn dislikes(url: &str, n: usize) -> Vec<FeedbackRecord> {
    (0..n)
        .map(|i| FeedbackRecord {
            url: url.to_string(),
            value: FeedbackValue::Dislike,
            created_at: NOW - i as i64,
        })
        .collect()
}

fn engine(source: &Arc<InMemorySource>) -> RecommendationService {
    RecommendationService::new(
        source.clone(),
        source.clone(),
        source.clone(),
        Arc::new(RecommendationCache::new(Duration::from_millis(TTL_MS as u64))),
        EngineOptions::default(),
    )
}

/// One heavy favorite, one related site, and ten unrelated fillers.
fn explore_history() -> Vec<VisitRecord> {
    let mut history = vec![
        visit("https://rustlang.org", Some("Rust programming guide"), NOW, 100),
        visit("https://blog.example.com", Some("Rust programming tips"), NOW - HOUR_MS, 1),
    ];
    for i in 0..10 {
        history.push(visit(
            &format!("https://filler{}.net", i),
            None,
            NOW - 2 * HOUR_MS,
            1,
        ));
    }
    history
}

#[tokio::test]
async fn test_single_favorite_scores_full() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        vec![],
    ));
    let recs = engine(&source).get_recommendations_at(5, NOW).await.unwrap();

    assert_eq!(recs.len(), 1);
    let rec = &recs[0];
    assert_eq!(rec.url, "https://a.com");
    assert_eq!(rec.title, "a.com");
    assert_eq!(rec.kind, RecommendationKind::Favorite);
    assert!((rec.score - 1.0).abs() < 1e-9);
    assert_eq!(rec.reason, "One of your most visited sites");
}

#[tokio::test]
async fn test_repeated_dislikes_mute() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        dislikes("https://a.com", 2),
    ));
    let recs = engine(&source).get_recommendations_at(5, NOW).await.unwrap();

    assert_eq!(recs.len(), 1);
    assert!(recs[0].score <= 0.1);
    assert!(recs[0].reason.contains("Muted"));
}

#[tokio::test]
async fn test_empty_history() {
    let source = Arc::new(InMemorySource::default());
    let recs = engine(&source).get_recommendations_at(5, NOW).await.unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_recency_breaks_equal_frequency() {
    let history: Vec<_> = (0..20)
        .map(|i| visit(&format!("https://site{}.com", i), None, NOW - i * HOUR_MS, 5))
        .collect();
    let source = Arc::new(InMemorySource::new(history, vec![]));

    let recs = engine(&source).get_recommendations_at(10, NOW).await.unwrap();

    assert_eq!(recs.len(), 10);
    assert_eq!(recs[0].url, "https://site0.com");
    for pair in recs.windows(2) {
        assert!(pair[0].score > pair[1].score);
    }
}

#[tokio::test]
async fn test_output_bounded_and_sorted() {
    let mut history = explore_history();
    history.push(visit("https://old.org", None, NOW - 120 * DAY_MS, 80));
    let source = Arc::new(InMemorySource::new(history, vec![]));
    let service = engine(&source);

    for limit in [0, 1, 2, 5, 50] {
        service.clear_cache().await;
        let recs = service.get_recommendations_at(limit, NOW).await.unwrap();
        assert!(recs.len() <= limit);
        assert!(recs.len() <= 10);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for rec in &recs {
            assert!((0.0..=1.0).contains(&rec.score));
        }
    }
}

#[tokio::test]
async fn test_max_recommendations_caps_limit() {
    let history: Vec<_> = (0..8)
        .map(|i| visit(&format!("https://site{}.com", i), None, NOW, 5))
        .collect();
    let source = Arc::new(
        InMemorySource::new(history, vec![]).with_settings(SettingsSnapshot {
            max_recommendations: Some(3),
            ..Default::default()
        }),
    );

    let recs = engine(&source).get_recommendations_at(10, NOW).await.unwrap();
    assert_eq!(recs.len(), 3);

    // Equal scores keep first-seen order
    let urls: Vec<&str> = recs.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://site0.com", "https://site1.com", "https://site2.com"]);
}

#[tokio::test]
async fn test_explore_candidate_classified() {
    let source = Arc::new(InMemorySource::new(explore_history(), vec![]));
    let recs = engine(&source).get_recommendations_at(10, NOW).await.unwrap();

    let explore = recs
        .iter()
        .find(|r| r.url == "https://blog.example.com")
        .expect("related site recommended");
    assert_eq!(explore.kind, RecommendationKind::Explore);
    assert_eq!(explore.title, "Rust programming tips");
    assert!(!recs.iter().any(|r| r.url.contains("filler")));
}

#[tokio::test]
async fn test_disliked_explore_dropped_in_large_history() {
    let source = Arc::new(InMemorySource::new(
        explore_history(),
        dislikes("https://blog.example.com", 2),
    ));
    let recs = engine(&source).get_recommendations_at(10, NOW).await.unwrap();

    assert!(!recs.iter().any(|r| r.url == "https://blog.example.com"));
    assert_eq!(recs[0].url, "https://rustlang.org");
}

#[tokio::test]
async fn test_disliked_explore_kept_in_small_history() {
    let history = explore_history().into_iter().take(2).collect();
    let source = Arc::new(InMemorySource::new(
        history,
        dislikes("https://blog.example.com", 2),
    ));
    let recs = engine(&source).get_recommendations_at(10, NOW).await.unwrap();

    let explore = recs
        .iter()
        .find(|r| r.url == "https://blog.example.com")
        .expect("kept below the filtering threshold");
    assert!(explore.reason.contains("Muted"));
}

#[tokio::test]
async fn test_cached_within_ttl() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        vec![],
    ));
    let service = engine(&source);

    let first = service.get_recommendations_at(5, NOW).await.unwrap();
    source.set_history(vec![visit("https://b.com", None, NOW, 50)]);
    let second = service
        .get_recommendations_at(5, NOW + TTL_MS - 1)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second[0].url, "https://a.com");
}

#[tokio::test]
async fn test_recomputed_after_ttl() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        vec![],
    ));
    let service = engine(&source);

    service.get_recommendations_at(5, NOW).await.unwrap();
    source.set_history(vec![visit("https://b.com", None, NOW, 50)]);
    let recs = service.get_recommendations_at(5, NOW + TTL_MS).await.unwrap();

    assert_eq!(recs[0].url, "https://b.com");
}

#[tokio::test]
async fn test_clear_cache_recomputes() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        vec![],
    ));
    let service = engine(&source);

    service.get_recommendations_at(5, NOW).await.unwrap();
    source.set_history(vec![visit("https://b.com", None, NOW, 50)]);
    service.clear_cache().await;
    let recs = service.get_recommendations_at(5, NOW + 1).await.unwrap();

    assert_eq!(recs[0].url, "https://b.com");
    assert!(service.cache().entry().await.is_some());
}

#[tokio::test]
async fn test_settings_change_recomputes() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        vec![],
    ));
    let service = engine(&source);

    service.get_recommendations_at(5, NOW).await.unwrap();
    source.set_history(vec![visit("https://b.com", None, NOW, 50)]);
    source.set_settings(SettingsSnapshot {
        recency_weight: Some(0.7),
        ..Default::default()
    });
    let recs = service.get_recommendations_at(5, NOW + 1).await.unwrap();

    assert_eq!(recs[0].url, "https://b.com");
}

#[tokio::test]
async fn test_cached_list_served_for_larger_limit() {
    let history: Vec<_> = (0..3)
        .map(|i| visit(&format!("https://site{}.com", i), None, NOW, 5))
        .collect();
    let source = Arc::new(InMemorySource::new(history, vec![]));
    let service = engine(&source);

    let first = service.get_recommendations_at(1, NOW).await.unwrap();
    let second = service.get_recommendations_at(5, NOW + 1).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_shared_cache_handle() {
    let source = Arc::new(InMemorySource::new(
        vec![visit("https://a.com", None, NOW, 50)],
        vec![],
    ));
    let service = engine(&source);
    let other = service.clone();

    service.get_recommendations_at(5, NOW).await.unwrap();
    other.clear_cache().await;

    assert!(service.cache().entry().await.is_none());
}
