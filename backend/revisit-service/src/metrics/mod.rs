//! Recommendation metrics for observability

use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS: OnceLock<MetricsInner> = OnceLock::new();

struct MetricsInner {
    cache_hits: Counter,
    cache_misses: CounterVec,
    cache_clears: Counter,
    excluded: CounterVec,
    pipeline_duration: Histogram,
}

impl MetricsInner {
    fn new() -> Self {
        Self {
            cache_hits: Counter::with_opts(Opts::new(
                "revisit_cache_hits_total",
                "Recommendation lists served from cache",
            ))
            .expect("valid metric definition"),
            cache_misses: CounterVec::new(
                Opts::new(
                    "revisit_cache_misses_total",
                    "Recommendation cache misses by reason",
                ),
                &["reason"],
            )
            .expect("valid metric definition"),
            cache_clears: Counter::with_opts(Opts::new(
                "revisit_cache_clears_total",
                "Explicit recommendation cache clears",
            ))
            .expect("valid metric definition"),
            excluded: CounterVec::new(
                Opts::new(
                    "revisit_candidates_excluded_total",
                    "Domains dropped from the ranked list by rule",
                ),
                &["rule"],
            )
            .expect("valid metric definition"),
            pipeline_duration: Histogram::with_opts(
                HistogramOpts::new(
                    "revisit_pipeline_duration_seconds",
                    "Time spent computing recommendations on a cache miss",
                )
                .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1]),
            )
            .expect("valid metric definition"),
        }
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.cache_hits.clone()))?;
        registry.register(Box::new(self.cache_misses.clone()))?;
        registry.register(Box::new(self.cache_clears.clone()))?;
        registry.register(Box::new(self.excluded.clone()))?;
        registry.register(Box::new(self.pipeline_duration.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static MetricsInner {
    METRICS.get_or_init(MetricsInner::new)
}

/// Exclusion rules reported in `revisit_candidates_excluded_total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionRule {
    Unclassified,
    DislikedExplore,
    BelowMinScore,
}

impl ExclusionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionRule::Unclassified => "unclassified",
            ExclusionRule::DislikedExplore => "disliked_explore",
            ExclusionRule::BelowMinScore => "below_min_score",
        }
    }
}

/// Metrics wrapper
#[derive(Clone, Default)]
pub struct RecommendationMetrics;

impl RecommendationMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Register metrics with a Prometheus registry
    pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
        get_metrics().register(registry)
    }

    pub fn record_cache_hit(&self) {
        get_metrics().cache_hits.inc();
    }

    pub fn record_cache_miss(&self, reason: &str) {
        get_metrics().cache_misses.with_label_values(&[reason]).inc();
    }

    pub fn record_cache_clear(&self) {
        get_metrics().cache_clears.inc();
    }

    pub fn record_excluded(&self, rule: ExclusionRule) {
        get_metrics().excluded.with_label_values(&[rule.as_str()]).inc();
    }

    pub fn observe_pipeline(&self, elapsed: Duration) {
        get_metrics().pipeline_duration.observe(elapsed.as_secs_f64());
    }
}
