pub mod aggregation;
pub mod cache;
pub mod classifier;
pub mod decay;
pub mod feedback;
pub mod personalization;
pub mod recommendation;

pub use aggregation::DomainAggregator;
pub use cache::{CacheEntry, RecommendationCache};
pub use classifier::CandidateClassifier;
pub use feedback::FeedbackIndex;
pub use personalization::PersonalizationWeighter;
pub use recommendation::{EngineOptions, RecommendationService};
