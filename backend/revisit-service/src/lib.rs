pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;

pub use config::Config;
pub use error::{RecommendationError, SourceError};
pub use models::{PersonalizationSettings, Recommendation, RecommendationKind};
pub use services::{EngineOptions, RecommendationCache, RecommendationService};
pub use sources::{FeedbackSource, HistorySource, InMemorySource, JsonSnapshotSource, SettingsSource};
