//! Error types for revisit-service

use thiserror::Error;

/// Failure of a collaborator the engine reads from
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by `get_recommendations`
///
/// Scoring itself never fails; only collaborator reads can.
#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Failed to fetch history: {0}")]
    History(#[source] SourceError),

    #[error("Failed to fetch feedback: {0}")]
    Feedback(#[source] SourceError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, RecommendationError>;
