use anyhow::{Context, Result};
use revisit_service::{
    config::LogFormat, Config, JsonSnapshotSource, RecommendationCache, RecommendationService,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = Config::from_env().context("Failed to load config")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.service.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    let limit = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid limit: {}", raw))?,
        None => config.engine.default_limit,
    };

    info!(
        service = %config.service.service_name,
        history = %config.snapshot.history_path.display(),
        limit,
        "Starting recommendation run"
    );

    let source = Arc::new(JsonSnapshotSource::new(
        config.snapshot.history_path.clone(),
        config.snapshot.feedback_path.clone(),
        config.snapshot.settings_path.clone(),
    ));

    let service = RecommendationService::new(
        source.clone(),
        source.clone(),
        source,
        Arc::new(RecommendationCache::new(config.cache_ttl())),
        config.engine_options(),
    );

    let recommendations = service
        .get_recommendations(limit)
        .await
        .context("Failed to compute recommendations")?;

    println!("{}", serde_json::to_string_pretty(&recommendations)?);

    Ok(())
}
