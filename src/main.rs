//! blogwire entry point.
//!
//! Builds the store, optionally seeds demo data, and prints the resulting
//! snapshot as JSON.

use tracing_subscriber::EnvFilter;

use blogwire::app_state::AppState;
use blogwire::config::{AppConfig, LogFormat};
use blogwire::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    tracing::info!(
        change_bus_capacity = config.change_bus_capacity,
        seed_demo_data = config.seed_demo_data,
        "starting blogwire"
    );

    let state = AppState::from_config(&config);

    if config.seed_demo_data {
        let summary = seed::seed_demo_data(&state.blog_service).await?;
        tracing::info!(
            accounts = summary.accounts,
            posts = summary.posts,
            comments = summary.comments,
            "seed complete"
        );
    }

    let snapshot = state.blog_service.store().snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
