use ai_llm_service::telemetry;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file when present.
    // A missing file is fine; an unreadable or invalid one is not.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let filter = telemetry::env_filter_with_level("warn", Level::INFO)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer())
        .with(telemetry::foreign_layer())
        .init();

    api::start().await?;

    Ok(())
}
