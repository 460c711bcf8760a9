use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use results_api::infrastructure::AppState;
use results_api::{config, db, seed, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "results_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .with_context(|| format!("Failed to initialize database at {}", config.database_url))?;

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        match seed::seed_demo_data(&db).await {
            Ok(()) => tracing::info!("Demo data seeded successfully."),
            Err(e) => tracing::error!("Failed to seed data: {}", e),
        }
    }

    let state = AppState::new(db, &config);
    let app = server::build_router(state, &config.cors_allowed_origins);

    let (_port, handle) = server::start_server(app, config.port)
        .await
        .map_err(anyhow::Error::msg)?;

    handle.await.context("Server task panicked")?;
    Ok(())
}
