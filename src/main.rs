// src/main.rs
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use timetrack::{config::AppConfig, database, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("timetrack=debug,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env()?;

    // Create database pool and bring the schema up to date
    let db_pool = database::create_pool(&config.database_url).await?;
    database::migrate(&db_pool).await?;

    let addr = config.bind_addr();

    // Fresh signing key on every start, so restarting drops all sessions
    let app_state = AppState::new(db_pool, config);
    let app = routes::build_app(app_state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
