// src/main.rs

use std::time::Duration;

use chrono::Utc;
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use treasure_hunt::config::{Config, SWEEP_INTERVAL_SECS};
use treasure_hunt::hunt::{QuestionBank, SessionStore};
use treasure_hunt::routes;
use treasure_hunt::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "hunt.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let bank = QuestionBank::load(config.questions_path.as_deref())
        .expect("Failed to load the question bank");
    tracing::info!(
        "Question bank ready: {} clues, time limit {}s",
        bank.len(),
        config.time_limit
    );

    let state = AppState::new(config.clone(), bank);

    spawn_sweeper(state.sessions.clone(), config.session_ttl);

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

/// Periodically drops sessions nobody has touched within the TTL.
fn spawn_sweeper(sessions: SessionStore, ttl: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            let purged = sessions.purge_idle(ttl, Utc::now()).await;
            if purged > 0 {
                tracing::info!("Purged {} idle sessions", purged);
            }
        }
    });
}
