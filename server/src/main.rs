use anyhow::Context;
use server::{config::Config, create_app, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
    let config = Config::from_env()?;
    engine::init_logging(config.verbosity);

    // A broken ruleset aborts startup; games never run on a partial one.
    let rules = config.load_rules().context("failed to load ruleset")?;
    tracing::info!("ruleset ready with {} rules", rules.len());

    let app = create_app(AppState::new(Arc::new(rules), config.session_ttl), &config.card_dir);

    let listener = TcpListener::bind(config.server_addr()).await?;
    tracing::info!("Server running at http://{}", config.server_addr());
    println!("Press Ctrl+C to stop the server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal()
{
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down gracefully...");
}
