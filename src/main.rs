use anyhow::{Context, Result};
use std::net::Ipv4Addr;
use std::sync::Arc;
use student_roster::{api, config, logging, store::StudentStore, summary::OllamaSummaryClient};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing(config.log_file.as_deref());
    tracing::debug!(?config, "Loaded configuration");

    let store = Arc::new(StudentStore::new());
    let summarizer = Arc::new(
        OllamaSummaryClient::from_config().context("failed to build summary client")?,
    );
    let app = api::create_router(store, summarizer);

    let port = config.server_port;
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!(
        ollama_url = %config.ollama_url,
        model = %config.summary_model,
        "Listening on http://0.0.0.0:{}",
        port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
