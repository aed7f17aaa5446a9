use anyhow::Context;
use msgext_search::api::create_router;
use msgext_search::config::Config;
use msgext_search::query_handler::SearchCommandHandler;
use msgext_search::search_client::SearchClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true)
        .init();

    let search_client =
        SearchClient::from_config(&config).context("Failed to build search client")?;
    tracing::info!(endpoint = search_client.endpoint(), "search client ready");

    let handler = Arc::new(SearchCommandHandler::new(search_client));
    let app = create_router(handler);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
