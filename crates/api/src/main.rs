use anyhow::Context;

use garage_api::config::{Config, LIST_URL, LISTEN_ADDR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    garage_observability::init();

    let config = Config::load()?;
    let services = garage_api::app::services::build_services(&config).await?;
    let app = garage_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR)
        .await
        .with_context(|| format!("failed to bind {LISTEN_ADDR}"))?;

    tracing::info!("listening on http://{}/", listener.local_addr()?);
    tracing::info!("inventory at {LIST_URL}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
