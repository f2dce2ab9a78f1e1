use std::sync::Arc;

use anyhow::Context;

use scoopshop_api::app::services::AppServices;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scoopshop_observability::init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set (postgres://...)")?;
    let pool = scoopshop_infra::connect(&database_url)
        .await
        .context("failed to connect to postgres")?;

    let services = Arc::new(AppServices::postgres(pool));
    let app = scoopshop_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .context("failed to bind 0.0.0.0:8080")?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
