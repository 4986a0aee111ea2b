//! Shelfkeeper Server - library catalog, membership and lending ledger
//!
//! REST API server backed by PostgreSQL.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfkeeper_server::{
    api,
    clock::SystemClock,
    config::AppConfig,
    repository::PgCatalogStore,
    services::{import::HttpCatalogSource, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    init_tracing(&config);

    tracing::info!("Starting Shelfkeeper Server v{}", env!("CARGO_PKG_VERSION"));

    let store = PgCatalogStore::connect(&config.database).await?;
    let catalog_source = HttpCatalogSource::new(&config.catalog_import)?;

    let services = Services::new(
        Arc::new(store),
        Arc::new(SystemClock),
        Arc::new(catalog_source),
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "shelfkeeper_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
