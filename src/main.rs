use std::sync::Arc;

use mimalloc::MiMalloc;
use recipe_nexus::config::Config;
use recipe_nexus::db::SqliteRecipeStore;
use recipe_nexus::service::{BundledMessages, RecipeService, Translator};
use recipe_nexus::{RecipeState, recipe_router};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        default_locale = %cfg.default_locale,
        max_page_size = cfg.max_page_size
    );

    let store = SqliteRecipeStore::connect(&cfg.database_url, cfg.max_connections).await?;
    store.init_schema().await?;

    let translator = Translator::new(Arc::new(BundledMessages::english()), cfg.default_locale.clone());
    let state = RecipeState::new(RecipeService::new(store), translator, cfg.paging());
    let app = recipe_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
