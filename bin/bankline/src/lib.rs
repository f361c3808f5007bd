mod observability;

pub mod utility;

pub use bankline_primitives::error::ApiError;

use crate::utility::background_tasks::spawn_background_tasks;
use crate::utility::logging::setup_logging;
use crate::utility::server::serve;
use crate::utility::tasks::{build_router, initialize_store, load_env};
use bankline_core::AppState;
use bankline_primitives::models::app_config::AppConfig;
use eyre::Report;
use tracing::info;

pub async fn run() -> Result<(), Report> {
    // 1. load environment variables
    load_env();

    // 2. initialize logging first (so we can log everything else)
    setup_logging();

    info!("Starting Bankline ledger service...");

    // 3. load configuration
    let config = AppConfig::from_env()?;

    // 4. open the ledger store (migrations run here for postgres)
    let store = initialize_store(&config)?;

    // 5. build application state
    let state = AppState::new(store, config);

    // 6. start background monitors
    spawn_background_tasks(state.clone());

    // 7. initialize metrics
    let (metric_layer, metric_handle) = observability::metrics::setup_metrics();

    // 8. build axum router
    let app = build_router(state, metric_layer, metric_handle)?;

    // 9. start HTTP server
    serve(app).await?;

    info!("Bankline shut down gracefully");
    Ok(())
}
